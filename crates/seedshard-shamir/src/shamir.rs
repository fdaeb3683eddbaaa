//! One-level threshold secret sharing with a digest check
//!
//! The secret sits at x = 255 and a digest point at x = 254 on a polynomial
//! of degree `threshold - 1`. Shares are the evaluations at x = 0, 1, 2, ...
//! The digest point carries `HMAC-SHA256(R, secret)[..4] || R` for a random
//! `R`, so recovery can confirm the interpolated secret is the one that was
//! split rather than a combination of mismatched or corrupted shares.
//!
//! The same primitive is applied twice by [`crate::slip39`]: once to split the
//! encrypted master secret across groups, then once per group across members.

use crate::gf256::{gf_mul, lagrange_basis};
use crate::ShamirError;
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use seedshard_core::MIN_SECRET_LEN;
use sha2::Sha256;
use std::collections::HashSet;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Maximum number of shares (members or groups) at one level.
pub const MAX_SHARE_COUNT: u8 = 16;

/// Length of the digest prefix carried by the digest point.
pub const DIGEST_LEN: usize = 4;

/// x coordinate of the digest point
pub const DIGEST_INDEX: u8 = 254;

/// x coordinate of the secret
pub const SECRET_INDEX: u8 = 255;

/// A named point on the sharing polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharePoint {
    /// A share handed out to a member (or group)
    Fragment(u8),
    /// `digest || padding`, used to verify recovery
    Digest,
    /// The shared secret itself
    Secret,
}

impl SharePoint {
    pub fn x(self) -> u8 {
        match self {
            Self::Fragment(index) => index,
            Self::Digest => DIGEST_INDEX,
            Self::Secret => SECRET_INDEX,
        }
    }
}

/// A point `(index, data)` where each byte of `data` is an independent
/// polynomial evaluated at `index`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RawShare {
    pub index: u8,
    pub data: Vec<u8>,
}

impl RawShare {
    pub fn new(index: u8, data: Vec<u8>) -> Self {
        Self { index, data }
    }
}

impl fmt::Debug for RawShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawShare")
            .field("index", &self.index)
            .field("len", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// First four bytes of `HMAC-SHA256(key = random_data, msg = secret)`.
pub fn create_digest(random_data: &[u8], secret: &[u8]) -> [u8; DIGEST_LEN] {
    let mut mac =
        <Hmac<Sha256> as Mac>::new_from_slice(random_data).expect("HMAC takes keys of any size");
    mac.update(secret);
    let tag = mac.finalize().into_bytes();
    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&tag[..DIGEST_LEN]);
    digest
}

/// Split `secret` into `count` shares, any `threshold` of which recover it.
///
/// With `threshold == 1` every share is a copy of the secret.
pub fn split_secret<R: RngCore + CryptoRng>(
    rng: &mut R,
    threshold: u8,
    count: u8,
    secret: &[u8],
) -> Result<Vec<RawShare>, ShamirError> {
    if threshold < 1 {
        return Err(ShamirError::InvalidConfig(
            "threshold must be at least 1".into(),
        ));
    }
    if threshold > count {
        return Err(ShamirError::InvalidConfig(format!(
            "threshold {} exceeds share count {}",
            threshold, count
        )));
    }
    if count > MAX_SHARE_COUNT {
        return Err(ShamirError::InvalidConfig(format!(
            "share count {} exceeds the maximum of {}",
            count, MAX_SHARE_COUNT
        )));
    }
    if secret.len() < MIN_SECRET_LEN {
        return Err(ShamirError::SecretLength(secret.len()));
    }

    if threshold == 1 {
        return Ok((0..count)
            .map(|index| RawShare::new(index, secret.to_vec()))
            .collect());
    }

    let random_count = threshold - 2;
    let mut shares: Vec<RawShare> = (0..random_count)
        .map(|index| {
            let mut data = vec![0u8; secret.len()];
            rng.fill_bytes(&mut data);
            RawShare::new(index, data)
        })
        .collect();

    let mut random_part = Zeroizing::new(vec![0u8; secret.len() - DIGEST_LEN]);
    rng.fill_bytes(&mut random_part);
    let mut digest_data = create_digest(&random_part, secret).to_vec();
    digest_data.extend_from_slice(&random_part);

    let mut base = shares.clone();
    base.push(RawShare::new(SharePoint::Digest.x(), digest_data));
    base.push(RawShare::new(SharePoint::Secret.x(), secret.to_vec()));

    for index in random_count..count {
        let data = interpolate(&base, index)?;
        shares.push(RawShare::new(index, data.to_vec()));
    }

    Ok(shares)
}

/// Recover the secret from shares of one split.
///
/// All given shares are used. For `threshold >= 2` the digest point is
/// interpolated too and checked against the recovered secret.
pub fn recover_secret(
    threshold: u8,
    shares: &[RawShare],
) -> Result<Zeroizing<Vec<u8>>, ShamirError> {
    if shares.len() < threshold as usize || shares.is_empty() {
        return Err(ShamirError::InvalidShare(format!(
            "need {} shares to recover, got {}",
            threshold,
            shares.len()
        )));
    }

    if threshold == 1 {
        return Ok(Zeroizing::new(shares[0].data.clone()));
    }

    let secret = interpolate(shares, SharePoint::Secret.x())?;
    let digest_share = interpolate(shares, SharePoint::Digest.x())?;
    let (digest, random_part) = digest_share.split_at(DIGEST_LEN);

    if digest != create_digest(random_part, &secret).as_slice() {
        return Err(ShamirError::DigestMismatch);
    }

    Ok(secret)
}

/// Evaluate at `x` the polynomial passing through every share.
pub fn interpolate(shares: &[RawShare], x: u8) -> Result<Zeroizing<Vec<u8>>, ShamirError> {
    let Some(first) = shares.first() else {
        return Err(ShamirError::InvalidShare("no shares to interpolate".into()));
    };

    let xs: Vec<u8> = shares.iter().map(|s| s.index).collect();
    if xs.iter().collect::<HashSet<_>>().len() != xs.len() {
        return Err(ShamirError::InvalidShare(
            "share x coordinates must be unique".into(),
        ));
    }

    let len = first.data.len();
    if shares.iter().any(|s| s.data.len() != len) {
        return Err(ShamirError::InvalidShare(
            "all share values must have the same length".into(),
        ));
    }

    if let Some(share) = shares.iter().find(|s| s.index == x) {
        return Ok(Zeroizing::new(share.data.clone()));
    }

    let basis = lagrange_basis(&xs, x);
    let mut result = Zeroizing::new(vec![0u8; len]);
    for (share, &li) in shares.iter().zip(&basis) {
        for (out, &y) in result.iter_mut().zip(&share.data) {
            *out ^= gf_mul(y, li);
        }
    }
    Ok(result)
}
