//! Passphrase encryption of the master secret
//!
//! A 4-round Feistel network whose round function is PBKDF2-HMAC-SHA256.
//! The secret is split into halves `L || R`; each round computes
//! `(L, R) = (R, L ^ F(i, R))` and the output is `R || L`. Decryption runs
//! the same rounds in reverse order.
//!
//! There is no passphrase check: every passphrase decrypts to some valid
//! looking secret. The empty passphrase is still run through all rounds.

use crate::ShamirError;
use pbkdf2::pbkdf2_hmac;
use seedshard_core::{validate_passphrase, MasterSecret};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

/// Total PBKDF2 iterations at exponent 0, spread over all rounds.
pub const BASE_ITERATION_COUNT: u32 = 10000;

pub const ROUND_COUNT: u8 = 4;

/// Largest exponent the 4-bit share field can carry.
pub const MAX_ITERATION_EXPONENT: u8 = 15;

const SALT_PREFIX: &[u8] = b"shamir";

/// The master secret after Feistel encryption. This is the value that gets
/// split into shares.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedMasterSecret {
    identifier: u16,
    extendable: bool,
    iteration_exponent: u8,
    ciphertext: Zeroizing<Vec<u8>>,
}

impl EncryptedMasterSecret {
    /// Encrypt `master_secret` under `passphrase`.
    pub fn encrypt(
        master_secret: &MasterSecret,
        passphrase: &str,
        identifier: u16,
        extendable: bool,
        iteration_exponent: u8,
    ) -> Result<Self, ShamirError> {
        validate_passphrase(passphrase)?;
        check_iteration_exponent(iteration_exponent)?;

        let salt = salt_prefix(identifier, extendable);
        let ciphertext = feistel(
            master_secret.as_bytes(),
            passphrase.as_bytes(),
            &salt,
            iteration_exponent,
            0..ROUND_COUNT,
        );

        log::debug!(
            "encrypted {}-byte master secret (extendable={}, iteration exponent {})",
            master_secret.len(),
            extendable,
            iteration_exponent
        );

        Ok(Self {
            identifier,
            extendable,
            iteration_exponent,
            ciphertext,
        })
    }

    /// Reassemble from recovered share data.
    pub fn from_parts(
        identifier: u16,
        extendable: bool,
        iteration_exponent: u8,
        ciphertext: Zeroizing<Vec<u8>>,
    ) -> Result<Self, ShamirError> {
        check_iteration_exponent(iteration_exponent)?;
        if ciphertext.len() < seedshard_core::MIN_SECRET_LEN || ciphertext.len() % 2 != 0 {
            return Err(ShamirError::SecretLength(ciphertext.len()));
        }
        Ok(Self {
            identifier,
            extendable,
            iteration_exponent,
            ciphertext,
        })
    }

    /// Decrypt with `passphrase`. A wrong passphrase yields a different secret.
    pub fn decrypt(&self, passphrase: &str) -> Result<MasterSecret, ShamirError> {
        validate_passphrase(passphrase)?;

        let salt = salt_prefix(self.identifier, self.extendable);
        let plaintext = feistel(
            &self.ciphertext,
            passphrase.as_bytes(),
            &salt,
            self.iteration_exponent,
            (0..ROUND_COUNT).rev(),
        );

        MasterSecret::new(&plaintext).map_err(|_| ShamirError::SecretLength(plaintext.len()))
    }

    pub fn identifier(&self) -> u16 {
        self.identifier
    }

    pub fn is_extendable(&self) -> bool {
        self.extendable
    }

    pub fn iteration_exponent(&self) -> u8 {
        self.iteration_exponent
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn len(&self) -> usize {
        self.ciphertext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }
}

impl fmt::Debug for EncryptedMasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedMasterSecret")
            .field("identifier", &self.identifier)
            .field("extendable", &self.extendable)
            .field("iteration_exponent", &self.iteration_exponent)
            .field("len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}

fn check_iteration_exponent(e: u8) -> Result<(), ShamirError> {
    if e > MAX_ITERATION_EXPONENT {
        return Err(ShamirError::InvalidConfig(format!(
            "iteration exponent {} exceeds {}",
            e, MAX_ITERATION_EXPONENT
        )));
    }
    Ok(())
}

/// Extendable backups drop the identifier from the salt so that new shares
/// for the same secret can be issued under a fresh identifier.
fn salt_prefix(identifier: u16, extendable: bool) -> Vec<u8> {
    if extendable {
        Vec::new()
    } else {
        let mut salt = SALT_PREFIX.to_vec();
        salt.extend_from_slice(&identifier.to_be_bytes());
        salt
    }
}

fn round_function(
    round: u8,
    passphrase: &[u8],
    iteration_exponent: u8,
    salt_prefix: &[u8],
    r: &[u8],
) -> Zeroizing<Vec<u8>> {
    let iterations = (BASE_ITERATION_COUNT << iteration_exponent) / ROUND_COUNT as u32;

    let mut password = Zeroizing::new(Vec::with_capacity(1 + passphrase.len()));
    password.push(round);
    password.extend_from_slice(passphrase);

    let mut salt = salt_prefix.to_vec();
    salt.extend_from_slice(r);

    let mut output = Zeroizing::new(vec![0u8; r.len()]);
    pbkdf2_hmac::<Sha256>(&password, &salt, iterations, &mut output);
    output
}

fn feistel(
    data: &[u8],
    passphrase: &[u8],
    salt_prefix: &[u8],
    iteration_exponent: u8,
    rounds: impl Iterator<Item = u8>,
) -> Zeroizing<Vec<u8>> {
    let half = data.len() / 2;
    let mut l = Zeroizing::new(data[..half].to_vec());
    let mut r = Zeroizing::new(data[half..].to_vec());

    for round in rounds {
        let f = round_function(round, passphrase, iteration_exponent, salt_prefix, &r);
        let next_r: Vec<u8> = l.iter().zip(f.iter()).map(|(a, b)| a ^ b).collect();
        l = std::mem::replace(&mut r, Zeroizing::new(next_r));
    }

    let mut out = Zeroizing::new(Vec::with_capacity(data.len()));
    out.extend_from_slice(&r);
    out.extend_from_slice(&l);
    out
}
