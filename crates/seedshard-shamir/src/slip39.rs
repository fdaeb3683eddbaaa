//! SLIP-39: Shamir's Secret-Sharing for Mnemonic Codes
//!
//! https://github.com/satoshilabs/slips/blob/master/slip-0039.md
//!
//! The master secret is encrypted under the passphrase, the ciphertext is
//! split across groups, and each group secret is split again across the
//! group's members. Recovery needs `member_threshold` shares from each of
//! `group_threshold` groups.

use crate::cipher::{EncryptedMasterSecret, MAX_ITERATION_EXPONENT};
use crate::shamir::{split_secret, MAX_SHARE_COUNT};
use crate::share::Share;
use crate::shares::ShareSet;
use crate::ShamirError;
use rand::{CryptoRng, RngCore};
use seedshard_core::{validate_passphrase, MasterSecret};
use serde::{Deserialize, Serialize};

/// Iteration exponent used unless configured otherwise.
pub const DEFAULT_ITERATION_EXPONENT: u8 = 1;

/// Largest 15-bit identifier.
pub const MAX_IDENTIFIER: u16 = 0x7FFF;

/// Configuration for SLIP-39 generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slip39Config {
    /// Fixed identifier (0-32767); random when `None`
    pub identifier: Option<u16>,
    /// Extendable backups leave the identifier out of the encryption salt
    pub extendable: bool,
    /// PBKDF2 cost: 10000 * 2^e iterations in total
    pub iteration_exponent: u8,
    /// Number of groups needed to recover
    pub group_threshold: u8,
    /// Groups: Vec<(member_threshold, member_count)>
    pub groups: Vec<(u8, u8)>,
}

impl Default for Slip39Config {
    fn default() -> Self {
        Self {
            identifier: None,
            extendable: true,
            iteration_exponent: DEFAULT_ITERATION_EXPONENT,
            group_threshold: 1,
            groups: vec![(2, 3)],
        }
    }
}

impl Slip39Config {
    /// Simple 2-of-3 setup (single group)
    pub fn two_of_three() -> Self {
        Self::default()
    }

    /// Simple 3-of-5 setup (single group)
    pub fn three_of_five() -> Self {
        Self {
            groups: vec![(3, 5)],
            ..Default::default()
        }
    }

    /// Multi-group setup
    pub fn with_groups(group_threshold: u8, groups: Vec<(u8, u8)>) -> Self {
        Self {
            group_threshold,
            groups,
            ..Default::default()
        }
    }

    pub fn with_iteration_exponent(mut self, iteration_exponent: u8) -> Self {
        self.iteration_exponent = iteration_exponent;
        self
    }

    pub fn with_identifier(mut self, identifier: u16) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn with_extendable(mut self, extendable: bool) -> Self {
        self.extendable = extendable;
        self
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Check every threshold and count.
    ///
    /// A group with threshold 1 must have exactly one member.
    pub fn validate(&self) -> Result<(), ShamirError> {
        let group_count = self.groups.len();
        if group_count == 0 {
            return Err(ShamirError::InvalidConfig(
                "at least one group is required".into(),
            ));
        }
        if group_count > MAX_SHARE_COUNT as usize {
            return Err(ShamirError::InvalidConfig(format!(
                "{} groups exceeds the maximum of {}",
                group_count, MAX_SHARE_COUNT
            )));
        }
        if self.group_threshold == 0 || self.group_threshold as usize > group_count {
            return Err(ShamirError::InvalidConfig(format!(
                "group threshold must be between 1 and {}, got {}",
                group_count, self.group_threshold
            )));
        }

        for (i, &(threshold, count)) in self.groups.iter().enumerate() {
            if count == 0 || count > MAX_SHARE_COUNT {
                return Err(ShamirError::InvalidConfig(format!(
                    "group {} member count must be between 1 and {}, got {}",
                    i + 1,
                    MAX_SHARE_COUNT,
                    count
                )));
            }
            if threshold == 0 || threshold > count {
                return Err(ShamirError::InvalidConfig(format!(
                    "group {} member threshold must be between 1 and {}, got {}",
                    i + 1,
                    count,
                    threshold
                )));
            }
            if threshold == 1 && count > 1 {
                return Err(ShamirError::InvalidConfig(format!(
                    "group {} uses threshold 1 with {} members; use 1-of-1 instead",
                    i + 1,
                    count
                )));
            }
        }

        if self.iteration_exponent > MAX_ITERATION_EXPONENT {
            return Err(ShamirError::InvalidConfig(format!(
                "iteration exponent {} exceeds {}",
                self.iteration_exponent, MAX_ITERATION_EXPONENT
            )));
        }
        if let Some(id) = self.identifier {
            if id > MAX_IDENTIFIER {
                return Err(ShamirError::InvalidConfig(format!(
                    "identifier {} does not fit in 15 bits",
                    id
                )));
            }
        }
        Ok(())
    }
}

/// Generate SLIP-39 shares from a master secret using the thread RNG.
///
/// Returns one `Vec<Share>` per configured group.
pub fn generate_shares(
    master_secret: &MasterSecret,
    passphrase: &str,
    config: &Slip39Config,
) -> Result<Vec<Vec<Share>>, ShamirError> {
    generate_shares_with_rng(&mut rand::thread_rng(), master_secret, passphrase, config)
}

/// Generate SLIP-39 shares drawing all randomness from `rng`.
pub fn generate_shares_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    master_secret: &MasterSecret,
    passphrase: &str,
    config: &Slip39Config,
) -> Result<Vec<Vec<Share>>, ShamirError> {
    // Reject bad input before any randomness is drawn
    config.validate()?;
    validate_passphrase(passphrase)?;

    let identifier = config
        .identifier
        .unwrap_or_else(|| (rng.next_u32() & MAX_IDENTIFIER as u32) as u16);

    let ems = EncryptedMasterSecret::encrypt(
        master_secret,
        passphrase,
        identifier,
        config.extendable,
        config.iteration_exponent,
    )?;

    let group_count = config.groups.len() as u8;
    let group_secrets = split_secret(rng, config.group_threshold, group_count, ems.as_bytes())?;

    let mut all_groups = Vec::with_capacity(config.groups.len());
    for (group, &(member_threshold, member_count)) in group_secrets.iter().zip(&config.groups) {
        let members = split_secret(rng, member_threshold, member_count, &group.data)?;
        let shares: Vec<Share> = members
            .iter()
            .map(|member| Share {
                identifier,
                extendable: config.extendable,
                iteration_exponent: config.iteration_exponent,
                group_index: group.index,
                group_threshold: config.group_threshold,
                group_count,
                member_index: member.index,
                member_threshold,
                value: member.data.clone(),
            })
            .collect();
        all_groups.push(shares);
    }

    log::debug!(
        "split {}-byte secret into {} group(s), {} required",
        master_secret.len(),
        group_count,
        config.group_threshold
    );

    Ok(all_groups)
}

/// Combine decoded shares to recover the master secret.
///
/// Every share is used; exact duplicates are ignored. Groups short of their
/// member threshold are skipped as long as enough other groups are complete.
pub fn combine_shares(shares: &[Share], passphrase: &str) -> Result<MasterSecret, ShamirError> {
    validate_passphrase(passphrase)?;

    let mut set = ShareSet::new();
    for share in shares {
        set.add(share.clone())?;
    }
    set.recover(passphrase)
}

/// Decode mnemonics and combine them.
///
/// Every mnemonic is decoded before giving up, so all shares that need
/// re-entering are reported together: one as `ShareRejected`, several as
/// `SharesRejected`, each with its position in `mnemonics`.
pub fn combine_mnemonics<S: AsRef<str>>(
    mnemonics: &[S],
    passphrase: &str,
) -> Result<MasterSecret, ShamirError> {
    let mut shares = Vec::with_capacity(mnemonics.len());
    let mut rejected = Vec::new();
    for (position, mnemonic) in mnemonics.iter().enumerate() {
        match Share::from_mnemonic(mnemonic.as_ref()) {
            Ok(share) => shares.push(share),
            Err(e) => rejected.push(ShamirError::ShareRejected {
                position,
                source: Box::new(e),
            }),
        }
    }

    match rejected.len() {
        0 => combine_shares(&shares, passphrase),
        1 => Err(rejected.remove(0)),
        n => {
            log::debug!("{} of {} shares failed to decode", n, mnemonics.len());
            Err(ShamirError::SharesRejected(rejected))
        }
    }
}
