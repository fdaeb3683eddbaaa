//! SeedShard Shamir Module
//!
//! SLIP-39 Shamir's Secret Sharing: split a master secret into mnemonic
//! shares organised in groups, and recover it from any qualifying subset.
//!
//! # Layers
//!
//! - [`gf256`]: field arithmetic and Lagrange interpolation
//! - [`shamir`]: one-level threshold split and recover with a digest check
//! - [`cipher`]: passphrase-keyed Feistel encryption of the master secret
//! - [`rs1024`] and [`share`]: the checksummed word encoding of one share
//! - [`slip39`]: the two-level (group, member) scheme tying it together
//! - [`shares`]: incremental collection of shares during recovery
//!
//! # Example
//!
//! ```
//! use seedshard_core::MasterSecret;
//! use seedshard_shamir::slip39::{combine_mnemonics, generate_shares, Slip39Config};
//!
//! let secret = MasterSecret::new(&[0x42u8; 16]).unwrap();
//! let config = Slip39Config::two_of_three().with_iteration_exponent(0);
//! let groups = generate_shares(&secret, "", &config).unwrap();
//!
//! // Any 2 of the 3 shares recover the secret
//! let mnemonics: Vec<String> = groups[0][1..]
//!     .iter()
//!     .map(|share| share.to_mnemonic())
//!     .collect();
//! let recovered = combine_mnemonics(&mnemonics, "").unwrap();
//! assert_eq!(recovered, secret);
//! ```

pub mod cipher;
pub mod gf256;
pub mod rs1024;
pub mod shamir;
pub mod share;
pub mod shares;
pub mod slip39;
pub mod wordlist;

pub use cipher::EncryptedMasterSecret;
pub use share::Share;
pub use shares::{GroupStatus, ShareSet};
pub use slip39::{
    combine_mnemonics, combine_shares, generate_shares, generate_shares_with_rng, Slip39Config,
};

use seedshard_core::{PassphraseError, WordlistError};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShamirError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Master secret must be an even number of bytes, at least 16 (got {0})")]
    SecretLength(usize),

    #[error("Invalid share: {0}")]
    InvalidShare(String),

    #[error("Invalid share checksum")]
    Checksum,

    #[error("Share {} rejected: {source}", .position + 1)]
    ShareRejected {
        /// Zero-based position of the share in the caller's input
        position: usize,
        source: Box<ShamirError>,
    },

    /// More than one share failed to decode; each entry is a `ShareRejected`.
    #[error("{} shares rejected: {}", .0.len(), describe_rejections(.0))]
    SharesRejected(Vec<ShamirError>),

    #[error("Shares do not belong to the same split: {0}")]
    MismatchedSet(String),

    #[error("Conflicting shares for group {} member {}", .group_index + 1, .member_index + 1)]
    DuplicateShare { group_index: u8, member_index: u8 },

    #[error("Digest verification failed: shares are corrupted or were combined incorrectly")]
    DigestMismatch,

    #[error("Insufficient shares: {}", describe_insufficient(.group_threshold, .groups_complete, .shortfalls))]
    InsufficientShares {
        group_threshold: u8,
        groups_complete: u8,
        shortfalls: Vec<GroupShortfall>,
    },

    #[error("Invalid passphrase: {0}")]
    InvalidPassphrase(#[from] PassphraseError),

    #[error(transparent)]
    Wordlist(#[from] WordlistError),
}

impl ShamirError {
    /// Whether the error concerns a single share that could be re-entered,
    /// as opposed to the set of shares as a whole.
    pub fn is_per_share(&self) -> bool {
        matches!(
            self,
            Self::Checksum
                | Self::InvalidShare(_)
                | Self::Wordlist(_)
                | Self::ShareRejected { .. }
                | Self::SharesRejected(_)
        )
    }

    /// Zero-based input positions of the shares this error rejects.
    pub fn rejected_positions(&self) -> Vec<usize> {
        match self {
            Self::ShareRejected { position, .. } => vec![*position],
            Self::SharesRejected(errors) => {
                errors.iter().flat_map(|e| e.rejected_positions()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// How far one group is from its member threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupShortfall {
    pub group_index: u8,
    pub have: u8,
    pub need: u8,
}

impl GroupShortfall {
    pub fn missing(&self) -> u8 {
        self.need.saturating_sub(self.have)
    }
}

impl fmt::Display for GroupShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing = self.missing();
        write!(
            f,
            "group {} needs {} more share{}",
            self.group_index + 1,
            missing,
            if missing == 1 { "" } else { "s" }
        )
    }
}

fn describe_insufficient(
    group_threshold: &u8,
    groups_complete: &u8,
    shortfalls: &[GroupShortfall],
) -> String {
    let mut msg = format!(
        "{} of {} required group{} complete",
        groups_complete,
        group_threshold,
        if *group_threshold == 1 { "" } else { "s" }
    );
    for shortfall in shortfalls {
        msg.push_str("; ");
        msg.push_str(&shortfall.to_string());
    }
    msg
}

fn describe_rejections(errors: &[ShamirError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
