//! SeedShard Core
//!
//! Building blocks shared by the sharing layer and the CLI.
//!
//! # Contents
//!
//! - [`memory`]: mlocked, zeroize-on-drop buffers and core dump prevention
//! - [`secret`]: the [`MasterSecret`] type
//! - [`wordlist`]: bit string <-> word codec over a 2^n word list
//! - [`seed`]: BIP-39 seed phrases
//! - [`passphrase`]: printable-ASCII passphrase checks and generation

pub mod memory;
pub mod passphrase;
pub mod secret;
pub mod seed;
pub mod wordlist;

pub use memory::{disable_core_dumps, SecretBuffer};
pub use passphrase::{
    generate_passphrase, validate_passphrase, PassphraseError, PassphraseStrength,
};
pub use secret::{MasterSecret, SecretError, MIN_SECRET_LEN};
pub use seed::{
    entropy_to_mnemonic, generate_mnemonic, mnemonic_to_entropy, parse_mnemonic, SeedError,
    WordCount,
};
pub use wordlist::{Wordlist, WordlistError};
