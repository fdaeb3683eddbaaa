//! Passphrases for share encryption
//!
//! SLIP-39 passphrases must be printable ASCII. This module validates them,
//! generates random ones from a fixed character set and gives a rough
//! strength estimate so callers can warn about weak user-chosen phrases.
//!
//! | Level     | Bits   |
//! |-----------|--------|
//! | Dangerous | < 28   |
//! | Weak      | 28–59  |
//! | Strong    | 60–127 |
//! | Excellent | ≥ 128  |

use rand::{CryptoRng, Rng};
use thiserror::Error;
use zeroize::Zeroizing;

/// Characters used for generated passphrases.
pub const PASSPHRASE_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()-_=+";

pub const DEFAULT_PASSPHRASE_LEN: usize = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PassphraseError {
    #[error("Passphrase must contain only printable ASCII characters (code points 32-126), found byte {byte:#04x} at position {position}")]
    NonPrintable { position: usize, byte: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PassphraseStrength {
    Dangerous,
    Weak,
    Strong,
    Excellent,
}

impl PassphraseStrength {
    fn from_bits(bits: f64) -> Self {
        match bits {
            b if b < 28.0 => Self::Dangerous,
            b if b < 60.0 => Self::Weak,
            b if b < 128.0 => Self::Strong,
            _ => Self::Excellent,
        }
    }

    pub fn is_recommended(&self) -> bool {
        *self >= Self::Strong
    }
}

/// Check that every byte is printable ASCII. The empty passphrase is valid.
pub fn validate_passphrase(passphrase: &str) -> Result<(), PassphraseError> {
    match passphrase
        .bytes()
        .enumerate()
        .find(|&(_, b)| !(32..=126).contains(&b))
    {
        Some((position, byte)) => Err(PassphraseError::NonPrintable { position, byte }),
        None => Ok(()),
    }
}

/// Generate a random passphrase of `len` characters from [`PASSPHRASE_CHARSET`].
pub fn generate_passphrase<R: Rng + CryptoRng>(rng: &mut R, len: usize) -> Zeroizing<String> {
    let mut out = Zeroizing::new(String::with_capacity(len));
    for _ in 0..len {
        let idx = rng.gen_range(0..PASSPHRASE_CHARSET.len());
        out.push(PASSPHRASE_CHARSET[idx] as char);
    }
    out
}

/// Estimate passphrase entropy from its character classes and length.
///
/// Deliberately crude: a long run of one character still scores as if each
/// position were independent, so treat the result as an upper bound.
pub fn estimate_entropy_bits(passphrase: &str) -> f64 {
    let mut charset = 0.0;
    if passphrase.bytes().any(|b| b.is_ascii_lowercase()) {
        charset += 26.0;
    }
    if passphrase.bytes().any(|b| b.is_ascii_uppercase()) {
        charset += 26.0;
    }
    if passphrase.bytes().any(|b| b.is_ascii_digit()) {
        charset += 10.0;
    }
    if passphrase
        .bytes()
        .any(|b| b.is_ascii_punctuation() || b == b' ')
    {
        charset += 33.0;
    }
    if charset == 0.0 {
        return 0.0;
    }
    passphrase.len() as f64 * f64::log2(charset)
}

pub fn estimate_strength(passphrase: &str) -> PassphraseStrength {
    PassphraseStrength::from_bits(estimate_entropy_bits(passphrase))
}
