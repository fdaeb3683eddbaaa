//! BIP-39 seed phrases
//!
//! Encodes entropy as a checksummed mnemonic and back. The checksum is the
//! first `ENT / 32` bits of SHA-256(entropy), appended to the entropy before
//! the bit string is carved into 11-bit word indices.

use crate::secret::MasterSecret;
use crate::wordlist::{bip39_english, bits_to_bytes, bytes_to_bits, WordlistError};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("Invalid entropy length: {0} bytes (must be 16, 20, 24, 28 or 32)")]
    EntropyLength(usize),
    #[error("Invalid word count: {0} (must be 12, 15, 18, 21 or 24)")]
    WordCount(usize),
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error(transparent)]
    Wordlist(#[from] WordlistError),
}

/// Supported seed phrase lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    Words12,
    Words15,
    Words18,
    Words21,
    Words24,
}

impl WordCount {
    pub fn from_words(count: usize) -> Result<Self, SeedError> {
        match count {
            12 => Ok(Self::Words12),
            15 => Ok(Self::Words15),
            18 => Ok(Self::Words18),
            21 => Ok(Self::Words21),
            24 => Ok(Self::Words24),
            other => Err(SeedError::WordCount(other)),
        }
    }

    pub fn from_entropy_len(len: usize) -> Result<Self, SeedError> {
        match len {
            16 => Ok(Self::Words12),
            20 => Ok(Self::Words15),
            24 => Ok(Self::Words18),
            28 => Ok(Self::Words21),
            32 => Ok(Self::Words24),
            other => Err(SeedError::EntropyLength(other)),
        }
    }

    pub fn words(self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words15 => 15,
            Self::Words18 => 18,
            Self::Words21 => 21,
            Self::Words24 => 24,
        }
    }

    pub fn entropy_len(self) -> usize {
        self.words() * 4 / 3
    }

    fn checksum_bits(self) -> usize {
        self.entropy_len() / 4
    }
}

/// Encode entropy as a seed phrase.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Vec<&'static str>, SeedError> {
    let count = WordCount::from_entropy_len(entropy.len())?;

    let mut bits = Zeroizing::new(bytes_to_bits(entropy));
    let hash = Sha256::digest(entropy);
    bits.extend(bytes_to_bits(&hash).into_iter().take(count.checksum_bits()));

    Ok(bip39_english().encode(&bits)?)
}

/// Decode a seed phrase back into its entropy, verifying the checksum.
pub fn mnemonic_to_entropy<S: AsRef<str>>(words: &[S]) -> Result<Zeroizing<Vec<u8>>, SeedError> {
    let count = WordCount::from_words(words.len())?;

    let bits = Zeroizing::new(bip39_english().decode(words)?);
    let split = count.entropy_len() * 8;
    let entropy = Zeroizing::new(bits_to_bytes(&bits[..split]));

    let hash = Sha256::digest(entropy.as_slice());
    let expected = bytes_to_bits(&hash);
    if bits[split..] != expected[..count.checksum_bits()] {
        return Err(SeedError::InvalidMnemonic("checksum mismatch".into()));
    }

    Ok(entropy)
}

/// Split a phrase on whitespace and decode it.
pub fn parse_mnemonic(phrase: &str) -> Result<MasterSecret, SeedError> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let entropy = mnemonic_to_entropy(&words)?;
    MasterSecret::new(&entropy).map_err(|e| SeedError::InvalidMnemonic(e.to_string()))
}

/// Generate fresh entropy and its seed phrase.
pub fn generate_mnemonic<R: RngCore + CryptoRng>(
    rng: &mut R,
    count: WordCount,
) -> Result<(MasterSecret, Vec<&'static str>), SeedError> {
    let secret = MasterSecret::generate(rng, count.entropy_len())
        .map_err(|e| SeedError::InvalidMnemonic(e.to_string()))?;
    let words = entropy_to_mnemonic(secret.as_bytes())?;
    Ok((secret, words))
}
