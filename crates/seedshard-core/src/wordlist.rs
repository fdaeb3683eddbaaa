//! Wordlist codec
//!
//! Maps big-endian bit strings to words from a fixed, ordered wordlist and
//! back. A list of 2^n words carries n bits per word: the 1024-word SLIP-39
//! list packs 10-bit indices, the 2048-word BIP-39 list packs 11-bit indices.
//!
//! Lookups are exact. Callers are expected to hand in words that were already
//! trimmed and lower-cased.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordlistError {
    #[error("Word not found in wordlist: {0}")]
    UnknownWord(String),

    #[error("Bit string of {len} bits is not a multiple of the {width}-bit word width")]
    Length { len: usize, width: usize },

    #[error("Invalid word index {index} for a list of {size} words")]
    InvalidIndex { index: u16, size: usize },

    #[error("Wordlist must contain exactly {expected} distinct words, found {found}")]
    InvalidSize { expected: usize, found: usize },
}

/// An ordered wordlist of exactly `2^radix_bits` distinct words.
pub struct Wordlist {
    words: Vec<&'static str>,
    index: HashMap<&'static str, u16>,
    radix_bits: usize,
}

impl Wordlist {
    /// Build a wordlist from static words. The count must be `2^radix_bits`
    /// and every word must be distinct.
    pub fn new(words: Vec<&'static str>, radix_bits: usize) -> Result<Self, WordlistError> {
        let expected = 1usize << radix_bits;
        let index: HashMap<&'static str, u16> = words
            .iter()
            .enumerate()
            .map(|(i, &w)| (w, i as u16))
            .collect();

        if words.len() != expected || index.len() != expected {
            return Err(WordlistError::InvalidSize {
                expected,
                found: index.len().min(words.len()),
            });
        }

        Ok(Self {
            words,
            index,
            radix_bits,
        })
    }

    /// Build a wordlist from newline-separated text (e.g. `include_str!`).
    pub fn from_text(text: &'static str, radix_bits: usize) -> Result<Self, WordlistError> {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::new(words, radix_bits)
    }

    /// Bits carried by each word.
    pub fn radix_bits(&self) -> usize {
        self.radix_bits
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[&'static str] {
        &self.words
    }

    pub fn word(&self, index: u16) -> Result<&'static str, WordlistError> {
        self.words
            .get(index as usize)
            .copied()
            .ok_or(WordlistError::InvalidIndex {
                index,
                size: self.words.len(),
            })
    }

    pub fn index_of(&self, word: &str) -> Result<u16, WordlistError> {
        self.index
            .get(word)
            .copied()
            .ok_or_else(|| WordlistError::UnknownWord(word.to_string()))
    }

    pub fn indices_to_words(&self, indices: &[u16]) -> Result<Vec<&'static str>, WordlistError> {
        indices.iter().map(|&i| self.word(i)).collect()
    }

    pub fn words_to_indices<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<u16>, WordlistError> {
        words.iter().map(|w| self.index_of(w.as_ref())).collect()
    }

    /// Encode a bit string as words. The length must be a multiple of
    /// [`radix_bits`](Self::radix_bits).
    pub fn encode(&self, bits: &[bool]) -> Result<Vec<&'static str>, WordlistError> {
        let indices = bits_to_indices(bits, self.radix_bits)?;
        self.indices_to_words(&indices)
    }

    /// Decode words back into the bit string they carry.
    pub fn decode<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<bool>, WordlistError> {
        let indices = self.words_to_indices(words)?;
        Ok(indices_to_bits(&indices, self.radix_bits))
    }
}

impl fmt::Debug for Wordlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wordlist")
            .field("len", &self.words.len())
            .field("radix_bits", &self.radix_bits)
            .finish()
    }
}

/// The BIP-39 English list, taken from the `bip39` crate so it matches the
/// published list exactly.
static BIP39_ENGLISH: Lazy<Wordlist> = Lazy::new(|| {
    Wordlist::new(bip39::Language::English.word_list().to_vec(), 11)
        .expect("bip39 English list has 2048 distinct words")
});

pub fn bip39_english() -> &'static Wordlist {
    &BIP39_ENGLISH
}

// ============================================================================
// Bit string helpers (MSB first)
// ============================================================================

/// Push the low `width` bits of `value`, most significant first.
pub fn push_bits(bits: &mut Vec<bool>, value: u32, width: usize) {
    for i in (0..width).rev() {
        bits.push((value >> i) & 1 != 0);
    }
}

/// Read a big-endian integer from at most 32 bits.
pub fn read_bits(bits: &[bool]) -> u32 {
    debug_assert!(bits.len() <= 32);
    bits.iter().fold(0u32, |acc, &bit| (acc << 1) | bit as u32)
}

pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        push_bits(&mut bits, byte as u32, 8);
    }
    bits
}

/// Pack bits into bytes. Trailing bits that do not fill a byte are dropped.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8).map(|chunk| read_bits(chunk) as u8).collect()
}

pub fn indices_to_bits(indices: &[u16], width: usize) -> Vec<bool> {
    let mut bits = Vec::with_capacity(indices.len() * width);
    for &index in indices {
        push_bits(&mut bits, index as u32, width);
    }
    bits
}

pub fn bits_to_indices(bits: &[bool], width: usize) -> Result<Vec<u16>, WordlistError> {
    if width == 0 || bits.len() % width != 0 {
        return Err(WordlistError::Length {
            len: bits.len(),
            width,
        });
    }
    Ok(bits
        .chunks_exact(width)
        .map(|chunk| read_bits(chunk) as u16)
        .collect())
}
