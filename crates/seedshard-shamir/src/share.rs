//! Share wire format
//!
//! A share is a sequence of 10-bit words:
//!
//! | Field                 | Bits |
//! |-----------------------|------|
//! | identifier            | 15   |
//! | extendable flag       | 1    |
//! | iteration exponent    | 4    |
//! | group index           | 4    |
//! | group threshold - 1   | 4    |
//! | group count - 1       | 4    |
//! | member index          | 4    |
//! | member threshold - 1  | 4    |
//! | zero padding + value  | 10 * ceil(8 * len / 10) |
//! | RS1024 checksum       | 30   |
//!
//! A 128-bit secret gives 20 words, a 256-bit secret gives 33.

use crate::cipher::MAX_ITERATION_EXPONENT;
use crate::rs1024::{create_checksum, verify_checksum, CHECKSUM_WORDS};
use crate::shamir::MAX_SHARE_COUNT;
use crate::slip39::MAX_IDENTIFIER;
use crate::wordlist::{slip39_english, RADIX_BITS};
use crate::ShamirError;
use seedshard_core::wordlist::{bits_to_bytes, bits_to_indices, indices_to_bits, push_bits, read_bits};
use seedshard_core::MIN_SECRET_LEN;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// Words taken by the header fields.
pub const METADATA_WORDS: usize = 4;

const METADATA_BITS: usize = METADATA_WORDS * RADIX_BITS;

/// Shortest valid share: 128-bit value.
pub const MIN_MNEMONIC_WORDS: usize = 20;

/// Words in a share carrying a value of `value_len` bytes.
pub fn word_count(value_len: usize) -> usize {
    METADATA_WORDS + value_words(value_len) + CHECKSUM_WORDS
}

fn value_words(value_len: usize) -> usize {
    (value_len * 8).div_ceil(RADIX_BITS)
}

/// Parameters every share of one split carries identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommonParameters {
    pub identifier: u16,
    pub extendable: bool,
    pub iteration_exponent: u8,
    pub group_threshold: u8,
    pub group_count: u8,
}

/// One decoded SLIP-39 share.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Random 15-bit identifier common to all shares of a split
    pub identifier: u16,
    pub extendable: bool,
    pub iteration_exponent: u8,
    /// Zero-based group index
    pub group_index: u8,
    pub group_threshold: u8,
    pub group_count: u8,
    /// Zero-based member index within the group
    pub member_index: u8,
    pub member_threshold: u8,
    /// Share value, same length as the master secret
    pub value: Vec<u8>,
}

impl Share {
    pub fn common_parameters(&self) -> CommonParameters {
        CommonParameters {
            identifier: self.identifier,
            extendable: self.extendable,
            iteration_exponent: self.iteration_exponent,
            group_threshold: self.group_threshold,
            group_count: self.group_count,
        }
    }

    /// Number of words this share encodes to.
    pub fn word_count(&self) -> usize {
        word_count(self.value.len())
    }

    /// Check that every header field fits its wire width, the header is
    /// coherent, and the value can carry a master secret.
    pub fn validate(&self) -> Result<(), ShamirError> {
        let invalid = |msg: String| -> Result<(), ShamirError> {
            Err(ShamirError::InvalidShare(msg))
        };
        if let Some(msg) = self.width_error() {
            return invalid(msg);
        }
        if self.group_threshold > self.group_count {
            return invalid(format!(
                "group threshold {} exceeds group count {}",
                self.group_threshold, self.group_count
            ));
        }
        if self.group_index >= self.group_count {
            return invalid(format!(
                "group index {} is out of range for {} groups",
                self.group_index, self.group_count
            ));
        }
        if self.value.len() < MIN_SECRET_LEN || self.value.len() % 2 != 0 {
            return invalid(format!(
                "share value of {} bytes cannot carry a master secret",
                self.value.len()
            ));
        }
        Ok(())
    }

    /// First field that does not fit its bits in the header, if any.
    fn width_error(&self) -> Option<String> {
        let in_range = |value: u8, low: u8, high: u8| (low..=high).contains(&value);
        if self.identifier > MAX_IDENTIFIER {
            Some(format!("identifier {} does not fit 15 bits", self.identifier))
        } else if self.iteration_exponent > MAX_ITERATION_EXPONENT {
            Some(format!(
                "iteration exponent {} is above {}",
                self.iteration_exponent, MAX_ITERATION_EXPONENT
            ))
        } else if !in_range(self.group_index, 0, MAX_SHARE_COUNT - 1) {
            Some(format!("group index {} does not fit 4 bits", self.group_index))
        } else if !in_range(self.group_threshold, 1, MAX_SHARE_COUNT) {
            Some(format!("group threshold {} is outside 1..=16", self.group_threshold))
        } else if !in_range(self.group_count, 1, MAX_SHARE_COUNT) {
            Some(format!("group count {} is outside 1..=16", self.group_count))
        } else if !in_range(self.member_index, 0, MAX_SHARE_COUNT - 1) {
            Some(format!("member index {} does not fit 4 bits", self.member_index))
        } else if !in_range(self.member_threshold, 1, MAX_SHARE_COUNT) {
            Some(format!("member threshold {} is outside 1..=16", self.member_threshold))
        } else {
            None
        }
    }

    /// Encode as 10-bit word indices, checksum included.
    ///
    /// # Panics
    ///
    /// Panics if a header field does not fit its wire width, for example a
    /// member index of 16 or a group threshold of 0. Shares from
    /// [`Share::from_indices`] or a split always fit; check hand-built
    /// shares with [`Share::validate`] first.
    pub fn to_indices(&self) -> Vec<u16> {
        if let Some(msg) = self.width_error() {
            panic!("cannot encode share: {}", msg);
        }

        let mut bits = Vec::with_capacity(self.word_count() * RADIX_BITS);
        push_bits(&mut bits, self.identifier as u32, 15);
        push_bits(&mut bits, self.extendable as u32, 1);
        push_bits(&mut bits, self.iteration_exponent as u32, 4);
        push_bits(&mut bits, self.group_index as u32, 4);
        push_bits(&mut bits, self.group_threshold as u32 - 1, 4);
        push_bits(&mut bits, self.group_count as u32 - 1, 4);
        push_bits(&mut bits, self.member_index as u32, 4);
        push_bits(&mut bits, self.member_threshold as u32 - 1, 4);

        let padding = value_words(self.value.len()) * RADIX_BITS - self.value.len() * 8;
        bits.resize(bits.len() + padding, false);
        for &byte in &self.value {
            push_bits(&mut bits, byte as u32, 8);
        }

        let mut indices =
            bits_to_indices(&bits, RADIX_BITS).expect("share bits fill whole words");
        bits.zeroize();

        let checksum = create_checksum(self.extendable, &indices);
        indices.extend_from_slice(&checksum);
        indices
    }

    pub fn to_words(&self) -> Vec<&'static str> {
        let mut indices = self.to_indices();
        let words = slip39_english()
            .indices_to_words(&indices)
            .expect("10-bit indices are always in range");
        indices.zeroize();
        words
    }

    /// The share as a space-separated mnemonic.
    pub fn to_mnemonic(&self) -> String {
        self.to_words().join(" ")
    }

    /// Decode 10-bit word indices, verifying the checksum and field ranges.
    pub fn from_indices(indices: &[u16]) -> Result<Self, ShamirError> {
        if indices.len() < MIN_MNEMONIC_WORDS {
            return Err(ShamirError::InvalidShare(format!(
                "share has {} words, at least {} are required",
                indices.len(),
                MIN_MNEMONIC_WORDS
            )));
        }

        let value_bits = (indices.len() - METADATA_WORDS - CHECKSUM_WORDS) * RADIX_BITS;
        let padding = value_bits % 16;
        if padding > 8 {
            return Err(ShamirError::InvalidShare(format!(
                "{} words is not a valid share length",
                indices.len()
            )));
        }

        // The extendable flag is bit 15, which selects the checksum key
        let extendable = (indices[1] >> 4) & 1 == 1;
        if !verify_checksum(extendable, indices) {
            return Err(ShamirError::Checksum);
        }

        let mut bits = indices_to_bits(&indices[..indices.len() - CHECKSUM_WORDS], RADIX_BITS);
        let field = |start: usize, width: usize| read_bits(&bits[start..start + width]);

        let mut share = Share {
            identifier: field(0, 15) as u16,
            extendable,
            iteration_exponent: field(16, 4) as u8,
            group_index: field(20, 4) as u8,
            group_threshold: field(24, 4) as u8 + 1,
            group_count: field(28, 4) as u8 + 1,
            member_index: field(32, 4) as u8,
            member_threshold: field(36, 4) as u8 + 1,
            value: Vec::new(),
        };

        if share.group_threshold > share.group_count {
            return Err(ShamirError::InvalidShare(format!(
                "group threshold {} exceeds group count {}",
                share.group_threshold, share.group_count
            )));
        }

        let value_start = METADATA_BITS + padding;
        if bits[METADATA_BITS..value_start].iter().any(|&b| b) {
            return Err(ShamirError::InvalidShare("padding bits are not zero".into()));
        }

        share.value = bits_to_bytes(&bits[value_start..]);
        bits.zeroize();
        Ok(share)
    }

    /// Decode a normalized mnemonic (lower-case words separated by whitespace).
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self, ShamirError> {
        let words: Vec<&str> = mnemonic.split_whitespace().collect();
        let mut indices = slip39_english().words_to_indices(&words)?;
        let share = Self::from_indices(&indices);
        indices.zeroize();
        share
    }
}

impl Drop for Share {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("identifier", &self.identifier)
            .field("extendable", &self.extendable)
            .field("iteration_exponent", &self.iteration_exponent)
            .field("group_index", &self.group_index)
            .field("group_threshold", &self.group_threshold)
            .field("group_count", &self.group_count)
            .field("member_index", &self.member_index)
            .field("member_threshold", &self.member_threshold)
            .field("value_len", &self.value.len())
            .finish_non_exhaustive()
    }
}
