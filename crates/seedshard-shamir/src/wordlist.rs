//! The 1024-word SLIP-39 English wordlist.
//!
//! Loaded once into process-wide immutable state. Every word is unique in its
//! first four letters, which lets users abbreviate when transcribing.

use once_cell::sync::Lazy;
use seedshard_core::wordlist::Wordlist;

/// Bits carried by each share word.
pub const RADIX_BITS: usize = 10;

static SLIP39_ENGLISH: Lazy<Wordlist> = Lazy::new(|| {
    Wordlist::from_text(include_str!("../wordlists/slip39_english.txt"), RADIX_BITS)
        .expect("bundled SLIP-39 list has 1024 distinct words")
});

pub fn slip39_english() -> &'static Wordlist {
    &SLIP39_ENGLISH
}
