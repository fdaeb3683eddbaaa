#![no_main]

use libfuzzer_sys::fuzz_target;
use seedshard_core::parse_mnemonic;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must parse to Ok or Err, never panic.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_mnemonic(s);
    }
});
