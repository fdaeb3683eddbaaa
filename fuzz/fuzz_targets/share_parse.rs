#![no_main]

use libfuzzer_sys::fuzz_target;
use seedshard_shamir::Share;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Share::from_mnemonic(s);
    }

    // Raw 10-bit indices reach the field checks without a wordlist lookup
    let indices: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]) & 0x3FF)
        .collect();
    if let Ok(share) = Share::from_indices(&indices) {
        // Anything that decodes must re-encode to the same words
        assert_eq!(share.to_indices(), indices);
    }
});
