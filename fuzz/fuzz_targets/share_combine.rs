#![no_main]

use libfuzzer_sys::fuzz_target;
use seedshard_shamir::{combine_shares, Share};

fuzz_target!(|data: &[u8]| {
    // Shares with raw fuzzed headers and values: combining must fail cleanly,
    // including for fields wider than the wire format allows.
    let shares: Vec<Share> = data
        .chunks(24)
        .filter(|chunk| chunk.len() == 24)
        .map(|chunk| Share {
            identifier: u16::from_le_bytes([chunk[0], chunk[1]]),
            extendable: chunk[2] & 1 == 1,
            // 0 or 16: cheap to decrypt, or out of range
            iteration_exponent: (chunk[2] & 0x02) << 3,
            group_index: chunk[3],
            group_threshold: chunk[4],
            group_count: chunk[5],
            member_index: chunk[6],
            member_threshold: chunk[7],
            value: chunk[8..].to_vec(),
        })
        .collect();
    let _ = combine_shares(&shares, "");
});
