//! Threshold behaviour across every subset of a split.
//!
//! Any subset meeting the thresholds recovers the secret; any subset one
//! share short fails with a shortfall naming the incomplete group.

use rand::rngs::StdRng;
use rand::SeedableRng;
use seedshard_core::MasterSecret;
use seedshard_shamir::{
    combine_mnemonics, combine_shares, generate_shares_with_rng, ShamirError, Share, ShareSet,
    Slip39Config,
};

fn secret(len: usize) -> MasterSecret {
    MasterSecret::new(&(0..len as u8).map(|b| b.wrapping_mul(37)).collect::<Vec<_>>()).unwrap()
}

fn split(config: &Slip39Config, master: &MasterSecret, seed: u64) -> Vec<Vec<Share>> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_shares_with_rng(&mut rng, master, "", config).unwrap()
}

/// Every subset of `items`, as index masks.
fn subsets<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    (0u32..1 << items.len())
        .map(|mask| {
            items
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, item)| item.clone())
                .collect()
        })
        .collect()
}

// ============================================================================
// Single group
// ============================================================================

#[test]
fn test_every_subset_of_three_of_five() {
    let master = secret(16);
    let config = Slip39Config::three_of_five().with_iteration_exponent(0);
    let groups = split(&config, &master, 1);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 5);

    for subset in subsets(&groups[0]) {
        let result = combine_shares(&subset, "");
        if subset.len() >= 3 {
            assert_eq!(result.unwrap(), master, "{} shares", subset.len());
        } else if subset.is_empty() {
            assert!(matches!(
                result,
                Err(ShamirError::InsufficientShares {
                    groups_complete: 0,
                    ..
                })
            ));
        } else {
            match result.unwrap_err() {
                ShamirError::InsufficientShares { shortfalls, .. } => {
                    assert_eq!(shortfalls.len(), 1);
                    assert_eq!(shortfalls[0].missing() as usize, 3 - subset.len());
                }
                other => panic!("unexpected error: {}", other),
            }
        }
    }
}

#[test]
fn test_threshold_equals_count() {
    let master = secret(32);
    let config = Slip39Config::with_groups(1, vec![(4, 4)]).with_iteration_exponent(0);
    let groups = split(&config, &master, 2);

    assert_eq!(combine_shares(&groups[0], "").unwrap(), master);
    assert!(matches!(
        combine_shares(&groups[0][1..], ""),
        Err(ShamirError::InsufficientShares { .. })
    ));
}

#[test]
fn test_one_of_one_shares_are_copies() {
    let master = secret(16);
    let config = Slip39Config::with_groups(1, vec![(1, 1)]).with_iteration_exponent(0);
    let groups = split(&config, &master, 3);
    assert_eq!(groups[0].len(), 1);
    assert_eq!(combine_shares(&groups[0], "").unwrap(), master);
}

#[test]
fn test_secret_lengths() {
    let config = Slip39Config::two_of_three().with_iteration_exponent(0);
    for len in [16, 18, 20, 24, 28, 32, 64] {
        let master = secret(len);
        let groups = split(&config, &master, len as u64);
        let mnemonics: Vec<String> = groups[0][..2].iter().map(|s| s.to_mnemonic()).collect();
        assert_eq!(
            mnemonics[0].split(' ').count(),
            seedshard_shamir::share::word_count(len)
        );
        assert_eq!(combine_mnemonics(&mnemonics, "").unwrap(), master);
    }
}

// ============================================================================
// Two levels
// ============================================================================

#[test]
fn test_every_group_combination() {
    let master = secret(16);
    let config = Slip39Config::with_groups(2, vec![(2, 3), (1, 1), (3, 5)])
        .with_iteration_exponent(0);
    let groups = split(&config, &master, 4);

    // Exactly threshold members from each chosen group
    let quorum: Vec<Vec<Share>> = groups
        .iter()
        .zip(&config.groups)
        .map(|(members, &(threshold, _))| members[..threshold as usize].to_vec())
        .collect();

    for chosen in subsets(&[0usize, 1, 2]) {
        let shares: Vec<Share> = chosen.iter().flat_map(|&g| quorum[g].clone()).collect();
        let result = combine_shares(&shares, "");
        if chosen.len() >= 2 {
            assert_eq!(result.unwrap(), master, "groups {:?}", chosen);
        } else {
            assert!(result.is_err(), "groups {:?}", chosen);
        }
    }
}

#[test]
fn test_one_short_in_second_group() {
    let master = secret(16);
    let config = Slip39Config::with_groups(2, vec![(2, 3), (3, 5)]).with_iteration_exponent(0);
    let groups = split(&config, &master, 5);

    let mut shares = groups[0][..2].to_vec();
    shares.extend_from_slice(&groups[1][2..4]);

    let err = combine_shares(&shares, "").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Insufficient shares: 1 of 2 required groups complete; group 2 needs 1 more share"
    );

    // The last member completes it
    shares.push(groups[1][4].clone());
    assert_eq!(combine_shares(&shares, "").unwrap(), master);
}

#[test]
fn test_extra_shares_are_used_consistently() {
    let master = secret(20);
    let config = Slip39Config::with_groups(1, vec![(2, 5), (3, 3)]).with_iteration_exponent(0);
    let groups = split(&config, &master, 6);

    // All five members of the first group, more than its threshold
    assert_eq!(combine_shares(&groups[0], "").unwrap(), master);
    // Both groups complete while only one is required
    let all: Vec<Share> = groups.concat();
    assert_eq!(combine_shares(&all, "").unwrap(), master);
}

#[test]
fn test_incremental_share_set() {
    let master = secret(16);
    let config = Slip39Config::with_groups(2, vec![(2, 3), (2, 3), (2, 3)])
        .with_iteration_exponent(0);
    let groups = split(&config, &master, 7);

    let mut set = ShareSet::new();
    assert!(set.status().is_none());

    assert!(set.add(groups[2][0].clone()).unwrap());
    assert!(set.add(groups[0][1].clone()).unwrap());
    assert!(!set.add(groups[0][1].clone()).unwrap());
    assert!(set.add(groups[0][2].clone()).unwrap());

    let status = set.status().unwrap();
    assert_eq!(status.groups_complete(), 1);
    assert!(!status.is_complete());
    assert_eq!(status.shortfalls().len(), 1);
    assert_eq!(status.shortfalls()[0].group_index, 2);

    assert!(set.add(groups[2][2].clone()).unwrap());
    assert!(set.is_complete());
    assert_eq!(set.len(), 4);
    assert_eq!(set.recover("").unwrap(), master);
}
