//! Security-specific tests.
//!
//! These tests verify:
//! 1. Corrupted or foreign shares are rejected, never silently combined
//! 2. The passphrase changes the recovered secret
//! 3. Seed phrases reject corruption
//! 4. Malformed inputs don't panic

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seedshard_core::{
    entropy_to_mnemonic, generate_mnemonic, mnemonic_to_entropy, parse_mnemonic, MasterSecret,
    SeedError, WordCount,
};
use seedshard_shamir::wordlist::slip39_english;
use seedshard_shamir::{
    combine_mnemonics, combine_shares, generate_shares_with_rng, ShamirError, Share, Slip39Config,
};
use zeroize::Zeroize;

fn fast_config() -> Slip39Config {
    Slip39Config::two_of_three().with_iteration_exponent(0)
}

fn mnemonics(groups: &[Vec<Share>]) -> Vec<String> {
    groups[0].iter().map(|s| s.to_mnemonic()).collect()
}

// ============================================================================
// 1. Share corruption
// ============================================================================

#[test]
fn test_any_single_word_substitution_is_caught() {
    let mut rng = StdRng::seed_from_u64(10);
    let master = MasterSecret::generate(&mut rng, 16).unwrap();
    let groups = generate_shares_with_rng(&mut rng, &master, "", &fast_config()).unwrap();
    let input = mnemonics(&groups);
    let words: Vec<&str> = input[0].split(' ').collect();

    for position in 0..words.len() {
        let replacement = rng.gen_range(0..1024u16);
        let replacement = slip39_english().word(replacement).unwrap();
        if replacement == words[position] {
            continue;
        }
        let mut corrupted = words.clone();
        corrupted[position] = replacement;
        assert_eq!(
            Share::from_mnemonic(&corrupted.join(" ")).unwrap_err(),
            ShamirError::Checksum,
            "word {} replaced",
            position
        );
    }
}

#[test]
fn test_corrupted_share_is_named() {
    let mut rng = StdRng::seed_from_u64(11);
    let master = MasterSecret::generate(&mut rng, 16).unwrap();
    let groups = generate_shares_with_rng(&mut rng, &master, "", &fast_config()).unwrap();
    let mut input = mnemonics(&groups);

    let mut words: Vec<String> = input[2].split(' ').map(String::from).collect();
    let replacement = if words[6] == "academic" { "acid" } else { "academic" };
    words[6] = replacement.to_string();
    input[2] = words.join(" ");

    let err = combine_mnemonics(&input, "").unwrap_err();
    assert!(err.is_per_share());
    match err {
        ShamirError::ShareRejected { position, source } => {
            assert_eq!(position, 2);
            assert_eq!(*source, ShamirError::Checksum);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_every_corrupted_share_is_named() {
    let mut rng = StdRng::seed_from_u64(15);
    let master = MasterSecret::generate(&mut rng, 16).unwrap();
    let groups = generate_shares_with_rng(&mut rng, &master, "", &fast_config()).unwrap();
    let mut input = mnemonics(&groups);

    for position in [0, 2] {
        let mut words: Vec<String> = input[position].split(' ').map(String::from).collect();
        let replacement = if words[9] == "academic" { "acid" } else { "academic" };
        words[9] = replacement.to_string();
        input[position] = words.join(" ");
    }

    let err = combine_mnemonics(&input, "").unwrap_err();
    assert!(err.is_per_share());
    assert_eq!(err.rejected_positions(), vec![0, 2]);
    let message = err.to_string();
    assert!(message.contains("Share 1 rejected"), "{}", message);
    assert!(message.contains("Share 3 rejected"), "{}", message);
    assert!(!message.contains("Share 2 rejected"), "{}", message);
}

#[test]
fn test_shares_from_different_splits_rejected() {
    let mut rng = StdRng::seed_from_u64(12);
    let master = MasterSecret::generate(&mut rng, 16).unwrap();
    let config = fast_config();
    let first = generate_shares_with_rng(&mut rng, &master, "", &config).unwrap();
    let second = generate_shares_with_rng(&mut rng, &master, "", &config).unwrap();
    assert_ne!(first[0][0].identifier, second[0][0].identifier);

    let mixed = vec![first[0][0].clone(), second[0][1].clone()];
    let err = combine_shares(&mixed, "").unwrap_err();
    assert!(matches!(err, ShamirError::MismatchedSet(_)), "{}", err);
    assert!(!err.is_per_share());
}

#[test]
fn test_same_identifier_different_secret_fails_digest() {
    // Two splits forced onto one identifier: headers agree, points do not
    let mut rng = StdRng::seed_from_u64(13);
    let config = fast_config().with_identifier(777);
    let a = MasterSecret::generate(&mut rng, 16).unwrap();
    let b = MasterSecret::generate(&mut rng, 16).unwrap();
    let first = generate_shares_with_rng(&mut rng, &a, "", &config).unwrap();
    let second = generate_shares_with_rng(&mut rng, &b, "", &config).unwrap();

    let mixed = vec![first[0][0].clone(), second[0][1].clone()];
    assert_eq!(
        combine_shares(&mixed, "").unwrap_err(),
        ShamirError::DigestMismatch
    );
}

#[test]
fn test_conflicting_duplicate_rejected() {
    let mut rng = StdRng::seed_from_u64(14);
    let master = MasterSecret::generate(&mut rng, 16).unwrap();
    let groups = generate_shares_with_rng(&mut rng, &master, "", &fast_config()).unwrap();

    let mut forged = groups[0][0].clone();
    forged.value[3] ^= 0x01;
    let shares = vec![groups[0][0].clone(), forged, groups[0][1].clone()];
    assert_eq!(
        combine_shares(&shares, "").unwrap_err(),
        ShamirError::DuplicateShare {
            group_index: 0,
            member_index: 0
        }
    );

    // Exact repeats are harmless
    let shares = vec![groups[0][0].clone(), groups[0][0].clone(), groups[0][1].clone()];
    assert_eq!(combine_shares(&shares, "").unwrap(), master);
}

// ============================================================================
// 2. Passphrase
// ============================================================================

#[test]
fn test_passphrase_sensitivity() {
    let mut rng = StdRng::seed_from_u64(20);
    let master = MasterSecret::generate(&mut rng, 32).unwrap();
    let groups =
        generate_shares_with_rng(&mut rng, &master, "hunter2!", &fast_config()).unwrap();
    let input = mnemonics(&groups);

    assert_eq!(combine_mnemonics(&input[..2], "hunter2!").unwrap(), master);

    for wrong in ["", "hunter2", "Hunter2!", "hunter2! "] {
        let other = combine_mnemonics(&input[..2], wrong).unwrap();
        assert_ne!(other, master, "passphrase {:?}", wrong);
        assert_eq!(other.len(), master.len());
    }
}

#[test]
fn test_non_ascii_passphrase_rejected() {
    let mut rng = StdRng::seed_from_u64(21);
    let master = MasterSecret::generate(&mut rng, 16).unwrap();
    let result = generate_shares_with_rng(&mut rng, &master, "pässword", &fast_config());
    assert!(matches!(result, Err(ShamirError::InvalidPassphrase(_))));

    let groups = generate_shares_with_rng(&mut rng, &master, "", &fast_config()).unwrap();
    let result = combine_mnemonics(&mnemonics(&groups), "tab\there");
    assert!(matches!(result, Err(ShamirError::InvalidPassphrase(_))));
}

#[test]
fn test_invalid_layouts_rejected_before_splitting() {
    let mut rng = StdRng::seed_from_u64(22);
    let master = MasterSecret::generate(&mut rng, 16).unwrap();
    for config in [
        Slip39Config::with_groups(1, vec![(1, 3)]),
        Slip39Config::with_groups(2, vec![(2, 3)]),
        Slip39Config::with_groups(1, vec![(4, 3)]),
        Slip39Config::with_groups(1, vec![(2, 17)]),
        Slip39Config::with_groups(1, vec![]),
        Slip39Config::two_of_three().with_iteration_exponent(16),
        Slip39Config::two_of_three().with_identifier(0x8000),
    ] {
        assert!(
            matches!(
                generate_shares_with_rng(&mut rng, &master, "", &config),
                Err(ShamirError::InvalidConfig(_))
            ),
            "{:?}",
            config
        );
    }
}

// ============================================================================
// 3. Seed phrases
// ============================================================================

#[test]
fn test_seed_phrase_through_shares() {
    let mut rng = StdRng::seed_from_u64(30);
    for count in [WordCount::Words12, WordCount::Words18, WordCount::Words24] {
        let (master, words) = generate_mnemonic(&mut rng, count).unwrap();
        let groups = generate_shares_with_rng(&mut rng, &master, "", &fast_config()).unwrap();
        let recovered = combine_mnemonics(&mnemonics(&groups)[1..], "").unwrap();
        assert_eq!(entropy_to_mnemonic(recovered.as_bytes()).unwrap(), words);
    }
}

#[test]
fn test_seed_phrase_checksum() {
    let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    assert_eq!(parse_mnemonic(phrase).unwrap().as_bytes(), &[0u8; 16]);

    // Last word carries the checksum bits
    let flipped = phrase.replace("about", "above");
    assert!(matches!(
        parse_mnemonic(&flipped),
        Err(SeedError::InvalidMnemonic(_))
    ));

    let short: Vec<&str> = phrase.split(' ').take(11).collect();
    assert_eq!(mnemonic_to_entropy(&short), Err(SeedError::WordCount(11)));
}

#[test]
fn test_seed_secret_is_zeroizable() {
    let phrase = "legal winner thank year wave sausage worth useful legal winner thank yellow";
    let mut entropy = mnemonic_to_entropy(&phrase.split(' ').collect::<Vec<_>>()).unwrap();
    assert_eq!(entropy.as_slice(), &[0x7f; 16]);
    entropy.zeroize();
    assert!(entropy.is_empty());
}

// ============================================================================
// 4. Malformed input
// ============================================================================

#[test]
fn test_random_word_strings_do_not_panic() {
    let mut rng = StdRng::seed_from_u64(40);
    for _ in 0..500 {
        let len = rng.gen_range(0..40);
        let words: Vec<&str> = (0..len)
            .map(|_| slip39_english().word(rng.gen_range(0..1024u16)).unwrap())
            .collect();
        let _ = Share::from_mnemonic(&words.join(" "));
        let _ = parse_mnemonic(&words.join(" "));
    }
}

#[test]
fn test_garbage_text_rejected() {
    for input in ["", " ", "not a share", "academic academic", "🦀 🦀 🦀"] {
        assert!(Share::from_mnemonic(input).is_err(), "{:?}", input);
        assert!(parse_mnemonic(input).is_err(), "{:?}", input);
    }
    assert!(matches!(
        combine_mnemonics::<&str>(&[], ""),
        Err(ShamirError::InsufficientShares {
            groups_complete: 0,
            ..
        })
    ));
}
