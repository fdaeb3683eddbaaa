//! Known-answer tests against published SLIP-39 mnemonics.
//!
//! All valid sets here were created with the passphrase "TREZOR".

use seedshard_core::entropy_to_mnemonic;
use seedshard_shamir::{combine_mnemonics, ShamirError, Share};

const PASSPHRASE: &str = "TREZOR";

// 1-of-1, 128-bit, non-extendable
const SINGLE_SHARE: &str = "duckling enlarge academic academic agency result length solution fridge kidney coal piece deal husband erode duke ajar critical decision keyboard";

// 2-of-3, 128-bit, iteration exponent 2
const TWO_OF_THREE: [&str; 2] = [
    "shadow pistol academic always adequate wildlife fancy gross oasis cylinder mustang wrist rescue view short owner flip making coding armed",
    "shadow pistol academic acid actress prayer class unknown daughter sweater depict flip twice unkind craft early superior advocate guest smoking",
];

// 256-bit, extendable, 2 of 3 groups laid out as 1-of-1, 2-of-3 and 3-of-5
const GROUP_A: &str = "garlic single acrobat leader already visitor endorse admit vexed extra award floral liberty metric boring width pajamas founder thumb apart chest champion shaft plunge income cover training smear rich enforce tofu spray born";
const GROUP_B: [&str; 3] = [
    "garlic single beard leaf advance tension thorn piece remember firefly wildlife speak drug document salt pumps formal likely estimate bedroom custody inmate legal cubic manual lobe course robin jacket rumor aunt rebound anatomy",
    "garlic single beard lily ancestor trial impulse crazy cargo body elegant predator swimming scatter fitness wireless wealthy client mental racism mineral boring yelp decent slap predator change unknown coding impulse sympathy pacific elevator",
    "garlic single beard lungs acid detect spark snapshot vintage squeeze mixed execute yield lecture verdict evoke primary mandate stick dictate email device ladle black aspect ocean document cargo sprinkle charity oral dough grant",
];
const GROUP_C: [&str; 5] = [
    "garlic single ceramic learn analysis phrase mayor blue adult yield human mobile greatest oral peanut spew keyboard episode dream spew scandal bulge crush genuine memory filter false pulse advance elite radar tofu weapon",
    "garlic single ceramic lips aide market western clay device prospect firm campus total geology goat segment spray repair hearing careful pleasure piece bundle enlarge merit devote founder railroad public cluster living freshman trouble",
    "garlic single ceramic luxury arcade keyboard slavery holy software space gasoline epidemic desert cause manual wrap wildlife cleanup calcium crowd early endorse priority mustang capacity enforce forward credit fake drift junk verify index",
    "garlic single ceramic march adapt firm remind garbage total ordinary focus secret reaction tactics evoke unhappy fancy standard evaluate teammate fact wireless object rich adequate cleanup fancy daughter terminal focus eraser equation gasoline",
    "garlic single ceramic method amount husky minister unkind shadow phantom oven mouse national lawsuit burden shelter squeeze chest impact voice crazy promise pencil pregnant guitar drove crunch capacity sniff drove junk database elite",
];
const GROUP_SECRET: &str = "808182838485868788898a8b8c8d8e8f909192939495969798999a9b9c9d9e9f";

fn recover_hex(mnemonics: &[&str], passphrase: &str) -> Result<String, ShamirError> {
    combine_mnemonics(mnemonics, passphrase).map(|s| hex::encode(s.as_bytes()))
}

// ============================================================================
// Valid sets
// ============================================================================

#[test]
fn test_single_share() {
    assert_eq!(
        recover_hex(&[SINGLE_SHARE], PASSPHRASE).unwrap(),
        "bb54aac4b89dc868ba37d9cc21b2cece"
    );
}

#[test]
fn test_two_of_three() {
    assert_eq!(
        recover_hex(&TWO_OF_THREE, PASSPHRASE).unwrap(),
        "b43ceb7e57a0ea8766221624d01b0864"
    );

    let reversed = [TWO_OF_THREE[1], TWO_OF_THREE[0]];
    assert_eq!(
        recover_hex(&reversed, PASSPHRASE).unwrap(),
        "b43ceb7e57a0ea8766221624d01b0864"
    );
}

#[test]
fn test_two_of_three_header() {
    let share = Share::from_mnemonic(TWO_OF_THREE[0]).unwrap();
    assert_eq!(share.identifier, 25653);
    assert!(!share.extendable);
    assert_eq!(share.iteration_exponent, 2);
    assert_eq!(share.group_count, 1);
    assert_eq!(share.member_index, 2);
    assert_eq!(share.member_threshold, 2);
}

#[test]
fn test_group_sets() {
    // Single-member group plus two of group B
    let mnemonics = [GROUP_A, GROUP_B[2], GROUP_B[0]];
    assert_eq!(recover_hex(&mnemonics, PASSPHRASE).unwrap(), GROUP_SECRET);

    // Groups B and C without A
    let mnemonics = [GROUP_B[1], GROUP_B[2], GROUP_C[4], GROUP_C[0], GROUP_C[2]];
    assert_eq!(recover_hex(&mnemonics, PASSPHRASE).unwrap(), GROUP_SECRET);

    // An incomplete group B does not get in the way of A and C
    let mnemonics = [GROUP_A, GROUP_C[4], GROUP_C[0], GROUP_C[2], GROUP_B[1]];
    assert_eq!(recover_hex(&mnemonics, PASSPHRASE).unwrap(), GROUP_SECRET);
}

#[test]
fn test_group_secret_as_seed_phrase() {
    let secret = combine_mnemonics(&[GROUP_A, GROUP_B[0], GROUP_B[1]], PASSPHRASE).unwrap();
    let words = entropy_to_mnemonic(secret.as_bytes()).unwrap();
    assert_eq!(words.len(), 24);
}

#[test]
fn test_shares_reencode_identically() {
    for mnemonic in [SINGLE_SHARE, TWO_OF_THREE[0], GROUP_A, GROUP_C[3]] {
        let share = Share::from_mnemonic(mnemonic).unwrap();
        assert_eq!(share.to_mnemonic(), mnemonic);
    }
}

// ============================================================================
// Invalid sets
// ============================================================================

#[test]
fn test_bad_checksum() {
    let mnemonic = SINGLE_SHARE.replace("keyboard", "kidney");
    assert_eq!(
        Share::from_mnemonic(&mnemonic).unwrap_err(),
        ShamirError::Checksum
    );
}

#[test]
fn test_nonzero_padding() {
    // Checksum is valid but the two padding bits are set
    let mnemonic = "duckling enlarge academic academic email result length solution fridge kidney coal piece deal husband erode duke ajar music cargo fitness";
    assert_eq!(
        Share::from_mnemonic(mnemonic).unwrap_err(),
        ShamirError::InvalidShare("padding bits are not zero".into())
    );
}

#[test]
fn test_too_few_members() {
    let err = recover_hex(&TWO_OF_THREE[..1], PASSPHRASE).unwrap_err();
    assert!(matches!(err, ShamirError::InsufficientShares { .. }));

    let err = recover_hex(&[GROUP_A], PASSPHRASE).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Insufficient shares: 1 of 2 required groups complete"
    );
}

#[test]
fn test_mixed_sets() {
    let err = recover_hex(&[TWO_OF_THREE[0], SINGLE_SHARE], PASSPHRASE).unwrap_err();
    assert!(matches!(err, ShamirError::MismatchedSet(_)), "{}", err);
}

#[test]
fn test_wrong_passphrase_is_not_detected() {
    let recovered = recover_hex(&TWO_OF_THREE, "trezor").unwrap();
    assert_ne!(recovered, "b43ceb7e57a0ea8766221624d01b0864");
    assert_eq!(recovered.len(), 32);
}
