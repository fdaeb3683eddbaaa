//! Generate, split and recover flows behind the command line.
//!
//! Each flow returns a report that renders either as text for a terminal or
//! as JSON. Reports hold secret material and are wiped on drop.

use crate::config::ToolkitConfig;
use anyhow::{Context, Result};
use rand::{CryptoRng, Rng};
use seedshard_core::passphrase::estimate_strength;
use seedshard_core::{
    entropy_to_mnemonic, generate_mnemonic, generate_passphrase, parse_mnemonic,
    validate_passphrase, MasterSecret,
};
use seedshard_shamir::{combine_mnemonics, generate_shares_with_rng};
use serde::Serialize;
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Shares produced by `generate` or `split`.
#[derive(Serialize, Zeroize)]
pub struct SplitReport {
    /// Only set when the phrase was generated here
    pub seed_phrase: Option<String>,
    /// Only set when the passphrase was generated here
    pub passphrase: Option<String>,
    pub identifier: u16,
    pub group_threshold: u8,
    pub groups: Vec<GroupReport>,
}

#[derive(Serialize, Zeroize)]
pub struct GroupReport {
    /// One-based, as printed
    pub group: u8,
    pub member_threshold: u8,
    pub shares: Vec<String>,
}

impl Drop for SplitReport {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Outcome of `recover`.
#[derive(Serialize, Zeroize)]
pub struct RecoveryReport {
    /// `None` when the secret length has no BIP-39 encoding
    pub seed_phrase: Option<String>,
    pub entropy_hex: String,
    pub bits: usize,
}

impl Drop for RecoveryReport {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Clean up a share or seed phrase as pasted from a document or script
/// output: quotes, brackets and commas are dropped, any run of whitespace
/// (tabs, newlines, non-breaking spaces) becomes one space, and words are
/// lower-cased.
pub fn normalize_share_input(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ',' | '\'' | '"'))
        .collect();
    stripped
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One share per non-empty line.
pub fn shares_from_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(normalize_share_input)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Generate a fresh seed phrase and split it.
pub fn generate<R: Rng + CryptoRng>(
    rng: &mut R,
    config: &ToolkitConfig,
    passphrase: Option<&str>,
) -> Result<SplitReport> {
    let count = config.word_count()?;
    let (secret, words) = generate_mnemonic(rng, count).context("Failed to generate seed phrase")?;
    log::info!("generated {}-word seed phrase", count.words());

    let mut report = split_secret(rng, config, &secret, passphrase)?;
    report.seed_phrase = Some(words.join(" "));
    Ok(report)
}

/// Split an existing seed phrase.
pub fn split_phrase<R: Rng + CryptoRng>(
    rng: &mut R,
    config: &ToolkitConfig,
    phrase: &str,
    passphrase: Option<&str>,
) -> Result<SplitReport> {
    let normalized = Zeroizing::new(normalize_share_input(phrase));
    let secret = parse_mnemonic(&normalized).context("Invalid seed phrase")?;
    split_secret(rng, config, &secret, passphrase)
}

/// Recover the seed phrase from shares.
///
/// A wrong passphrase is not detected: it yields a different, valid looking
/// seed phrase.
pub fn recover<S: AsRef<str>>(shares: &[S], passphrase: &str) -> Result<RecoveryReport> {
    let normalized: Vec<Zeroizing<String>> = shares
        .iter()
        .map(|s| Zeroizing::new(normalize_share_input(s.as_ref())))
        .filter(|s| !s.is_empty())
        .collect();
    anyhow::ensure!(!normalized.is_empty(), "No shares given");

    let mnemonics: Vec<&str> = normalized.iter().map(|s| s.as_str()).collect();
    let secret = combine_mnemonics(&mnemonics, passphrase)
        .with_context(|| format!("Recovery from {} share(s) failed", mnemonics.len()))?;
    log::info!("recovered {}-bit master secret", secret.bits());

    let seed_phrase = match entropy_to_mnemonic(secret.as_bytes()) {
        Ok(words) => Some(words.join(" ")),
        Err(e) => {
            log::warn!("recovered secret has no seed phrase form: {}", e);
            None
        }
    };

    Ok(RecoveryReport {
        seed_phrase,
        entropy_hex: hex::encode(secret.as_bytes()),
        bits: secret.bits(),
    })
}

/// A given passphrase wins; otherwise one is generated if the config asks
/// for it, else the empty passphrase is used.
fn choose_passphrase<R: Rng + CryptoRng>(
    rng: &mut R,
    config: &ToolkitConfig,
    given: Option<&str>,
) -> Result<(Zeroizing<String>, bool)> {
    match given {
        Some(p) => {
            validate_passphrase(p).context("Invalid passphrase")?;
            let strength = estimate_strength(p);
            if !strength.is_recommended() {
                log::warn!("passphrase strength is {:?}; consider a longer one", strength);
            }
            Ok((Zeroizing::new(p.to_string()), false))
        }
        None if config.passphrase.enabled => {
            Ok((generate_passphrase(rng, config.passphrase.length), true))
        }
        None => {
            log::warn!("shares are not protected by a passphrase");
            Ok((Zeroizing::new(String::new()), false))
        }
    }
}

fn split_secret<R: Rng + CryptoRng>(
    rng: &mut R,
    config: &ToolkitConfig,
    secret: &MasterSecret,
    given: Option<&str>,
) -> Result<SplitReport> {
    let (passphrase, generated) = choose_passphrase(rng, config, given)?;
    let slip39 = config.slip39();

    let groups = generate_shares_with_rng(rng, secret, &passphrase, &slip39)
        .context("Failed to split secret")?;

    let identifier = groups
        .first()
        .and_then(|g| g.first())
        .map(|s| s.identifier)
        .unwrap_or_default();

    let groups = groups
        .iter()
        .enumerate()
        .map(|(i, members)| GroupReport {
            group: i as u8 + 1,
            member_threshold: members.first().map(|s| s.member_threshold).unwrap_or_default(),
            shares: members.iter().map(|s| s.to_mnemonic()).collect(),
        })
        .collect();

    log::info!(
        "split secret under identifier {} into {} group(s)",
        identifier,
        slip39.group_count()
    );

    Ok(SplitReport {
        seed_phrase: None,
        passphrase: generated.then(|| passphrase.to_string()),
        identifier,
        group_threshold: slip39.group_threshold,
        groups,
    })
}

impl fmt::Debug for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitReport")
            .field("identifier", &self.identifier)
            .field("group_threshold", &self.group_threshold)
            .field("groups", &self.groups.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RecoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryReport")
            .field("bits", &self.bits)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(phrase) = &self.seed_phrase {
            writeln!(f, "Seed phrase (BIP-39):")?;
            writeln!(f, "  {}", phrase)?;
            writeln!(f)?;
        }
        if let Some(passphrase) = &self.passphrase {
            writeln!(f, "Passphrase (needed for recovery, store apart from shares):")?;
            writeln!(f, "  {}", passphrase)?;
            writeln!(f)?;
        }
        writeln!(
            f,
            "Shares (identifier {}, {} of {} group(s) required):",
            self.identifier,
            self.group_threshold,
            self.groups.len()
        )?;
        for group in &self.groups {
            writeln!(
                f,
                "Group {} ({} of {}):",
                group.group,
                group.member_threshold,
                group.shares.len()
            )?;
            for (i, share) in group.shares.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, share)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for RecoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.seed_phrase {
            Some(phrase) => {
                writeln!(f, "Seed phrase (BIP-39):")?;
                writeln!(f, "  {}", phrase)?;
            }
            None => writeln!(f, "No BIP-39 form for a {}-bit secret", self.bits)?,
        }
        writeln!(f, "Entropy ({} bits):", self.bits)?;
        writeln!(f, "  {}", self.entropy_hex)
    }
}
