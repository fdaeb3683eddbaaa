//! Toolkit configuration, parsed from an optional TOML file plus environment
//! variable overrides.
//!
//! Priority: environment variables > config file > defaults.

use anyhow::{Context, Result};
use seedshard_core::WordCount;
use seedshard_shamir::Slip39Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level toolkit configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolkitConfig {
    #[serde(default)]
    pub logging: LoggingSection,

    /// Seed phrase generation
    #[serde(default)]
    pub seed: SeedSection,

    /// Share layout
    #[serde(default)]
    pub sharing: SharingSection,

    /// Passphrase generation
    #[serde(default)]
    pub passphrase: PassphraseSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedSection {
    /// Words in a generated seed phrase: 12, 15, 18, 21 or 24
    #[serde(default = "default_words")]
    pub words: usize,
}

impl Default for SeedSection {
    fn default() -> Self {
        Self {
            words: default_words(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharingSection {
    /// Groups needed to recover
    #[serde(default = "default_group_threshold")]
    pub group_threshold: u8,

    /// `[member_threshold, member_count]` per group
    #[serde(default = "default_groups")]
    pub groups: Vec<(u8, u8)>,

    /// PBKDF2 cost exponent (0-15)
    #[serde(default = "default_iteration_exponent")]
    pub iteration_exponent: u8,

    #[serde(default = "default_extendable")]
    pub extendable: bool,
}

impl Default for SharingSection {
    fn default() -> Self {
        Self {
            group_threshold: default_group_threshold(),
            groups: default_groups(),
            iteration_exponent: default_iteration_exponent(),
            extendable: default_extendable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassphraseSection {
    /// Encrypt shares under a generated passphrase
    #[serde(default = "default_passphrase_enabled")]
    pub enabled: bool,

    /// Length of generated passphrases
    #[serde(default = "default_passphrase_length")]
    pub length: usize,
}

impl Default for PassphraseSection {
    fn default() -> Self {
        Self {
            enabled: default_passphrase_enabled(),
            length: default_passphrase_length(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_words() -> usize {
    12
}

fn default_group_threshold() -> u8 {
    1
}

fn default_groups() -> Vec<(u8, u8)> {
    vec![(2, 3)]
}

fn default_iteration_exponent() -> u8 {
    seedshard_shamir::slip39::DEFAULT_ITERATION_EXPONENT
}

fn default_extendable() -> bool {
    true
}

fn default_passphrase_enabled() -> bool {
    true
}

fn default_passphrase_length() -> usize {
    seedshard_core::passphrase::DEFAULT_PASSPHRASE_LEN
}

// ============================================================================
// Loading & environment override
// ============================================================================

impl ToolkitConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ToolkitConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SEEDSHARD_LOG_LEVEL`
    /// - `SEEDSHARD_WORDS`
    /// - `SEEDSHARD_ITERATION_EXPONENT`
    /// - `SEEDSHARD_PASSPHRASE_LENGTH`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SEEDSHARD_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("SEEDSHARD_WORDS") {
            if let Ok(words) = v.parse::<usize>() {
                self.seed.words = words;
            }
        }
        if let Ok(v) = std::env::var("SEEDSHARD_ITERATION_EXPONENT") {
            if let Ok(e) = v.parse::<u8>() {
                self.sharing.iteration_exponent = e;
            }
        }
        if let Ok(v) = std::env::var("SEEDSHARD_PASSPHRASE_LENGTH") {
            if let Ok(len) = v.parse::<usize>() {
                self.passphrase.length = len;
            }
        }
    }

    /// The sharing layout as a library config.
    pub fn slip39(&self) -> Slip39Config {
        Slip39Config::with_groups(self.sharing.group_threshold, self.sharing.groups.clone())
            .with_iteration_exponent(self.sharing.iteration_exponent)
            .with_extendable(self.sharing.extendable)
    }

    pub fn word_count(&self) -> Result<WordCount> {
        WordCount::from_words(self.seed.words).context("seed.words")
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            matches!(
                self.logging.level.as_str(),
                "error" | "warn" | "info" | "debug" | "trace" | "off"
            ),
            "logging.level must be one of error/warn/info/debug/trace/off, got {:?}",
            self.logging.level
        );

        self.word_count()?;

        self.slip39()
            .validate()
            .context("sharing section describes an invalid share layout")?;

        if self.passphrase.enabled {
            anyhow::ensure!(
                (8..=128).contains(&self.passphrase.length),
                "passphrase.length must be between 8 and 128, got {}",
                self.passphrase.length
            );
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
