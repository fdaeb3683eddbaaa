//! SeedShard: offline seed phrase backup with SLIP-39 shares
//!
//! # Usage
//!
//! ```bash
//! seedshard generate                      # new seed phrase, passphrase and shares
//! seedshard split < phrase.txt            # split an existing seed phrase
//! seedshard recover --passphrase P < shares.txt
//! ```

mod config;
mod toolkit;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::PathBuf;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Generate,
    Split,
    Recover,
}

fn main() -> Result<()> {
    // Keep secrets out of core files
    seedshard_core::disable_core_dumps();

    let args: Vec<String> = std::env::args().collect();

    let mut command = None;
    let mut config_path: Option<PathBuf> = None;
    let mut json = false;
    let mut passphrase: Option<Zeroizing<String>> = None;
    let mut phrase: Option<Zeroizing<String>> = None;
    let mut shares: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "generate" if command.is_none() => command = Some(Command::Generate),
            "split" if command.is_none() => command = Some(Command::Split),
            "recover" if command.is_none() => command = Some(Command::Recover),
            "--config" | "-c" => {
                i += 1;
                if i < args.len() {
                    config_path = Some(PathBuf::from(&args[i]));
                } else {
                    anyhow::bail!("--config requires a path argument");
                }
            }
            "--passphrase" | "-p" => {
                i += 1;
                if i < args.len() {
                    passphrase = Some(Zeroizing::new(args[i].clone()));
                } else {
                    anyhow::bail!("--passphrase requires a value");
                }
            }
            "--phrase" => {
                i += 1;
                if i < args.len() {
                    phrase = Some(Zeroizing::new(args[i].clone()));
                } else {
                    anyhow::bail!("--phrase requires a value");
                }
            }
            "--share" | "-s" => {
                i += 1;
                if i < args.len() {
                    shares.push(args[i].clone());
                } else {
                    anyhow::bail!("--share requires a value");
                }
            }
            "--json" => {
                json = true;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("seedshard {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other => {
                anyhow::bail!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let Some(command) = command else {
        print_help();
        anyhow::bail!("No command given");
    };

    // Load config
    let mut toolkit_config = match &config_path {
        Some(path) => config::ToolkitConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => config::ToolkitConfig::default(),
    };

    // Apply env overrides
    toolkit_config.apply_env_overrides();

    // Validate
    toolkit_config
        .validate()
        .context("Configuration validation failed")?;

    // Init logger; reports go to stdout, logs to stderr. RUST_LOG wins if set.
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", &toolkit_config.logging.level);
    }
    env_logger::init();

    let mut rng = rand::thread_rng();

    match command {
        Command::Generate => {
            let report = toolkit::generate(
                &mut rng,
                &toolkit_config,
                passphrase.as_deref().map(|p| p.as_str()),
            )?;
            emit(&report, json)?;
        }
        Command::Split => {
            let phrase = match phrase {
                Some(p) => p,
                None => read_stdin()?,
            };
            let report = toolkit::split_phrase(
                &mut rng,
                &toolkit_config,
                &phrase,
                passphrase.as_deref().map(|p| p.as_str()),
            )?;
            emit(&report, json)?;
        }
        Command::Recover => {
            if shares.is_empty() {
                shares = toolkit::shares_from_lines(&read_stdin()?);
            }
            let passphrase = passphrase.as_deref().map(|p| p.as_str()).unwrap_or("");
            let result = toolkit::recover(&shares, passphrase);
            zeroize::Zeroize::zeroize(&mut shares);
            emit(&result?, json)?;
        }
    }

    Ok(())
}

fn read_stdin() -> Result<Zeroizing<String>> {
    let mut input = Zeroizing::new(String::new());
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read standard input")?;
    Ok(input)
}

fn emit<T: serde::Serialize + std::fmt::Display>(report: &T, json: bool) -> Result<()> {
    if json {
        let rendered = Zeroizing::new(serde_json::to_string_pretty(report)?);
        println!("{}", *rendered);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn print_help() {
    println!(
        r#"SeedShard: offline seed phrase backup with SLIP-39 shares

USAGE:
    seedshard <COMMAND> [OPTIONS]

COMMANDS:
    generate              Create a new BIP-39 seed phrase and split it into shares
    split                 Split an existing seed phrase (from --phrase or stdin)
    recover               Recover the seed phrase from shares (from --share or stdin, one per line)

OPTIONS:
    -c, --config <PATH>       Config file path (defaults apply without one)
    -p, --passphrase <TEXT>   Passphrase for splitting or recovery
                              (generate/split create one when omitted, if enabled)
    --phrase <WORDS>          Seed phrase to split
    -s, --share <WORDS>       A share to recover from; repeat for each share
    --json                    Print the result as JSON
    -h, --help                Show this help message
    -V, --version             Show version

ENVIRONMENT VARIABLES (override config file):
    SEEDSHARD_LOG_LEVEL           Log level (error/warn/info/debug/trace)
    SEEDSHARD_WORDS               Words in a generated seed phrase (12/15/18/21/24)
    SEEDSHARD_ITERATION_EXPONENT  Passphrase encryption cost (0-15)
    SEEDSHARD_PASSPHRASE_LENGTH   Length of generated passphrases

EXAMPLES:
    # New 24-word seed phrase, 3-of-5 shares
    SEEDSHARD_WORDS=24 seedshard generate --config three-of-five.toml

    # Split a phrase typed on stdin, keeping your own passphrase
    seedshard split --passphrase 'correct horse battery staple'

    # Recover from two pasted shares
    seedshard recover --share '...' --share '...' --passphrase '...'

NOTE:
    A wrong passphrase is not detected. Recovery then prints a different,
    valid looking seed phrase.
"#
    );
}
