//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{EzPassError, Result};
use crate::generator::PasswordPolicy;
use crate::vault::{FileStorage, VaultStorage};

/// Environment variable consulted before prompting for the passphrase
/// (CI/CD and scripting friendly).
pub const PASSPHRASE_ENV: &str = "EZPASS_PASSPHRASE";

/// ezpass CLI: encrypted password manager.
#[derive(Parser)]
#[command(
    name = "ezpass",
    about = "Secure password manager for the command line",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file path (default: ~/.ezpass/vault.ezp)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,
}

/// Password generation flags shared by `generate` and `pwgen`.
#[derive(clap::Args)]
pub struct PolicyArgs {
    /// Length of the generated password
    #[arg(long)]
    pub length: Option<usize>,

    /// Exclude lowercase letters
    #[arg(long)]
    pub no_lowercase: bool,

    /// Exclude uppercase letters
    #[arg(long)]
    pub no_uppercase: bool,

    /// Exclude digits
    #[arg(long)]
    pub no_digits: bool,

    /// Exclude punctuation symbols
    #[arg(long)]
    pub no_symbols: bool,

    /// Drop the at-least-one-per-class guarantee
    #[arg(long)]
    pub any_mix: bool,
}

impl PolicyArgs {
    /// Build a `PasswordPolicy`, taking the default length from settings.
    pub fn to_policy(&self, settings: &Settings) -> PasswordPolicy {
        PasswordPolicy {
            length: self.length.unwrap_or(settings.password_length),
            lowercase: !self.no_lowercase,
            uppercase: !self.no_uppercase,
            digits: !self.no_digits,
            symbols: !self.no_symbols,
            require_all_classes: !self.any_mix,
        }
    }
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a new vault
    Init,

    /// Generate a password and store it for a service
    Generate {
        /// Service the credential belongs to (e.g. example.com)
        service: String,

        /// Account username for the service
        #[arg(short, long, default_value = "")]
        username: String,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Copy the generated password to the clipboard
        #[arg(short, long)]
        copy: bool,

        /// Print the generated password to stdout
        #[arg(long)]
        show: bool,
    },

    /// Store an existing password for a service
    Add {
        /// Service the credential belongs to
        service: String,

        /// Account username for the service
        #[arg(short, long, default_value = "")]
        username: String,

        /// Free-form notes to store with the credential
        #[arg(long)]
        notes: Option<String>,

        /// Password value (omit for interactive prompt)
        #[arg(long, hide = true)]
        secret: Option<String>,
    },

    /// Retrieve a stored password
    Get {
        /// Service the credential belongs to
        service: String,

        /// Account username for the service
        #[arg(short, long, default_value = "")]
        username: String,

        /// Print the password to stdout instead of copying it
        #[arg(long)]
        show: bool,
    },

    /// List all stored credentials
    List,

    /// Replace the password of an existing credential
    Update {
        /// Service the credential belongs to
        service: String,

        /// Account username for the service
        #[arg(short, long, default_value = "")]
        username: String,

        /// New password value (omit for interactive prompt)
        #[arg(long, hide = true)]
        secret: Option<String>,
    },

    /// Delete a stored credential
    Delete {
        /// Service the credential belongs to
        service: String,

        /// Account username for the service
        #[arg(short, long, default_value = "")]
        username: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a password without touching any vault
    Pwgen {
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the vault path: `--vault` flag or the default location.
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.vault {
        Some(path) => Ok(path.clone()),
        None => Settings::default_vault_path(),
    }
}

/// Build the storage backend for the selected vault.
pub fn vault_storage(cli: &Cli) -> Result<Box<dyn VaultStorage>> {
    Ok(Box::new(FileStorage::new(vault_path(cli)?)))
}

/// Load user settings from the ezpass config directory.
pub fn load_settings() -> Result<Settings> {
    Settings::load(&Settings::ezpass_dir()?)
}

/// Get the vault passphrase, trying in order:
/// 1. `EZPASS_PASSPHRASE` env var (CI/CD)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master passphrase")
        .interact()
        .map_err(|e| EzPassError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation (used by `init`).
///
/// The env var shortcut applies here too so vault creation can be
/// scripted.
pub fn prompt_new_passphrase() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Create master passphrase")
            .interact()
            .map_err(|e| EzPassError::CommandFailed(format!("passphrase prompt: {e}")))?,
    );
    if pw.is_empty() {
        return Err(EzPassError::CommandFailed(
            "passphrase cannot be empty".into(),
        ));
    }

    let confirm = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Confirm master passphrase")
            .interact()
            .map_err(|e| EzPassError::CommandFailed(format!("passphrase prompt: {e}")))?,
    );
    if *pw != *confirm {
        return Err(EzPassError::PassphraseMismatch);
    }

    Ok(pw)
}

/// Get a secret value from the hidden `--secret` flag or a prompt.
pub fn secret_value(arg: Option<&str>, prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(value) = arg {
        return Ok(Zeroizing::new(value.to_string()));
    }

    let value = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| EzPassError::CommandFailed(format!("secret prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}
