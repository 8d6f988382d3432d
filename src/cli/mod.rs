//! Command-line interface: argument parser, output helpers and commands.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::credentials::CredentialStore;
use crate::errors::{RegSealError, Result};

/// Environment variable holding the private-key password.
pub const PASSWORD_ENV: &str = "REGSEAL_KEY_PASSWORD";

/// Minimum password length accepted when sealing a new key file.
const MIN_PASSWORD_LEN: usize = 8;

/// RegSeal CLI: hybrid envelope encryption for the registry exchange.
#[derive(Parser)]
#[command(
    name = "regseal",
    about = "Signed hybrid envelopes for the vehicle-registry exchange",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory containing .regseal.toml (default: current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<String>,

    /// Certificate file, DER or PEM (overrides .regseal.toml)
    #[arg(long, global = true, env = "REGSEAL_CERT")]
    pub cert: Option<String>,

    /// Password-protected private-key file (overrides .regseal.toml)
    #[arg(long, global = true, env = "REGSEAL_KEY")]
    pub key: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt and sign a payload into a base64 envelope
    Encrypt {
        /// Payload text (read from stdin if omitted)
        text: Option<String>,
    },

    /// Verify and decrypt a base64 envelope
    Decrypt {
        /// Base64 envelope (read from stdin if omitted)
        envelope: Option<String>,
    },

    /// Show the structure of an envelope without decrypting it
    Inspect {
        /// Base64 envelope (read from stdin if omitted)
        envelope: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Protect an unencrypted PKCS#8 key as a password-protected key file
    SealKey {
        /// Unencrypted PKCS#8 private key (PEM or DER)
        input: String,

        /// Where to write the protected key file
        output: String,

        /// KDF iteration count (default from .regseal.toml)
        #[arg(long)]
        iterations: Option<u32>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the project directory from `--project-dir` or the cwd.
pub fn project_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(std::env::current_dir()?),
    }
}

/// Load `.regseal.toml` from the project directory.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    Settings::load(&project_dir(cli)?)
}

/// Build a credential store from CLI flags, falling back to settings.
pub fn credential_store(cli: &Cli) -> Result<CredentialStore> {
    let dir = project_dir(cli)?;
    let settings = Settings::load(&dir)?;

    let certificate_path = match &cli.cert {
        Some(path) => PathBuf::from(path),
        None => settings.certificate_path(&dir),
    };
    let private_key_path = match &cli.key {
        Some(path) => PathBuf::from(path),
        None => settings.private_key_path(&dir),
    };

    let password = prompt_password()?;
    Ok(CredentialStore::new(
        certificate_path,
        private_key_path,
        password,
    ))
}

/// Get the private-key password, trying in order:
/// 1. `REGSEAL_KEY_PASSWORD` env var (servers, CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter private key password")
        .interact()
        .map_err(|e| RegSealError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new key-file password with confirmation.
///
/// Also respects `REGSEAL_KEY_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSWORD_LEN {
                return Err(RegSealError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose key file password")
            .with_confirmation(
                "Confirm key file password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| RegSealError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Take the command argument if given, otherwise read all of stdin.
///
/// Refuses to block on an interactive terminal.
pub fn read_input(arg: Option<&str>, what: &str) -> Result<String> {
    if let Some(value) = arg {
        return Ok(value.to_string());
    }

    if io::stdin().is_terminal() {
        return Err(RegSealError::CommandFailed(format!(
            "no {what} given; pass it as an argument or pipe it via stdin"
        )));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Drop one trailing `\n` or `\r\n`, as left by `echo` or a heredoc.
pub fn strip_line_ending(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}
