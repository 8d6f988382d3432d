//! `regseal seal-key`: write a password-protected private-key file.

use std::fs;
use std::path::Path;

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, Cli};
use crate::credentials::{normalize_pkcs8, write_private_key_file, EncryptedPrivateKeyRecord};
use crate::crypto::generate_salt;
use crate::errors::{RegSealError, Result};

/// Execute the `seal-key` command.
pub fn execute(cli: &Cli, input: &str, output_path: &str, iterations: Option<u32>) -> Result<()> {
    let settings = load_settings(cli)?;
    let iterations = iterations.unwrap_or(settings.kdf_iterations);

    let raw = fs::read(input)
        .map_err(|e| RegSealError::CommandFailed(format!("cannot read {input}: {e}")))?;
    let pkcs8 = normalize_pkcs8(&raw)?;

    let password = prompt_new_password()?;
    let salt = generate_salt();
    let record = EncryptedPrivateKeyRecord::seal(&pkcs8, password.as_bytes(), &salt, iterations)?;

    write_private_key_file(Path::new(output_path), &record)?;

    output::success(&format!(
        "Sealed private key written to {output_path} ({iterations} KDF iterations)"
    ));
    output::tip("Point private_key_path in .regseal.toml at this file.");

    Ok(())
}
