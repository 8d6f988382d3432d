use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::DEFAULT_ITERATIONS;
use crate::errors::{RegSealError, Result};

/// Project-level configuration, loaded from `.regseal.toml`.
///
/// Every field has a sensible default so RegSeal works without any
/// config file at all.  The key password is never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Counterparty certificate (DER or PEM), relative to the project dir.
    #[serde(default = "default_certificate_path")]
    pub certificate_path: String,

    /// Password-protected private-key file, relative to the project dir.
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,

    /// KDF iteration count used when sealing a new key file.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_certificate_path() -> String {
    "certs/signCert.der".to_string()
}

fn default_private_key_path() -> String {
    "certs/signPri.key".to_string()
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            certificate_path: default_certificate_path(),
            private_key_path: default_private_key_path(),
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".regseal.toml";

    /// Load settings from `<project_dir>/.regseal.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            RegSealError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.kdf_iterations == 0 {
            return Err(RegSealError::ConfigError(format!(
                "kdf_iterations in {} must be at least 1",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    /// Resolve the certificate path against the project directory.
    pub fn certificate_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.certificate_path)
    }

    /// Resolve the private-key path against the project directory.
    pub fn private_key_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.private_key_path)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
