//! Per-process credential cache.
//!
//! `CredentialStore` is built once at wiring time with the two file paths
//! and the key password, then handed by reference to every
//! `SecureChannel`.  Each credential is loaded on first use and kept for
//! the life of the store.  Concurrent first callers block on the same
//! load, so a file is never read or decrypted twice.  A failed load leaves
//! the slot empty and the error goes back to the caller.

use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use zeroize::Zeroizing;

use super::{certificate, private_key};
use crate::crypto::{CertificateKey, PrivateKey};
use crate::errors::Result;

pub struct CredentialStore {
    certificate_path: PathBuf,
    private_key_path: PathBuf,
    password: Zeroizing<String>,

    certificate_key: OnceCell<CertificateKey>,
    private_key: OnceCell<PrivateKey>,
}

impl CredentialStore {
    /// Create a store that loads lazily from disk.
    pub fn new(
        certificate_path: impl Into<PathBuf>,
        private_key_path: impl Into<PathBuf>,
        password: impl Into<Zeroizing<String>>,
    ) -> Self {
        Self {
            certificate_path: certificate_path.into(),
            private_key_path: private_key_path.into(),
            password: password.into(),
            certificate_key: OnceCell::new(),
            private_key: OnceCell::new(),
        }
    }

    /// Create a store around keys that are already in memory.
    pub fn from_keys(certificate_key: CertificateKey, private_key: PrivateKey) -> Self {
        Self {
            certificate_path: PathBuf::new(),
            private_key_path: PathBuf::new(),
            password: Zeroizing::new(String::new()),
            certificate_key: OnceCell::with_value(certificate_key),
            private_key: OnceCell::with_value(private_key),
        }
    }

    /// The counterparty public key, loading the certificate on first use.
    pub fn certificate_key(&self) -> Result<&CertificateKey> {
        self.certificate_key.get_or_try_init(|| {
            let key = certificate::load_certificate_key(&self.certificate_path)?;
            tracing::info!(
                path = %self.certificate_path.display(),
                bits = key.size() * 8,
                "certificate key loaded"
            );
            Ok(key)
        })
    }

    /// The local private key, decrypting the key file on first use.
    pub fn private_key(&self) -> Result<&PrivateKey> {
        self.private_key.get_or_try_init(|| {
            let key =
                private_key::load_private_key(&self.private_key_path, self.password.as_bytes())?;
            tracing::info!(path = %self.private_key_path.display(), "private key loaded");
            Ok(key)
        })
    }

    /// Whether both credentials are already cached.
    pub fn is_loaded(&self) -> bool {
        self.certificate_key.get().is_some() && self.private_key.get().is_some()
    }

    pub fn certificate_path(&self) -> &Path {
        &self.certificate_path
    }

    pub fn private_key_path(&self) -> &Path {
        &self.private_key_path
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("certificate_path", &self.certificate_path)
            .field("private_key_path", &self.private_key_path)
            .field("certificate_loaded", &self.certificate_key.get().is_some())
            .field("private_key_loaded", &self.private_key.get().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RegSealError;
    use std::fs;
    use tempfile::TempDir;

    const CERT_DER: &[u8] = include_bytes!("../../tests/fixtures/test_cert.der");
    const SEALED: &[u8] = include_bytes!("../../tests/fixtures/test_key.enc");

    fn store_in(dir: &TempDir, password: &str) -> CredentialStore {
        let cert = dir.path().join("signCert.der");
        let key = dir.path().join("signPri.key");
        fs::write(&cert, CERT_DER).unwrap();
        fs::write(&key, SEALED).unwrap();
        CredentialStore::new(cert, key, password.to_string())
    }

    #[test]
    fn loads_lazily() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "fixture-password");
        assert!(!store.is_loaded());

        store.certificate_key().unwrap();
        store.private_key().unwrap();
        assert!(store.is_loaded());
    }

    #[test]
    fn cached_keys_survive_file_removal() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "fixture-password");

        let first = store.private_key().unwrap() as *const PrivateKey;
        store.certificate_key().unwrap();

        fs::remove_file(store.private_key_path()).unwrap();
        fs::remove_file(store.certificate_path()).unwrap();

        let second = store.private_key().unwrap() as *const PrivateKey;
        assert_eq!(first, second);
        assert!(store.certificate_key().is_ok());
    }

    #[test]
    fn concurrent_first_use_loads_once() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "fixture-password");

        let addresses: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| store.private_key().unwrap() as *const PrivateKey as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn wrong_password_is_reported_and_not_cached() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "wrong-password");

        assert!(matches!(
            store.private_key(),
            Err(RegSealError::CredentialLoad(_))
        ));
        assert!(!store.is_loaded());
    }

    #[test]
    fn debug_hides_password() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "super-secret-password");
        let rendered = format!("{store:?}");
        assert!(!rendered.contains("super-secret-password"));
    }
}
