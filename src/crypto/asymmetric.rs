//! RSA key wrappers used by the envelope protocol.
//!
//! - Key and IV wrapping: RSAES-PKCS1-v1_5.
//! - Signatures: RSASSA-PKCS1-v1_5 over SHA-256 of the message.

use std::fmt;

use rand::rngs::OsRng;
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::errors::{RegSealError, Result};

/// Public key taken from the counterparty certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateKey(RsaPublicKey);

impl CertificateKey {
    pub fn new(key: RsaPublicKey) -> Self {
        Self(key)
    }

    pub fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }

    /// Modulus size in bytes.
    pub fn size(&self) -> usize {
        self.0.size()
    }

    /// Encrypt a short secret (a session key or IV) with PKCS#1 v1.5 padding.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.0
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, data)
            .map_err(|e| RegSealError::CryptoOperation(format!("RSA encryption failed: {e}")))
    }

    /// Check a SHA-256 PKCS#1 v1.5 signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let hashed = Sha256::digest(message);
        self.0
            .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
            .is_ok()
    }
}

/// Private key recovered from the password-protected key file.
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

impl PrivateKey {
    /// Parse an unencrypted PKCS#8 `PrivateKeyInfo`.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        RsaPrivateKey::from_pkcs8_der(der)
            .map(Self)
            .map_err(|e| RegSealError::CredentialLoad(format!("not an RSA PKCS#8 key: {e}")))
    }

    pub fn as_rsa(&self) -> &RsaPrivateKey {
        &self.0
    }

    /// The matching public half.
    pub fn public_key(&self) -> CertificateKey {
        CertificateKey(self.0.to_public_key())
    }

    /// Decrypt a PKCS#1 v1.5 ciphertext.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.0
            .decrypt(Pkcs1v15Encrypt, ciphertext)
            .map_err(|e| RegSealError::CryptoOperation(format!("RSA decryption failed: {e}")))
    }

    /// Sign `message` with SHA-256 and PKCS#1 v1.5 padding.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let hashed = Sha256::digest(message);
        self.0
            .sign_with_rng(&mut OsRng, Pkcs1v15Sign::new::<Sha256>(), &hashed)
            .map_err(|e| RegSealError::CryptoOperation(format!("RSA signing failed: {e}")))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &(self.0.size() * 8))
            .finish_non_exhaustive()
    }
}
