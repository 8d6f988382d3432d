//! Password-protected private-key file.
//!
//! The file is a DER structure:
//!
//! ```text
//! SEQUENCE {
//!   SEQUENCE {                      -- AlgorithmIdentifier
//!     OBJECT IDENTIFIER             -- recorded, not enforced
//!     SEQUENCE {
//!       salt            OCTET STRING
//!       iterationCount  INTEGER
//!     }
//!   }
//!   encryptedData  OCTET STRING     -- AES-128-CBC(PKCS#8 PrivateKeyInfo)
//! }
//! ```
//!
//! The AES key and IV come from the legacy KDF in `crypto::kdf`.

use std::fs;
use std::path::Path;

use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use rsa::RsaPrivateKey;
use zeroize::Zeroizing;

use crate::codec::der::{self, Element, TAG_OBJECT_IDENTIFIER};
use crate::crypto::{encryption, kdf, PrivateKey};
use crate::errors::{RegSealError, Result};

/// DER content of OID 2.16.840.1.101.3.4.1.2 (aes128-CBC).
pub const AES128_CBC_OID: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x01, 0x02];

/// Parsed key file, before decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPrivateKeyRecord {
    /// Content bytes of the algorithm OBJECT IDENTIFIER.
    pub algorithm_oid: Vec<u8>,
    pub salt: Vec<u8>,
    pub iteration_count: u32,
    /// AES-128-CBC ciphertext of a PKCS#8 `PrivateKeyInfo`.
    pub encrypted_payload: Vec<u8>,
}

impl EncryptedPrivateKeyRecord {
    /// Parse the DER bytes of a key file.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let top = der::decode_sequence(bytes)?;
        let [algorithm, encrypted] = top.as_slice() else {
            return Err(malformed(format!(
                "key file must hold 2 elements, found {}",
                top.len()
            )));
        };

        let [oid, params] = algorithm.as_sequence()? else {
            return Err(malformed("algorithm identifier must hold an OID and parameters"));
        };
        let algorithm_oid = match oid {
            Element::Other {
                tag: TAG_OBJECT_IDENTIFIER,
                content,
            } => content.to_vec(),
            other => {
                return Err(malformed(format!(
                    "expected algorithm OID, found tag 0x{:02x}",
                    other.tag()
                )))
            }
        };

        let [salt, iterations] = params.as_sequence()? else {
            return Err(malformed("PBE parameters must hold a salt and an iteration count"));
        };
        let iteration_count = u32::try_from(iterations.as_integer()?)
            .map_err(|_| malformed("iteration count does not fit in 32 bits"))?;

        Ok(Self {
            algorithm_oid,
            salt: salt.as_octet_string()?.to_vec(),
            iteration_count,
            encrypted_payload: encrypted.as_octet_string()?.to_vec(),
        })
    }

    /// Serialize back to the key file layout.
    pub fn to_der(&self) -> Vec<u8> {
        let params = der::encode_sequence([
            der::encode_octet_string(&self.salt),
            der::encode_integer(u64::from(self.iteration_count)),
        ]);
        let algorithm = der::encode_sequence([
            der::encode_tlv(TAG_OBJECT_IDENTIFIER, &self.algorithm_oid),
            params,
        ]);
        der::encode_sequence([algorithm, der::encode_octet_string(&self.encrypted_payload)])
    }

    /// Recover the private key with `password`.
    ///
    /// A wrong password shows up as bad padding or as plaintext that is
    /// not a PKCS#8 key; both are reported as `CredentialLoad`.
    pub fn decrypt(&self, password: &[u8]) -> Result<PrivateKey> {
        let material = kdf::derive_key_material(password, &self.salt, self.iteration_count)
            .map_err(|e| RegSealError::CredentialLoad(format!("corrupt key file: {e}")))?;

        let plaintext = encryption::decrypt(material.key(), material.iv(), &self.encrypted_payload)
            .map(Zeroizing::new)
            .map_err(|_| {
                tracing::warn!("private key decryption failed padding check");
                wrong_password()
            })?;

        PrivateKey::from_pkcs8_der(&plaintext).map_err(|_| {
            tracing::warn!("decrypted private key is not a PKCS#8 structure");
            wrong_password()
        })
    }

    /// Protect a PKCS#8 DER key with `password` in the key file layout.
    pub fn seal(pkcs8_der: &[u8], password: &[u8], salt: &[u8], iterations: u32) -> Result<Self> {
        // Refuse to protect something that would not load back.
        PrivateKey::from_pkcs8_der(pkcs8_der)?;

        let material = kdf::derive_key_material(password, salt, iterations)?;
        let encrypted_payload = encryption::encrypt(material.key(), material.iv(), pkcs8_der)?;

        Ok(Self {
            algorithm_oid: AES128_CBC_OID.to_vec(),
            salt: salt.to_vec(),
            iteration_count: iterations,
            encrypted_payload,
        })
    }
}

/// Read and decrypt a private-key file.
pub fn load_private_key(path: &Path, password: &[u8]) -> Result<PrivateKey> {
    tracing::debug!(path = %path.display(), "reading private key file");

    let raw = fs::read(path).map_err(|e| {
        RegSealError::CredentialLoad(format!(
            "cannot read private key {}: {e}",
            path.display()
        ))
    })?;

    let record = EncryptedPrivateKeyRecord::parse(&raw)?;
    tracing::debug!(
        iterations = record.iteration_count,
        salt_len = record.salt.len(),
        "deriving private key file key"
    );

    record.decrypt(password)
}

/// Write a sealed key file to `path`.
///
/// Existing files are never overwritten.  On Unix the file is made
/// owner-only readable.
pub fn write_private_key_file(path: &Path, record: &EncryptedPrivateKeyRecord) -> Result<()> {
    if path.exists() {
        return Err(RegSealError::InvalidParameters(format!(
            "refusing to overwrite existing key file {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, record.to_der())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    tracing::info!(path = %path.display(), "wrote sealed private key");
    Ok(())
}

/// Turn a PKCS#8 key given as PEM or DER into validated DER bytes.
pub fn normalize_pkcs8(input: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let key = match std::str::from_utf8(input) {
        Ok(text) if text.trim_start().starts_with("-----BEGIN") => {
            RsaPrivateKey::from_pkcs8_pem(text.trim())
        }
        _ => RsaPrivateKey::from_pkcs8_der(input),
    }
    .map_err(|e| RegSealError::CredentialLoad(format!("not an RSA PKCS#8 key: {e}")))?;

    let document = key
        .to_pkcs8_der()
        .map_err(|e| RegSealError::CryptoOperation(format!("cannot encode PKCS#8 key: {e}")))?;

    Ok(Zeroizing::new(document.as_bytes().to_vec()))
}

fn malformed(msg: impl Into<String>) -> RegSealError {
    RegSealError::MalformedEncoding(msg.into())
}

fn wrong_password() -> RegSealError {
    RegSealError::CredentialLoad("wrong password or corrupted private key file".into())
}
