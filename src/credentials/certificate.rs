//! Certificate loading.
//!
//! The certificate file may hold raw DER bytes or an already framed PEM
//! document.  Raw bytes are wrapped in a `CERTIFICATE` PEM frame first so
//! both shapes go through the same parser.

use std::fs;
use std::path::Path;

use pem_rfc7468::LineEnding;
use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use x509_cert::der::{DecodePem, Encode};
use x509_cert::Certificate;

use crate::crypto::CertificateKey;
use crate::errors::{RegSealError, Result};

/// PEM label for X.509 certificates.
const PEM_LABEL: &str = "CERTIFICATE";

/// Start of any PEM encapsulation boundary.
const PEM_PREFIX: &[u8] = b"-----BEGIN";

/// Read a certificate file and extract its RSA public key.
pub fn load_certificate_key(path: &Path) -> Result<CertificateKey> {
    tracing::debug!(path = %path.display(), "reading certificate");

    let raw = fs::read(path).map_err(|e| {
        RegSealError::CredentialLoad(format!(
            "cannot read certificate {}: {e}",
            path.display()
        ))
    })?;

    load_certificate_key_from_bytes(&raw)
}

/// Extract the RSA public key from certificate bytes (DER or PEM).
pub fn load_certificate_key_from_bytes(raw: &[u8]) -> Result<CertificateKey> {
    let pem = frame_certificate(raw)?;

    let cert = Certificate::from_pem(pem.as_bytes()).map_err(|e| {
        RegSealError::CredentialLoad(format!("not a parseable X.509 certificate: {e}"))
    })?;

    let spki_der = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| RegSealError::CredentialLoad(format!("bad subject public key info: {e}")))?;

    let key = RsaPublicKey::from_public_key_der(&spki_der).map_err(|e| {
        RegSealError::CredentialLoad(format!("certificate does not carry an RSA key: {e}"))
    })?;

    Ok(CertificateKey::new(key))
}

/// Return the certificate as a PEM document, framing raw DER if needed.
pub fn frame_certificate(raw: &[u8]) -> Result<String> {
    let start = raw
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(raw.len());

    if raw[start..].starts_with(PEM_PREFIX) {
        return String::from_utf8(raw[start..].to_vec()).map_err(|_| {
            RegSealError::CredentialLoad("PEM certificate is not valid UTF-8".into())
        });
    }

    if raw.is_empty() {
        return Err(RegSealError::CredentialLoad(
            "certificate file is empty".into(),
        ));
    }

    pem_rfc7468::encode_string(PEM_LABEL, LineEnding::LF, raw)
        .map_err(|e| RegSealError::CredentialLoad(format!("cannot frame certificate: {e}")))
}
