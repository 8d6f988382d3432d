//! Envelope wire format.
//!
//! ```text
//! base64( SEQUENCE {
//!   encryptedKey  OCTET STRING   -- RSA(session key)
//!   encryptedIv   OCTET STRING   -- RSA(session IV)
//!   signature     OCTET STRING   -- RSA-SHA256(ciphertext)
//!   ciphertext    OCTET STRING   -- AES-128-CBC(payload)
//! } )
//! ```
//!
//! Field order and framing are fixed by the counterparty and must not
//! change.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::codec::der::{self, Element};
use crate::errors::{RegSealError, Result};

/// Number of OCTET STRINGs in a well-formed envelope.
pub const ELEMENT_COUNT: usize = 4;

/// The four parts of an encrypted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub encrypted_key: Vec<u8>,
    pub encrypted_iv: Vec<u8>,
    pub signature: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// DER-encode as a SEQUENCE of four OCTET STRINGs.
    pub fn to_der(&self) -> Vec<u8> {
        der::encode_sequence([
            der::encode_octet_string(&self.encrypted_key),
            der::encode_octet_string(&self.encrypted_iv),
            der::encode_octet_string(&self.signature),
            der::encode_octet_string(&self.ciphertext),
        ])
    }

    /// Decode the DER form.  Anything other than exactly four OCTET
    /// STRINGs is a malformed envelope.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let children = der::decode_sequence(bytes)
            .map_err(|e| RegSealError::MalformedEnvelope(e.to_string()))?;

        let mut parts = Vec::with_capacity(children.len());
        for (index, child) in children.iter().enumerate() {
            match child {
                Element::OctetString(content) => parts.push(content.to_vec()),
                other => {
                    return Err(RegSealError::MalformedEnvelope(format!(
                        "element {index} has tag 0x{:02x}, expected OCTET STRING",
                        other.tag()
                    )))
                }
            }
        }

        let [encrypted_key, encrypted_iv, signature, ciphertext]: [Vec<u8>; ELEMENT_COUNT] =
            parts.try_into().map_err(|parts: Vec<Vec<u8>>| {
                RegSealError::MalformedEnvelope(format!(
                    "expected {ELEMENT_COUNT} elements, found {}",
                    parts.len()
                ))
            })?;

        Ok(Self {
            encrypted_key,
            encrypted_iv,
            signature,
            ciphertext,
        })
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_der())
    }

    /// Decode a base64 envelope.  ASCII whitespace (line breaks added in
    /// transit) is ignored.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let compact: String = encoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        let bytes = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| RegSealError::MalformedEnvelope(format!("invalid base64: {e}")))?;

        Self::from_der(&bytes)
    }
}
