//! Hybrid encrypt/decrypt pipeline.
//!
//! Outbound (`encrypt`):
//!   1. fresh 16-byte session key + IV
//!   2. AES-128-CBC the payload
//!   3. sign the *ciphertext* with the private key (RSA-SHA256)
//!   4. RSA-encrypt key and IV separately under the certificate key
//!   5. pack the four parts into an [`Envelope`] and base64 it
//!
//! Inbound (`decrypt`) runs the reverse and checks the signature before
//! anything is decrypted.  Every failure rejects the whole envelope.

use zeroize::Zeroizing;

use crate::credentials::CredentialStore;
use crate::crypto::keys::{SessionKeyMaterial, IV_LEN, KEY_LEN};
use crate::crypto::{decrypt as aes_decrypt, encrypt as aes_encrypt};
use crate::errors::{RegSealError, Result};

use super::envelope::Envelope;

/// Seals and opens envelopes with the credentials in a [`CredentialStore`].
///
/// Holds no mutable state, so one channel can serve any number of
/// concurrent calls.
#[derive(Debug, Clone, Copy)]
pub struct SecureChannel<'a> {
    credentials: &'a CredentialStore,
}

impl<'a> SecureChannel<'a> {
    pub fn new(credentials: &'a CredentialStore) -> Self {
        Self { credentials }
    }

    /// Encrypt a UTF-8 payload into a base64 envelope.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        Ok(self.seal(plaintext.as_bytes())?.to_base64())
    }

    /// Verify and decrypt a base64 envelope back into its UTF-8 payload.
    pub fn decrypt(&self, envelope: &str) -> Result<String> {
        let envelope = Envelope::from_base64(envelope)?;
        let plaintext = self.open(&envelope)?;

        String::from_utf8(plaintext).map_err(|_| {
            RegSealError::CryptoOperation("decrypted payload is not valid UTF-8".into())
        })
    }

    /// Build an envelope around raw payload bytes.
    pub fn seal(&self, payload: &[u8]) -> Result<Envelope> {
        let certificate_key = self.credentials.certificate_key()?;
        let private_key = self.credentials.private_key()?;

        let session = SessionKeyMaterial::generate();
        let ciphertext = aes_encrypt(session.key(), session.iv(), payload)?;
        let signature = private_key.sign(&ciphertext)?;
        let encrypted_key = certificate_key.encrypt(session.key())?;
        let encrypted_iv = certificate_key.encrypt(session.iv())?;

        tracing::debug!(
            payload_len = payload.len(),
            ciphertext_len = ciphertext.len(),
            "sealed envelope"
        );

        Ok(Envelope {
            encrypted_key,
            encrypted_iv,
            signature,
            ciphertext,
        })
    }

    /// Verify an envelope's signature, then decrypt its payload.
    pub fn open(&self, envelope: &Envelope) -> Result<Vec<u8>> {
        let certificate_key = self.credentials.certificate_key()?;
        let private_key = self.credentials.private_key()?;

        if !certificate_key.verify(&envelope.ciphertext, &envelope.signature) {
            tracing::warn!(
                ciphertext_len = envelope.ciphertext.len(),
                "envelope signature verification failed"
            );
            return Err(RegSealError::SignatureVerificationFailed);
        }

        let key = Zeroizing::new(private_key.decrypt(&envelope.encrypted_key)?);
        let iv = Zeroizing::new(private_key.decrypt(&envelope.encrypted_iv)?);
        if key.len() != KEY_LEN || iv.len() != IV_LEN {
            return Err(RegSealError::CryptoOperation(format!(
                "unwrapped key/IV are {} and {} bytes, expected {KEY_LEN} and {IV_LEN}",
                key.len(),
                iv.len()
            )));
        }

        let plaintext = aes_decrypt(&key, &iv, &envelope.ciphertext)?;
        tracing::debug!(payload_len = plaintext.len(), "opened envelope");
        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;

    const KEY_DER: &[u8] = include_bytes!("../../tests/fixtures/test_key.pk8.der");

    fn store() -> CredentialStore {
        let private_key = PrivateKey::from_pkcs8_der(KEY_DER).unwrap();
        CredentialStore::from_keys(private_key.public_key(), private_key)
    }

    #[test]
    fn seal_then_open() {
        let store = store();
        let channel = SecureChannel::new(&store);

        let envelope = channel.seal(b"payload").unwrap();
        assert_eq!(envelope.encrypted_key.len(), 256);
        assert_eq!(envelope.encrypted_iv.len(), 256);
        assert_eq!(envelope.signature.len(), 256);
        assert_eq!(envelope.ciphertext.len(), 16);

        assert_eq!(channel.open(&envelope).unwrap(), b"payload");
    }

    #[test]
    fn swapped_signature_is_rejected_before_decryption() {
        let store = store();
        let channel = SecureChannel::new(&store);

        let a = channel.seal(b"first").unwrap();
        let mut b = channel.seal(b"second").unwrap();
        b.signature = a.signature;

        assert!(matches!(
            channel.open(&b),
            Err(RegSealError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn wrong_size_session_key_is_a_crypto_error() {
        let store = store();
        let channel = SecureChannel::new(&store);
        let certificate_key = store.certificate_key().unwrap();

        let mut envelope = channel.seal(b"data").unwrap();
        envelope.encrypted_key = certificate_key.encrypt(&[0u8; 8]).unwrap();

        assert!(matches!(
            channel.open(&envelope),
            Err(RegSealError::CryptoOperation(_))
        ));
    }

    #[test]
    fn corrupted_wrapped_key_is_a_crypto_error() {
        let store = store();
        let channel = SecureChannel::new(&store);

        let mut envelope = channel.seal(b"data").unwrap();
        envelope.encrypted_iv = vec![0x01; 256];

        assert!(matches!(
            channel.open(&envelope),
            Err(RegSealError::CryptoOperation(_))
        ));
    }

    #[test]
    fn non_utf8_payload_is_a_crypto_error() {
        let store = store();
        let channel = SecureChannel::new(&store);

        let encoded = channel.seal(&[0xFF, 0xFE, 0xFD]).unwrap().to_base64();
        assert!(matches!(
            channel.decrypt(&encoded),
            Err(RegSealError::CryptoOperation(_))
        ));
    }
}
