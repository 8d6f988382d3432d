//! AES-128-CBC encryption with PKCS#7 padding.
//!
//! Used for both the private-key file (under KDF output) and envelope
//! payloads (under per-call session keys).  There is no authentication
//! tag here: envelope integrity comes from the RSA signature over the
//! ciphertext.

use aes::Aes128;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::keys::{IV_LEN, KEY_LEN};
use crate::errors::{RegSealError, Result};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// AES block size in bytes.
const BLOCK_LEN: usize = 16;

/// Encrypt `plaintext` under a 16-byte `key` and 16-byte `iv`.
///
/// The output is always a non-empty multiple of the block size.
pub fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    check_lengths(key, iv)?;
    let cipher = Aes128CbcEnc::new_from_slices(key, iv)
        .map_err(|e| RegSealError::CryptoOperation(format!("invalid key or IV: {e}")))?;

    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt data produced by [`encrypt`] and strip the padding.
pub fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    check_lengths(key, iv)?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(RegSealError::CryptoOperation(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
            ciphertext.len()
        )));
    }

    let cipher = Aes128CbcDec::new_from_slices(key, iv)
        .map_err(|e| RegSealError::CryptoOperation(format!("invalid key or IV: {e}")))?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| RegSealError::CryptoOperation("invalid padding after decryption".into()))
}

fn check_lengths(key: &[u8], iv: &[u8]) -> Result<()> {
    if key.len() != KEY_LEN || iv.len() != IV_LEN {
        return Err(RegSealError::CryptoOperation(format!(
            "AES-128-CBC needs a {KEY_LEN}-byte key and {IV_LEN}-byte IV (got {} and {})",
            key.len(),
            iv.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 16] = [0x2B; 16];
    const IV: [u8; 16] = [0x00; 16];

    #[test]
    fn matches_known_vector() {
        // NIST SP 800-38A F.2.1, first block (padding block follows).
        let key = [
            0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf,
            0x4f, 0x3c,
        ];
        let iv: Vec<u8> = (0u8..16).collect();
        let plaintext = [
            0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93,
            0x17, 0x2a,
        ];
        let expected = [
            0x76, 0x49, 0xab, 0xac, 0x81, 0x19, 0xb2, 0x46, 0xce, 0xe9, 0x8e, 0x9b, 0x12, 0xe9,
            0x19, 0x7d,
        ];

        let ciphertext = encrypt(&key, &iv, &plaintext).unwrap();
        assert_eq!(ciphertext.len(), 32);
        assert_eq!(&ciphertext[..16], &expected);
    }

    #[test]
    fn empty_plaintext_encrypts_to_one_block() {
        let ciphertext = encrypt(&KEY, &IV, b"").unwrap();
        assert_eq!(ciphertext.len(), 16);
        assert_eq!(decrypt(&KEY, &IV, &ciphertext).unwrap(), b"");
    }

    #[test]
    fn rejects_wrong_key_length() {
        assert!(matches!(
            encrypt(&[0u8; 32], &IV, b"data"),
            Err(RegSealError::CryptoOperation(_))
        ));
        assert!(decrypt(&KEY, &[0u8; 8], &[0u8; 16]).is_err());
    }

    #[test]
    fn rejects_partial_block() {
        assert!(matches!(
            decrypt(&KEY, &IV, &[0u8; 15]),
            Err(RegSealError::CryptoOperation(_))
        ));
        assert!(decrypt(&KEY, &IV, &[]).is_err());
    }

    #[test]
    fn wrong_key_fails_or_garbles() {
        let ciphertext = encrypt(&KEY, &IV, b"{\"data\":[]}").unwrap();
        match decrypt(&[0x11; 16], &IV, &ciphertext) {
            Err(RegSealError::CryptoOperation(_)) => {}
            Ok(garbled) => assert_ne!(garbled, b"{\"data\":[]}"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
