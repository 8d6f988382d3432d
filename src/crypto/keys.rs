//! Short-lived symmetric key material.
//!
//! Two kinds of 16-byte key + 16-byte IV pairs flow through the crate:
//! - [`DerivedKeyMaterial`] comes out of the password KDF and unlocks the
//!   private-key file.
//! - [`SessionKeyMaterial`] is generated fresh for every outbound
//!   envelope and is never reused.
//!
//! Both wipe their bytes when dropped.

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-128 key length in bytes.
pub const KEY_LEN: usize = 16;

/// CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;

/// Key and IV produced by the password KDF.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeyMaterial {
    pub(crate) key: [u8; KEY_LEN],
    pub(crate) iv: [u8; IV_LEN],
}

impl DerivedKeyMaterial {
    pub(crate) fn zeroed() -> Self {
        Self {
            key: [0u8; KEY_LEN],
            iv: [0u8; IV_LEN],
        }
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

/// A one-shot key and IV for a single envelope.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionKeyMaterial {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl SessionKeyMaterial {
    /// Draw a fresh key and IV from the OS random source.
    pub fn generate() -> Self {
        let mut material = Self {
            key: [0u8; KEY_LEN],
            iv: [0u8; IV_LEN],
        };
        rand::rngs::OsRng.fill_bytes(&mut material.key);
        rand::rngs::OsRng.fill_bytes(&mut material.iv);
        material
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}
