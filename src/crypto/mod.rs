//! Cryptographic primitives for RegSeal.
//!
//! This module provides:
//! - AES-128-CBC encryption and decryption (`encryption`)
//! - Legacy iterated-hash password key derivation (`kdf`)
//! - Zeroizing key/IV containers (`keys`)
//! - RSA wrap/unwrap and sign/verify (`asymmetric`)

pub mod asymmetric;
pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key_material, ...};
pub use asymmetric::{CertificateKey, PrivateKey};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_key_material, derive_key_material_with, generate_salt};
pub use keys::{DerivedKeyMaterial, SessionKeyMaterial};
