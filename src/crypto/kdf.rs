//! Legacy password-based key derivation for the private-key file.
//!
//! The key file was produced by an iterated single-hash PBE scheme, so
//! this module reproduces it exactly rather than using a modern KDF:
//!
//! ```text
//! D0 = password || salt
//! Di = H(D(i-1))                    for i in 1..=iterations
//! key = D[0..16]
//! iv  = H(D[16..20])[0..16]
//! ```
//!
//! `H` is SHA-1 for the key file format.  The generic entry point accepts
//! any digest with at least 20 bytes of output.

use rand::RngCore;
use sha1::digest::Digest;
use sha1::Sha1;
use zeroize::{Zeroize, Zeroizing};

use super::keys::{DerivedKeyMaterial, IV_LEN, KEY_LEN};
use crate::errors::{RegSealError, Result};

/// Minimum digest output the split into key + tail needs.
const MIN_DIGEST_LEN: usize = 20;

/// Length of a freshly generated salt in bytes.
pub const SALT_LEN: usize = 8;

/// Iteration count used when sealing new key files.
pub const DEFAULT_ITERATIONS: u32 = 2048;

/// Derive the private-key file's key and IV with SHA-1.
pub fn derive_key_material(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<DerivedKeyMaterial> {
    derive_key_material_with::<Sha1>(password, salt, iterations)
}

/// Derive key material with an explicit digest `D`.
///
/// The same password + salt + iterations always produce the same output.
pub fn derive_key_material_with<D: Digest>(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<DerivedKeyMaterial> {
    if iterations < 1 {
        return Err(RegSealError::InvalidParameters(
            "KDF iteration count must be at least 1".into(),
        ));
    }
    if <D as Digest>::output_size() < MIN_DIGEST_LEN {
        return Err(RegSealError::InvalidParameters(format!(
            "KDF digest must produce at least {MIN_DIGEST_LEN} bytes (got {})",
            <D as Digest>::output_size()
        )));
    }

    // The whole buffer capacity is wiped on drop, password bytes included.
    let mut state = Zeroizing::new(Vec::with_capacity(password.len() + salt.len()));
    state.extend_from_slice(password);
    state.extend_from_slice(salt);

    for _ in 0..iterations {
        let mut next = D::digest(state.as_slice());
        state.clear();
        move_wiped(&mut next, &mut state);
    }

    let mut material = DerivedKeyMaterial::zeroed();
    material.key.copy_from_slice(&state[..KEY_LEN]);

    let mut tail = D::digest(&state[KEY_LEN..MIN_DIGEST_LEN]);
    material.iv.copy_from_slice(&tail[..IV_LEN]);
    tail.as_mut_slice().zeroize();
    Ok(material)
}

/// Append `digest` to `state`, then wipe the digest buffer.
fn move_wiped(digest: &mut [u8], state: &mut Vec<u8>) {
    state.extend_from_slice(digest);
    digest.zeroize();
}

/// Generate a cryptographically random salt for a new key file.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    use sha1::digest::consts::U16;
    use sha1::digest::{FixedOutput, HashMarker, Output, OutputSizeUser, Update};

    /// SHA-1 cut down to 16 bytes, too short for the key/tail split.
    #[derive(Clone, Default)]
    struct TruncatedSha1(Sha1);

    impl HashMarker for TruncatedSha1 {}

    impl OutputSizeUser for TruncatedSha1 {
        type OutputSize = U16;
    }

    impl Update for TruncatedSha1 {
        fn update(&mut self, data: &[u8]) {
            Update::update(&mut self.0, data);
        }
    }

    impl FixedOutput for TruncatedSha1 {
        fn finalize_into(self, out: &mut Output<Self>) {
            let full = self.0.finalize_fixed();
            out.copy_from_slice(&full[..16]);
        }
    }

    #[test]
    fn zero_iterations_is_rejected() {
        let result = derive_key_material(b"p", &[1, 2, 3, 4], 0);
        assert!(matches!(result, Err(RegSealError::InvalidParameters(_))));
    }

    #[test]
    fn short_digest_is_rejected() {
        let result = derive_key_material_with::<TruncatedSha1>(b"p", &[1, 2, 3, 4], 1);
        assert!(matches!(result, Err(RegSealError::InvalidParameters(_))));
    }

    #[test]
    fn single_iteration_matches_manual_computation() {
        let material = derive_key_material(b"pw", b"salt", 1).unwrap();

        let d1 = Sha1::digest(b"pwsalt");
        let iv = Sha1::digest(&d1[16..20]);
        assert_eq!(material.key(), &d1[..16]);
        assert_eq!(material.iv(), &iv[..16]);
    }

    #[test]
    fn digest_buffer_is_wiped_after_move() {
        let mut digest = [0xA5u8; 20];
        let mut state = vec![1, 2];
        move_wiped(&mut digest, &mut state);

        assert_eq!(digest, [0u8; 20]);
        assert_eq!(state.len(), 22);
        assert!(state[2..].iter().all(|&b| b == 0xA5));
    }

    #[test]
    fn key_and_iv_differ() {
        let material = derive_key_material(b"password", b"saltsalt", 5).unwrap();
        assert_ne!(material.key(), material.iv());
    }

    #[test]
    fn generated_salts_differ() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
