//! Loading the two credentials the protocol needs.
//!
//! - `certificate`: the counterparty certificate and its RSA public key.
//! - `private_key`: the password-protected private-key file.
//! - `store`: a per-process cache that loads each credential once.

pub mod certificate;
pub mod private_key;
pub mod store;

pub use certificate::{load_certificate_key, load_certificate_key_from_bytes};
pub use private_key::{
    load_private_key, normalize_pkcs8, write_private_key_file, EncryptedPrivateKeyRecord,
};
pub use store::CredentialStore;
