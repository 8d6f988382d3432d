use thiserror::Error;

/// All errors that can occur in RegSeal.
#[derive(Debug, Error)]
pub enum RegSealError {
    // --- Codec errors ---
    #[error("Malformed DER encoding: {0}")]
    MalformedEncoding(String),

    // --- Credential errors ---
    #[error("Credential load failed: {0}")]
    CredentialLoad(String),

    // --- Protocol errors ---
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Signature verification failed: envelope rejected")]
    SignatureVerificationFailed,

    // --- Crypto errors ---
    #[error("Crypto operation failed: {0}")]
    CryptoOperation(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for RegSeal results.
pub type Result<T> = std::result::Result<T, RegSealError>;
