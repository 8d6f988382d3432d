pub mod cli;
pub mod codec;
pub mod config;
pub mod credentials;
pub mod crypto;
pub mod errors;
pub mod protocol;
