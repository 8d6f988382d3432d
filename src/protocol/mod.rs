//! The hybrid envelope protocol spoken with the registry service.
//!
//! - `envelope`: the four-part wire structure and its DER/base64 framing.
//! - `channel`: `SecureChannel`, which seals outbound payloads and opens
//!   inbound envelopes.

pub mod channel;
pub mod envelope;

pub use channel::SecureChannel;
pub use envelope::Envelope;
