//! Binary encoding for the key file and the envelope.
//!
//! Only the DER subset those two formats use is implemented
//! (`der`): SEQUENCE, OCTET STRING and INTEGER, plus pass-through of any
//! other tag so callers can skip fields such as an algorithm OID.

pub mod der;

pub use der::{
    decode, decode_integer, decode_octet_string, decode_sequence, encode_integer, encode_length,
    encode_octet_string, encode_sequence, encode_tlv, Element,
};
