//! Integration tests for the DER codec.

use regseal::codec::{
    decode, decode_integer, decode_octet_string, decode_sequence, encode_integer, encode_length,
    encode_octet_string, encode_sequence, Element,
};
use regseal::errors::RegSealError;

#[test]
fn long_octet_string_uses_long_form_length() {
    let content = vec![0xAB; 300];
    let encoded = encode_octet_string(&content);

    assert_eq!(&encoded[..4], &[0x04, 0x82, 0x01, 0x2C]);
    assert_eq!(decode_octet_string(&encoded).unwrap(), content.as_slice());
}

#[test]
fn length_boundaries() {
    assert_eq!(encode_length(127), vec![0x7F]);
    assert_eq!(encode_length(128), vec![0x81, 0x80]);
    assert_eq!(encode_length(255), vec![0x81, 0xFF]);
    assert_eq!(encode_length(256), vec![0x82, 0x01, 0x00]);
}

#[test]
fn sequence_of_mixed_elements() {
    let encoded = encode_sequence([
        encode_octet_string(b"salt"),
        encode_integer(2048),
        encode_sequence(Vec::<Vec<u8>>::new()),
    ]);

    let children = decode_sequence(&encoded).unwrap();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].as_octet_string().unwrap(), b"salt");
    assert_eq!(children[1].as_integer().unwrap(), 2048);
    assert!(children[2].as_sequence().unwrap().is_empty());
}

#[test]
fn integer_with_high_bit_gets_leading_zero() {
    let encoded = encode_integer(0x80);
    assert_eq!(encoded, vec![0x02, 0x02, 0x00, 0x80]);
    assert_eq!(decode_integer(&encoded).unwrap(), 0x80);
}

#[test]
fn truncated_input_is_malformed() {
    let encoded = encode_octet_string(b"hello world");
    let truncated = &encoded[..encoded.len() - 1];

    assert!(matches!(
        decode_octet_string(truncated),
        Err(RegSealError::MalformedEncoding(_))
    ));
}

#[test]
fn empty_input_is_malformed() {
    assert!(matches!(
        decode(&[]),
        Err(RegSealError::MalformedEncoding(_))
    ));
}

#[test]
fn long_form_for_short_length_is_rejected() {
    assert!(matches!(
        decode_octet_string(&[0x04, 0x81, 0x01, 0xAA]),
        Err(RegSealError::MalformedEncoding(_))
    ));
}

#[test]
fn indefinite_length_is_rejected() {
    assert!(matches!(
        decode(&[0x30, 0x80, 0x00, 0x00]),
        Err(RegSealError::MalformedEncoding(_))
    ));
}

#[test]
fn unknown_tag_is_preserved() {
    let element = decode(&[0x06, 0x03, 0x2A, 0x03, 0x04]).unwrap();
    match element {
        Element::Other { tag, content } => {
            assert_eq!(tag, 0x06);
            assert_eq!(content, &[0x2A, 0x03, 0x04]);
        }
        other => panic!("expected Other, got {other:?}"),
    }
}
