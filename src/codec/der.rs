//! Minimal ASN.1 DER reader and writer.
//!
//! Every element has this layout:
//!
//! ```text
//! [tag: 1 byte][length][content]
//!
//! length = 0xxxxxxx                      (short form, 0..=127)
//!        | 1nnnnnnn [n big-endian bytes] (long form)
//! ```
//!
//! Decoding is recursive descent.  A SEQUENCE yields its children as
//! [`Element`]s in the order they appear, so callers pattern-match on the
//! shape they expect instead of indexing raw byte slices.  Child order is
//! never changed on either side.

use crate::errors::{RegSealError, Result};

/// INTEGER tag.
pub const TAG_INTEGER: u8 = 0x02;

/// OCTET STRING tag.
pub const TAG_OCTET_STRING: u8 = 0x04;

/// OBJECT IDENTIFIER tag (decoded as [`Element::Other`]).
pub const TAG_OBJECT_IDENTIFIER: u8 = 0x06;

/// Constructed SEQUENCE tag.
pub const TAG_SEQUENCE: u8 = 0x30;

/// Deepest SEQUENCE nesting accepted by the decoder.
const MAX_DEPTH: usize = 32;

/// Longest INTEGER content (after a leading zero) that fits in a `u64`.
const MAX_INTEGER_LEN: usize = 8;

/// A decoded DER element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element<'a> {
    /// SEQUENCE with its children in encounter order.
    Sequence(Vec<Element<'a>>),
    /// OCTET STRING content bytes.
    OctetString(&'a [u8]),
    /// Non-negative INTEGER that fits in a `u64`.
    Integer(u64),
    /// Any tag outside the implemented set, kept raw so it can be skipped.
    Other { tag: u8, content: &'a [u8] },
}

impl<'a> Element<'a> {
    /// The tag byte this element was decoded from.
    pub fn tag(&self) -> u8 {
        match self {
            Element::Sequence(_) => TAG_SEQUENCE,
            Element::OctetString(_) => TAG_OCTET_STRING,
            Element::Integer(_) => TAG_INTEGER,
            Element::Other { tag, .. } => *tag,
        }
    }

    pub fn as_sequence(&self) -> Result<&[Element<'a>]> {
        match self {
            Element::Sequence(children) => Ok(children.as_slice()),
            other => Err(unexpected_tag(TAG_SEQUENCE, other.tag())),
        }
    }

    pub fn as_octet_string(&self) -> Result<&'a [u8]> {
        match self {
            Element::OctetString(content) => Ok(*content),
            other => Err(unexpected_tag(TAG_OCTET_STRING, other.tag())),
        }
    }

    pub fn as_integer(&self) -> Result<u64> {
        match self {
            Element::Integer(value) => Ok(*value),
            other => Err(unexpected_tag(TAG_INTEGER, other.tag())),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a buffer that holds exactly one element.
///
/// Trailing bytes after the element are rejected.
pub fn decode(input: &[u8]) -> Result<Element<'_>> {
    let (element, rest) = decode_element(input, 0)?;
    ensure_consumed(rest)?;
    Ok(element)
}

/// Decode a SEQUENCE and return its children in order.
pub fn decode_sequence(input: &[u8]) -> Result<Vec<Element<'_>>> {
    let (tag, content, rest) = split_element(input)?;
    if tag != TAG_SEQUENCE {
        return Err(unexpected_tag(TAG_SEQUENCE, tag));
    }
    ensure_consumed(rest)?;
    decode_children(content, 1)
}

/// Decode an OCTET STRING and return its content bytes.
pub fn decode_octet_string(input: &[u8]) -> Result<&[u8]> {
    let (tag, content, rest) = split_element(input)?;
    if tag != TAG_OCTET_STRING {
        return Err(unexpected_tag(TAG_OCTET_STRING, tag));
    }
    ensure_consumed(rest)?;
    Ok(content)
}

/// Decode an INTEGER as an unsigned big-endian value.
pub fn decode_integer(input: &[u8]) -> Result<u64> {
    let (tag, content, rest) = split_element(input)?;
    if tag != TAG_INTEGER {
        return Err(unexpected_tag(TAG_INTEGER, tag));
    }
    ensure_consumed(rest)?;
    integer_value(content)
}

/// Parsed tag + length header.
struct Header {
    tag: u8,
    header_len: usize,
    content_len: usize,
}

fn read_header(input: &[u8]) -> Result<Header> {
    let (&tag, rest) = input
        .split_first()
        .ok_or_else(|| malformed("unexpected end of input while reading tag"))?;
    let (&first, rest) = rest
        .split_first()
        .ok_or_else(|| malformed(format!("missing length after tag 0x{tag:02x}")))?;

    // Short form: the byte is the length itself.
    if first & 0x80 == 0 {
        return Ok(Header {
            tag,
            header_len: 2,
            content_len: usize::from(first),
        });
    }

    // Long form: the low 7 bits count the big-endian length bytes.
    let count = usize::from(first & 0x7F);
    if count == 0 {
        return Err(malformed("indefinite length is not allowed in DER"));
    }
    if count > std::mem::size_of::<usize>() {
        return Err(malformed(format!("length-of-length {count} is too large")));
    }
    if rest.len() < count {
        return Err(malformed(format!(
            "length header needs {count} bytes but only {} remain",
            rest.len()
        )));
    }

    let digits = &rest[..count];
    if digits[0] == 0 {
        return Err(malformed("long-form length has a leading zero byte"));
    }
    let content_len = digits
        .iter()
        .fold(0usize, |len, &b| (len << 8) | usize::from(b));
    if content_len < 0x80 {
        return Err(malformed(format!(
            "length {content_len} must use the short form"
        )));
    }

    Ok(Header {
        tag,
        header_len: 2 + count,
        content_len,
    })
}

/// Split one element off the front of `input`: `(tag, content, rest)`.
fn split_element(input: &[u8]) -> Result<(u8, &[u8], &[u8])> {
    let header = read_header(input)?;
    let end = header
        .header_len
        .checked_add(header.content_len)
        .filter(|&end| end <= input.len())
        .ok_or_else(|| {
            malformed(format!(
                "tag 0x{:02x} declares {} content bytes but only {} remain",
                header.tag,
                header.content_len,
                input.len().saturating_sub(header.header_len)
            ))
        })?;

    Ok((header.tag, &input[header.header_len..end], &input[end..]))
}

fn decode_element(input: &[u8], depth: usize) -> Result<(Element<'_>, &[u8])> {
    let (tag, content, rest) = split_element(input)?;
    let element = match tag {
        TAG_SEQUENCE => Element::Sequence(decode_children(content, depth + 1)?),
        TAG_OCTET_STRING => Element::OctetString(content),
        TAG_INTEGER => Element::Integer(integer_value(content)?),
        _ => Element::Other { tag, content },
    };
    Ok((element, rest))
}

/// Decode the children of a SEQUENCE.  Each child must fit inside the
/// parent's declared content.
fn decode_children(mut content: &[u8], depth: usize) -> Result<Vec<Element<'_>>> {
    if depth > MAX_DEPTH {
        return Err(malformed(format!("nesting deeper than {MAX_DEPTH} levels")));
    }

    let mut children = Vec::new();
    while !content.is_empty() {
        let (child, rest) = decode_element(content, depth)?;
        children.push(child);
        content = rest;
    }
    Ok(children)
}

fn integer_value(content: &[u8]) -> Result<u64> {
    if content.is_empty() {
        return Err(malformed("INTEGER with empty content"));
    }

    // A single leading zero only keeps a positive value's high bit clear.
    let digits = match content {
        [0, rest @ ..] if !rest.is_empty() => rest,
        _ => content,
    };
    if digits.len() > MAX_INTEGER_LEN {
        return Err(malformed(format!(
            "INTEGER of {} bytes does not fit in 64 bits",
            digits.len()
        )));
    }

    Ok(digits
        .iter()
        .fold(0u64, |value, &b| (value << 8) | u64::from(b)))
}

fn ensure_consumed(rest: &[u8]) -> Result<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(malformed(format!(
            "{} trailing bytes after element",
            rest.len()
        )))
    }
}

fn malformed(msg: impl Into<String>) -> RegSealError {
    RegSealError::MalformedEncoding(msg.into())
}

fn unexpected_tag(expected: u8, found: u8) -> RegSealError {
    malformed(format!("expected tag 0x{expected:02x}, found 0x{found:02x}"))
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a DER length: short form below 128, otherwise `0x80 | n`
/// followed by the minimal big-endian bytes.
pub fn encode_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        return vec![len as u8];
    }

    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[skip..];

    let mut out = Vec::with_capacity(1 + significant.len());
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
    out
}

/// Encode `content` under an arbitrary single-byte tag.
pub fn encode_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let length = encode_length(content.len());
    let mut out = Vec::with_capacity(1 + length.len() + content.len());
    out.push(tag);
    out.extend_from_slice(&length);
    out.extend_from_slice(content);
    out
}

pub fn encode_octet_string(content: &[u8]) -> Vec<u8> {
    encode_tlv(TAG_OCTET_STRING, content)
}

/// Encode a non-negative INTEGER with minimal content bytes.
pub fn encode_integer(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    // Keep at least one byte so zero encodes as `02 01 00`.
    let skip = bytes.iter().take_while(|&&b| b == 0).count().min(7);

    let mut content = Vec::with_capacity(9);
    if bytes[skip] & 0x80 != 0 {
        content.push(0);
    }
    content.extend_from_slice(&bytes[skip..]);
    encode_tlv(TAG_INTEGER, &content)
}

/// Wrap already-encoded children in a SEQUENCE, preserving their order.
pub fn encode_sequence<I, C>(children: I) -> Vec<u8>
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut body = Vec::new();
    for child in children {
        body.extend_from_slice(child.as_ref());
    }
    encode_tlv(TAG_SEQUENCE, &body)
}
