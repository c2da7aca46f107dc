//! Canonical object framing
//!
//! `<type> <ascii-decimal-length>\0<payload>` is the exact byte sequence that gets
//! hashed and compressed. The type tag is returned unparsed so the registry can
//! report unknown tags itself.

use crate::errors::{OdbError, Result};
use bytes::{BufMut, Bytes, BytesMut};

/// Wrap a payload in canonical framing
pub fn frame(type_tag: &str, payload: &[u8]) -> Bytes {
    let header = format!("{} {}\0", type_tag, payload.len());
    let mut framed = BytesMut::with_capacity(header.len() + payload.len());
    framed.put_slice(header.as_bytes());
    framed.put_slice(payload);
    framed.freeze()
}

/// Split canonical bytes into type tag and payload, validating the declared length
///
/// `id` is only used to label corruption errors.
pub fn unframe<'a>(id: &str, raw: &'a [u8]) -> Result<(&'a str, &'a [u8])> {
    let nul = raw
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| OdbError::corruption(id, "missing header terminator"))?;
    let header = &raw[..nul];
    let space = header
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| OdbError::corruption(id, "missing type separator"))?;

    let type_tag = std::str::from_utf8(&header[..space])
        .map_err(|_| OdbError::corruption(id, "type tag is not valid UTF-8"))?;

    let size = &header[space + 1..];
    if size.is_empty() || !size.iter().all(u8::is_ascii_digit) {
        return Err(OdbError::corruption(id, "length is not a decimal number"));
    }
    if size.len() > 1 && size[0] == b'0' {
        return Err(OdbError::corruption(id, "length has leading zeros"));
    }
    let declared = std::str::from_utf8(size)
        .ok()
        .and_then(|size| size.parse::<usize>().ok())
        .ok_or_else(|| OdbError::corruption(id, "length out of range"))?;

    let payload = &raw[nul + 1..];
    if declared != payload.len() {
        return Err(OdbError::corruption(
            id,
            format!("bad length: declared {declared}, found {}", payload.len()),
        ));
    }

    Ok((type_tag, payload))
}
