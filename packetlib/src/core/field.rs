//! Length-prefixed field codec.
//!
//! Variable-length fields are stored as a single length byte followed by
//! the raw bytes, which caps every field at 255 bytes.
//!
//! ```text
//! +--------+---------------------+
//! |  len   |  bytes[0..len]      |
//! +--------+---------------------+
//! ```

use heapless::Vec;

use crate::error::{Error, Field, Result};

/// Largest value a single length byte can describe.
pub const MAX_FIELD_LEN: usize = u8::MAX as usize;

/// Appends `text` as a length-prefixed field.
///
/// Returns the number of bytes written (`1 + text.len()`).
pub fn write_length_prefixed<const N: usize>(
    buf: &mut Vec<u8, N>,
    field: Field,
    text: &str,
) -> Result<usize> {
    write_length_prefixed_bytes(buf, field, text.as_bytes())
}

/// Appends `bytes` as a length-prefixed field.
///
/// Nothing is written unless the whole field fits.
pub fn write_length_prefixed_bytes<const N: usize>(
    buf: &mut Vec<u8, N>,
    field: Field,
    bytes: &[u8],
) -> Result<usize> {
    let len = u8::try_from(bytes.len()).map_err(|_| Error::OversizeField {
        field,
        len: bytes.len(),
    })?;

    let offset = buf.len();
    if buf.capacity() - offset < 1 + bytes.len() {
        return Err(Error::framing(offset, "frame buffer full"));
    }

    buf.push(len)
        .map_err(|_| Error::framing(offset, "frame buffer full"))?;
    buf.extend_from_slice(bytes)
        .map_err(|_| Error::framing(offset + 1, "frame buffer full"))?;

    Ok(1 + bytes.len())
}

/// Reads a length-prefixed field starting at `offset`.
///
/// Returns the field bytes and the number of bytes consumed.
pub fn read_length_prefixed_bytes(buf: &[u8], offset: usize) -> Result<(&[u8], usize)> {
    let len = *buf
        .get(offset)
        .ok_or_else(|| Error::framing(offset, "missing length byte"))? as usize;

    let start = offset + 1;
    let bytes = buf
        .get(start..start + len)
        .ok_or_else(|| Error::framing(start, "field overruns frame"))?;

    Ok((bytes, 1 + len))
}

/// Reads a length-prefixed UTF-8 text field starting at `offset`.
pub fn read_length_prefixed(buf: &[u8], offset: usize) -> Result<(String, usize)> {
    let (bytes, consumed) = read_length_prefixed_bytes(buf, offset)?;
    let text = std::str::from_utf8(bytes)
        .map_err(|_| Error::framing(offset + 1, "text field is not valid UTF-8"))?;
    Ok((text.to_owned(), consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let mut buf: Vec<u8, 64> = Vec::new();
        assert_eq!(write_length_prefixed(&mut buf, Field::Source, "node-a").unwrap(), 7);
        assert_eq!(buf[0], 6);
        assert_eq!(&buf[1..], b"node-a");

        let (text, consumed) = read_length_prefixed(&buf, 0).unwrap();
        assert_eq!(text, "node-a");
        assert_eq!(consumed, 7);
    }

    #[test]
    fn test_empty_field() {
        let mut buf: Vec<u8, 4> = Vec::new();
        assert_eq!(write_length_prefixed(&mut buf, Field::Destination, "").unwrap(), 1);
        assert_eq!(buf.as_slice(), &[0u8]);

        let (bytes, consumed) = read_length_prefixed_bytes(&buf, 0).unwrap();
        assert!(bytes.is_empty());
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_max_length_field() {
        let text = "x".repeat(MAX_FIELD_LEN);
        let mut buf: Vec<u8, 300> = Vec::new();
        assert_eq!(write_length_prefixed(&mut buf, Field::Source, &text).unwrap(), 256);
        assert_eq!(buf[0], 255);
    }

    #[test]
    fn test_oversize_field_rejected() {
        let text = "x".repeat(MAX_FIELD_LEN + 1);
        let mut buf: Vec<u8, 300> = Vec::new();
        let err = write_length_prefixed(&mut buf, Field::Destination, &text).unwrap_err();
        assert!(matches!(
            err,
            Error::OversizeField {
                field: Field::Destination,
                len: 256
            }
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_buffer_full() {
        let mut buf: Vec<u8, 4> = Vec::new();
        let err = write_length_prefixed(&mut buf, Field::Payload, "hello").unwrap_err();
        assert!(matches!(err, Error::Framing { offset: 0, .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_buffer_full_keeps_existing_bytes() {
        let mut buf: Vec<u8, 8> = Vec::new();
        write_length_prefixed(&mut buf, Field::Source, "abc").unwrap();

        // Length byte would fit, the text would not
        let err = write_length_prefixed(&mut buf, Field::Destination, "wxyz").unwrap_err();
        assert!(matches!(err, Error::Framing { offset: 4, .. }));
        assert_eq!(buf.as_slice(), &[3, b'a', b'b', b'c']);

        assert_eq!(write_length_prefixed(&mut buf, Field::Destination, "xyz").unwrap(), 4);
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn test_read_missing_length_byte() {
        let err = read_length_prefixed(&[], 0).unwrap_err();
        assert!(matches!(err, Error::Framing { offset: 0, .. }));
    }

    #[test]
    fn test_read_overrun() {
        // Declares 5 bytes but only 2 follow
        let err = read_length_prefixed(&[5, b'a', b'b'], 0).unwrap_err();
        assert!(matches!(err, Error::Framing { offset: 1, .. }));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let err = read_length_prefixed(&[2, 0xC3, 0x28], 0).unwrap_err();
        assert!(matches!(err, Error::Framing { .. }));
    }

    #[test]
    fn test_read_at_offset() {
        let buf = [0xAA, 0xBB, 2, b'h', b'i', 0xCC];
        let (text, consumed) = read_length_prefixed(&buf, 2).unwrap();
        assert_eq!(text, "hi");
        assert_eq!(consumed, 3);
    }
}
