//! Wire frame serialization.
//!
//! # Frame Format
//!
//! ```text
//! +---------+-------+----------+---------+--------+---------+------+---------+---------+----------+
//! | Version | Flags | ID (LE)  | SrcLen  | Source | DestLen | Dest | PayLen  | Payload | Checksum |
//! |   1     |   1   |    2     |   1     |  var   |   1     | var  |   1     |  var    |    1     |
//! +---------+-------+----------+---------+--------+---------+------+---------+---------+----------+
//! ```
//!
//! The checksum is the XOR of every preceding byte. Each variable-length
//! field is limited to 255 bytes by its length prefix.

use std::num::NonZeroU16;
use std::ops::Deref;

use heapless::Vec;

use super::xor::checksum;
use super::field::{
    read_length_prefixed, read_length_prefixed_bytes, write_length_prefixed,
    write_length_prefixed_bytes, MAX_FIELD_LEN,
};
use super::packet::{Packet, PacketFlags};
use crate::error::{Error, Field, Result};

/// Version, flags and id.
pub const HEADER_SIZE: usize = 4;

/// Bytes a frame carries besides its variable-length field contents.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + 3 + 1;

/// Shortest well-formed frame: all fields empty.
pub const MIN_FRAME_SIZE: usize = FRAME_OVERHEAD;

/// Longest possible frame: all fields at their limit.
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + 3 * MAX_FIELD_LEN;

/// An encoded frame, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8, MAX_FRAME_SIZE>,
}

impl Frame {
    /// Returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the frame length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the frame holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the trailing checksum byte.
    pub fn checksum(&self) -> u8 {
        self.bytes.last().copied().unwrap_or(0)
    }

    /// Copies the frame into a heap-allocated vector.
    pub fn into_vec(self) -> std::vec::Vec<u8> {
        self.bytes.as_slice().to_vec()
    }
}

impl Deref for Frame {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Encodes a packet into a frame.
///
/// Fails with [`Error::OversizeField`] before writing anything if a field
/// does not fit its length byte.
pub fn encode(packet: &Packet) -> Result<Frame> {
    packet.validate()?;

    let mut buf: Vec<u8, MAX_FRAME_SIZE> = Vec::new();

    let id = packet.id.get().to_le_bytes();
    buf.extend_from_slice(&[packet.version, packet.flags.bits(), id[0], id[1]])
        .map_err(|_| Error::framing(0, "frame buffer full"))?;

    write_length_prefixed(&mut buf, Field::Source, &packet.source)?;
    write_length_prefixed(&mut buf, Field::Destination, &packet.destination)?;
    write_length_prefixed_bytes(&mut buf, Field::Payload, &packet.payload)?;

    let sum = checksum(&buf);
    let offset = buf.len();
    buf.push(sum)
        .map_err(|_| Error::framing(offset, "frame buffer full"))?;

    Ok(Frame { bytes: buf })
}

/// Checks the trailing checksum of a received frame.
pub fn verify(frame: &[u8]) -> Result<()> {
    if frame.len() < MIN_FRAME_SIZE {
        return Err(Error::framing(frame.len(), "frame shorter than minimal layout"));
    }

    let Some((&actual, body)) = frame.split_last() else {
        return Err(Error::framing(0, "empty frame"));
    };

    let expected = checksum(body);
    if expected != actual {
        return Err(Error::ChecksumMismatch { expected, actual });
    }

    Ok(())
}

/// Decodes a frame whose checksum has already been verified.
///
/// The last byte is treated as the checksum slot and is not inspected.
/// Every field read is bounds-checked against the frame.
pub fn decode(frame: &[u8]) -> Result<Packet> {
    if frame.len() < MIN_FRAME_SIZE {
        return Err(Error::framing(frame.len(), "frame shorter than minimal layout"));
    }
    let body = &frame[..frame.len() - 1];

    let version = body[0];
    let flags = PacketFlags::from_bits(body[1]);
    let id = NonZeroU16::new(u16::from_le_bytes([body[2], body[3]]))
        .ok_or_else(|| Error::framing(2, "packet id 0 is reserved"))?;

    let mut offset = HEADER_SIZE;

    let (source, n) = read_length_prefixed(body, offset)?;
    offset += n;

    let (destination, n) = read_length_prefixed(body, offset)?;
    offset += n;

    let (payload, n) = read_length_prefixed_bytes(body, offset)?;
    offset += n;

    if offset != body.len() {
        return Err(Error::framing(offset, "unexpected bytes before checksum"));
    }

    Ok(Packet {
        version,
        flags,
        id,
        source,
        destination,
        payload: payload.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VERSION;

    fn packet(id: u16, destination: &str, payload: &[u8], flags: PacketFlags) -> Packet {
        Packet::new(
            NonZeroU16::new(id).unwrap(),
            "A",
            destination,
            payload.to_vec(),
            flags,
        )
        .unwrap()
    }

    #[test]
    fn test_wire_layout() {
        let frame = encode(&packet(0x1234, "B", &[0x01, 0x02], PacketFlags::ACK_REQUIRED)).unwrap();

        assert_eq!(
            frame.as_bytes(),
            &[
                VERSION, 0x01, // version, flags
                0x34, 0x12, // id, little-endian
                0x01, b'A', // source
                0x01, b'B', // destination
                0x02, 0x01, 0x02, // payload
                0x24, // checksum
            ]
        );
        assert_eq!(frame.len(), FRAME_OVERHEAD + 1 + 1 + 2);
        assert_eq!(frame.checksum(), 0x24);
    }

    #[test]
    fn test_frame_roundtrip() {
        let original = packet(65535, "gateway", b"temperature=21.5", PacketFlags::NONE);
        let frame = encode(&original).unwrap();

        verify(&frame).unwrap();
        let decoded = decode(&frame).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_empty_fields_roundtrip() {
        let original = Packet::new(
            NonZeroU16::MIN,
            "",
            "",
            std::vec::Vec::<u8>::new(),
            PacketFlags::IS_ACK,
        )
        .unwrap();
        let frame = encode(&original).unwrap();
        assert_eq!(frame.len(), MIN_FRAME_SIZE);
        assert_eq!(decode(&frame).unwrap(), original);
    }

    #[test]
    fn test_max_size_frame() {
        let big = "x".repeat(MAX_FIELD_LEN);
        let original = Packet::new(
            NonZeroU16::new(9).unwrap(),
            big.clone(),
            big.clone(),
            big.into_bytes(),
            PacketFlags::NONE,
        )
        .unwrap();

        let frame = encode(&original).unwrap();
        assert_eq!(frame.len(), MAX_FRAME_SIZE);
        verify(&frame).unwrap();
        assert_eq!(decode(&frame).unwrap(), original);
    }

    #[test]
    fn test_oversize_destination_rejected() {
        let mut original = packet(1, "B", b"", PacketFlags::NONE);
        original.destination = "d".repeat(256);

        let err = encode(&original).unwrap_err();
        assert!(matches!(
            err,
            Error::OversizeField {
                field: Field::Destination,
                len: 256
            }
        ));
    }

    #[test]
    fn test_single_bit_flip_detected() {
        let frame = encode(&packet(42, "B", b"payload", PacketFlags::ACK_REQUIRED)).unwrap();
        let body_len = frame.len() - 1;

        for byte in 0..body_len {
            for bit in 0..8 {
                let mut corrupted = frame.clone().into_vec();
                corrupted[byte] ^= 1 << bit;
                assert!(
                    matches!(verify(&corrupted), Err(Error::ChecksumMismatch { .. })),
                    "flip of bit {bit} in byte {byte} went unnoticed"
                );
            }
        }
    }

    #[test]
    fn test_corrupt_checksum_detected() {
        let mut bytes = encode(&packet(3, "B", b"x", PacketFlags::NONE))
            .unwrap()
            .into_vec();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;

        assert!(matches!(verify(&bytes), Err(Error::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_truncated_frames_rejected() {
        let frame = encode(&packet(5, "station", b"hello", PacketFlags::NONE)).unwrap();

        for len in 0..frame.len() {
            let truncated = &frame[..len];
            assert!(
                matches!(decode(truncated), Err(Error::Framing { .. })),
                "truncation to {len} bytes was accepted"
            );
        }
    }

    #[test]
    fn test_length_byte_overrun() {
        // Source length claims 200 bytes in a 9-byte frame
        let mut bytes = vec![VERSION, 0x00, 0x01, 0x00, 200, b'A', 0x00, 0x00];
        bytes.push(checksum(&bytes));

        verify(&bytes).unwrap();
        assert!(matches!(decode(&bytes), Err(Error::Framing { offset: 5, .. })));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = encode(&packet(5, "B", b"", PacketFlags::NONE))
            .unwrap()
            .into_vec();
        bytes.insert(bytes.len() - 1, 0xEE);

        assert!(matches!(decode(&bytes), Err(Error::Framing { .. })));
    }

    #[test]
    fn test_zero_id_rejected() {
        let mut bytes = vec![VERSION, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        bytes.push(checksum(&bytes));

        verify(&bytes).unwrap();
        assert!(matches!(decode(&bytes), Err(Error::Framing { offset: 2, .. })));
    }

    #[test]
    fn test_unknown_flag_bits_preserved() {
        let original = packet(11, "B", b"", PacketFlags::from_bits(0x81));
        let decoded = decode(&encode(&original).unwrap()).unwrap();
        assert_eq!(decoded.flags.bits(), 0x81);
    }
}
