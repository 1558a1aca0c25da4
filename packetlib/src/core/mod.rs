//! Core data structures for the packet protocol.
//!
//! This module contains fundamental building blocks:
//! - Checksum: 8-bit XOR for frame integrity
//! - Field: length-prefixed field codec
//! - Packet: application-level message
//! - Frame: wire encoding and decoding

mod field;
mod frame;
mod packet;
mod xor;

pub use field::{
    read_length_prefixed, read_length_prefixed_bytes, write_length_prefixed,
    write_length_prefixed_bytes, MAX_FIELD_LEN,
};
pub use frame::{
    decode, encode, verify, Frame, FRAME_OVERHEAD, HEADER_SIZE, MAX_FRAME_SIZE, MIN_FRAME_SIZE,
};
pub use packet::{Packet, PacketFlags};
pub use xor::{checksum, Xor8};
