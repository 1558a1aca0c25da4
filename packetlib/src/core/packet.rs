//! Packet definition.
//!
//! A packet is the logical value exchanged with the application. It is
//! turned into a wire [`Frame`](super::Frame) by [`encode`](super::encode)
//! and recovered by [`decode`](super::decode).

use std::borrow::Cow;
use std::num::NonZeroU16;
use std::ops::BitOr;

use super::field::MAX_FIELD_LEN;
use super::frame::FRAME_OVERHEAD;
use crate::error::{Error, Field, Result};
use crate::VERSION;

/// Packet flags carried in the second header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PacketFlags(u8);

impl PacketFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);

    /// Sender wants an acknowledgment.
    pub const ACK_REQUIRED: Self = Self(1 << 0);

    /// This frame is itself an acknowledgment.
    pub const IS_ACK: Self = Self(1 << 1);

    /// Creates flags from raw value.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Checks if a flag is set.
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns true if no bits are set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Sets a flag.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears a flag.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Combines two flag sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for PacketFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A decoded packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Protocol version byte.
    pub version: u8,

    /// Packet flags.
    pub flags: PacketFlags,

    /// Packet identifier, never zero on the wire.
    pub id: NonZeroU16,

    /// Identity of the originating node.
    pub source: String,

    /// Destination identifier.
    pub destination: String,

    /// Application payload.
    pub payload: Vec<u8>,
}

impl Packet {
    /// Creates a packet at the current protocol version.
    ///
    /// Fails with [`Error::OversizeField`] if any field exceeds 255 bytes.
    pub fn new(
        id: NonZeroU16,
        source: impl Into<String>,
        destination: impl Into<String>,
        payload: impl Into<Vec<u8>>,
        flags: PacketFlags,
    ) -> Result<Self> {
        let packet = Self {
            version: VERSION,
            flags,
            id,
            source: source.into(),
            destination: destination.into(),
            payload: payload.into(),
        };
        packet.validate()?;
        Ok(packet)
    }

    /// Builds the acknowledgment for this packet, sent from `local`.
    ///
    /// The reply reuses the id, is addressed to this packet's source and
    /// carries an empty payload.
    pub fn ack_reply(&self, local: &str) -> Self {
        Self {
            version: VERSION,
            flags: PacketFlags::IS_ACK,
            id: self.id,
            source: local.to_owned(),
            destination: self.source.clone(),
            payload: Vec::new(),
        }
    }

    /// Checks that every variable-length field fits its length byte.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            (Field::Source, self.source.len()),
            (Field::Destination, self.destination.len()),
            (Field::Payload, self.payload.len()),
        ];
        for (field, len) in fields {
            if len > MAX_FIELD_LEN {
                return Err(Error::OversizeField { field, len });
            }
        }
        Ok(())
    }

    /// Returns the size of this packet once framed.
    pub fn wire_size(&self) -> usize {
        FRAME_OVERHEAD + self.source.len() + self.destination.len() + self.payload.len()
    }

    /// Returns true if the sender asked for an acknowledgment.
    pub fn requires_ack(&self) -> bool {
        self.flags.contains(PacketFlags::ACK_REQUIRED)
    }

    /// Returns true if this packet is an acknowledgment.
    pub fn is_ack(&self) -> bool {
        self.flags.contains(PacketFlags::IS_ACK)
    }

    /// Returns true if the destination names `identity`.
    pub fn is_addressed_to(&self, identity: &str) -> bool {
        self.destination == identity
    }

    /// Payload interpreted as text, with invalid sequences replaced.
    pub fn payload_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}
