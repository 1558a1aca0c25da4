//! Receive-side classification of inbound frames.
//!
//! Every verified and decoded frame falls into exactly one [`FrameKind`].
//! [`Node::handle_frame`](crate::Node::handle_frame) acts on it and reports
//! the branch taken as a [`Dispatch`].

use std::num::NonZeroU16;

use crate::core::PacketFlags;

/// How an inbound frame is handled, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Acknowledgment of one of our packets. Wins over `AckRequired`.
    IsAck,

    /// Application packet whose sender wants an ack.
    AckRequired,

    /// Application packet without ack semantics.
    Plain,
}

impl FrameKind {
    /// Classifies a frame by its flags.
    pub const fn classify(flags: PacketFlags) -> Self {
        if flags.contains(PacketFlags::IS_ACK) {
            Self::IsAck
        } else if flags.contains(PacketFlags::ACK_REQUIRED) {
            Self::AckRequired
        } else {
            Self::Plain
        }
    }

    /// Returns true if frames of this kind reach the application.
    pub const fn is_delivered(&self) -> bool {
        !matches!(self, Self::IsAck)
    }
}

/// Why an inbound frame was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Trailing checksum did not match.
    Checksum,

    /// Checksum matched but the layout was malformed.
    Framing,
}

/// Outcome of dispatching one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Frame was discarded without side effects.
    Dropped(DropReason),

    /// Ack frame processed.
    Acknowledged {
        /// Acknowledged packet id.
        id: NonZeroU16,
        /// Whether the id was awaiting an ack.
        was_pending: bool,
    },

    /// Application packet processed.
    Delivered {
        /// Packet id.
        id: NonZeroU16,
        /// Frame kind, `AckRequired` or `Plain`.
        kind: FrameKind,
        /// An ack reply was handed to the transport.
        replied: bool,
        /// A receive handler was invoked.
        handled: bool,
    },
}

impl Dispatch {
    /// Returns true if the frame was discarded.
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped(_))
    }
}
