//! # PacketLib - Short Messages over Broadcast Radio
//!
//! PacketLib frames short messages for unreliable, broadcast-style wireless
//! links and provides:
//!
//! - **Self-describing frames**: version, flags, id, source, destination, payload
//! - **XOR checksum**: Corrupted frames are dropped on receive
//! - **Opt-in acknowledgments**: Receivers answer `ACK_REQUIRED` packets
//! - **Pending-ack tracking**: Senders see which packets are still unacknowledged
//! - **Custom transport support**: Works with any link implementing `Transport`
//!
//! There is no encryption, fragmentation or retransmission.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Application Layer                     │
//! ├─────────────────────────────────────────────────────────┤
//! │                    Node                                  │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────┐   │
//! │  │ Dispatcher  │ │ Ack Tracker │ │ Receive Handler │   │
//! │  └─────────────┘ └─────────────┘ └─────────────────┘   │
//! ├─────────────────────────────────────────────────────────┤
//! │                    Frame Layer                           │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────┐   │
//! │  │  Framing    │ │  Checksum   │ │  Field Codec    │   │
//! │  └─────────────┘ └─────────────┘ └─────────────────┘   │
//! ├─────────────────────────────────────────────────────────┤
//! │                    Transport Layer                       │
//! │  ┌─────────────────────────────────────────────────┐   │
//! │  │        Radio / UDP broadcast / Loopback          │   │
//! │  └─────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use packetlib::{LoopbackTransport, Node, NodeConfig, PacketFlags};
//!
//! let mut a = Node::new(LoopbackTransport::new(), NodeConfig::new("A"))?;
//! let mut b = Node::new(LoopbackTransport::new(), NodeConfig::new("B"))?;
//! b.on_receive(|packet| println!("{} says {}", packet.source, packet.payload_text()));
//!
//! // Send data, asking for an ack
//! let id = a.send(0, b"Hello, World!", "B", PacketFlags::ACK_REQUIRED)?;
//!
//! // Carry the frame across and the ack back
//! let frame = a.transport_mut().pop().unwrap();
//! b.handle_frame(&frame);
//! let ack = b.transport_mut().pop().unwrap();
//! a.handle_frame(&ack);
//!
//! assert!(!a.tracker().is_pending(id));
//! # Ok::<(), packetlib::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod node;
pub mod reliable;
pub mod transport;

// Re-export commonly used types
pub use crate::core::{
    checksum, decode, encode, verify, Frame, Packet, PacketFlags, Xor8, MAX_FRAME_SIZE,
    MIN_FRAME_SIZE,
};
pub use config::NodeConfig;
pub use dispatch::{Dispatch, DropReason, FrameKind};
pub use error::{Error, Field, Result};
pub use node::{Node, NodeStats};
pub use reliable::AckTracker;
pub use transport::{LoopbackTransport, NullTransport, Transport, UdpTransport};

/// Protocol version written into every frame.
pub const VERSION: u8 = 1;
