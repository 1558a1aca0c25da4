//! Transport layer abstraction.
//!
//! This module provides the `Transport` trait through which encoded frames
//! leave the node. Receiving is driven by the host: whatever owns the radio
//! hands each inbound frame to [`Node::handle_frame`](crate::Node::handle_frame).
//!
//! # Implementations
//!
//! - `LoopbackTransport`: Records sent frames in memory for testing
//! - `NullTransport`: Discards all frames
//! - `UdpTransport`: Broadcasts frames as UDP datagrams

mod udp;

use std::collections::VecDeque;
use std::io;

use crate::error::{Error, Result};

pub use udp::UdpTransport;

/// Best-effort broadcast of encoded frames.
///
/// Implement this trait to put the protocol on a custom link. A successful
/// return means the frame was handed to the link, not that anyone heard it.
pub trait Transport {
    /// Transmits one complete frame.
    fn send(&mut self, frame: &[u8]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send(frame)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send(frame)
    }
}

/// A loopback transport for testing.
///
/// Every sent frame is queued and can be taken back out, e.g. to feed it
/// into another node's dispatcher.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    frames: VecDeque<Vec<u8>>,
    offline: bool,
}

impl LoopbackTransport {
    /// Creates an empty loopback transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the oldest queued frame.
    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.frames.pop_front()
    }

    /// Takes every queued frame, oldest first.
    pub fn drain(&mut self) -> Vec<Vec<u8>> {
        self.frames.drain(..).collect()
    }

    /// Returns the number of queued frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no frames are queued.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Makes subsequent sends fail, simulating a radio that is down.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }
}

impl Transport for LoopbackTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        if self.offline {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "loopback transport is offline",
            )));
        }
        self.frames.push_back(frame.to_vec());
        Ok(())
    }
}

/// A null transport that discards all frames.
///
/// Useful for testing or measuring overhead.
#[derive(Debug, Default)]
pub struct NullTransport {
    frames_sent: usize,
    bytes_written: usize,
}

impl NullTransport {
    /// Creates a new null transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of frames discarded.
    pub fn frames_sent(&self) -> usize {
        self.frames_sent
    }

    /// Returns the total number of bytes discarded.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Resets the counters.
    pub fn reset(&mut self) {
        self.frames_sent = 0;
        self.bytes_written = 0;
    }
}

impl Transport for NullTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.frames_sent += 1;
        self.bytes_written += frame.len();
        Ok(())
    }
}
