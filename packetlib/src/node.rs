//! Node handle and main API.
//!
//! A [`Node`] owns everything one endpoint of the link needs: its identity,
//! the transport, the acknowledgment tracker and the application's receive
//! handler. Several independent nodes can live in one process.

use std::num::NonZeroU16;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::NodeConfig;
use crate::core::{decode, encode, verify, Frame, Packet, PacketFlags};
use crate::dispatch::{Dispatch, DropReason, FrameKind};
use crate::error::{Error, Result};
use crate::reliable::AckTracker;
use crate::transport::Transport;

/// Application callback for delivered packets.
pub type ReceiveHandler = Box<dyn FnMut(&Packet) + Send>;

/// Statistics about node operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeStats {
    /// Frames handed to the transport, acks included.
    pub frames_sent: u64,

    /// Frames passed to the dispatcher.
    pub frames_received: u64,

    /// Ack replies sent.
    pub acks_sent: u64,

    /// Ack frames received.
    pub acks_received: u64,

    /// Packets passed to the receive handler.
    pub packets_delivered: u64,

    /// Frames dropped for a bad checksum.
    pub checksum_errors: u64,

    /// Frames dropped for a malformed layout.
    pub framing_errors: u64,
}

/// One endpoint of the link.
///
/// # Example
///
/// ```rust
/// use packetlib::{LoopbackTransport, Node, NodeConfig, PacketFlags};
///
/// let mut node = Node::new(LoopbackTransport::new(), NodeConfig::new("A"))?;
/// let id = node.send(0, b"hello", "B", PacketFlags::ACK_REQUIRED)?;
/// assert!(node.tracker().is_pending(id));
/// # Ok::<(), packetlib::Error>(())
/// ```
pub struct Node<T> {
    /// Configuration.
    config: NodeConfig,

    /// Outbound link.
    transport: T,

    /// Ids awaiting acknowledgment.
    tracker: AckTracker,

    /// Application receive handler.
    handler: Option<ReceiveHandler>,

    /// Source of generated packet ids.
    rng: StdRng,

    /// Node statistics.
    stats: NodeStats,
}

impl<T: Transport> Node<T> {
    /// Creates a node sending through `transport`.
    ///
    /// Fails with [`Error::OversizeField`] if the identity does not fit a
    /// source field.
    pub fn new(transport: T, config: NodeConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.id_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::debug!("node '{}' up, auto-ack {}", config.identity, config.auto_ack);

        Ok(Self {
            config,
            transport,
            tracker: AckTracker::new(),
            handler: None,
            rng,
            stats: NodeStats::default(),
        })
    }

    /// Returns the local identity.
    pub fn identity(&self) -> &str {
        &self.config.identity
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Returns the acknowledgment tracker.
    pub fn tracker(&self) -> &AckTracker {
        &self.tracker
    }

    /// Returns true if packet `id` is awaiting acknowledgment.
    pub fn is_pending(&self, id: u16) -> bool {
        NonZeroU16::new(id).is_some_and(|id| self.tracker.is_pending(id))
    }

    /// Returns node statistics.
    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    /// Returns a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the node and returns the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Registers the receive handler, replacing any previous one.
    pub fn on_receive<F>(&mut self, handler: F)
    where
        F: FnMut(&Packet) + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Removes the receive handler.
    pub fn clear_receive_handler(&mut self) {
        self.handler = None;
    }

    /// Draws a fresh packet id in `1..=65535`.
    fn next_id(&mut self) -> NonZeroU16 {
        NonZeroU16::new(self.rng.gen_range(1..=u16::MAX)).unwrap_or(NonZeroU16::MIN)
    }

    /// Builds a packet from this node. An `id` of 0 picks a random one.
    pub fn packet(
        &mut self,
        id: u16,
        destination: &str,
        payload: &[u8],
        flags: PacketFlags,
    ) -> Result<Packet> {
        let id = match NonZeroU16::new(id) {
            Some(id) => id,
            None => self.next_id(),
        };
        Packet::new(
            id,
            self.config.identity.as_str(),
            destination,
            payload,
            flags,
        )
    }

    /// Encodes a frame from this node without sending it.
    pub fn encode(
        &mut self,
        id: u16,
        destination: &str,
        payload: &[u8],
        flags: PacketFlags,
    ) -> Result<Frame> {
        let packet = self.packet(id, destination, payload, flags)?;
        encode(&packet)
    }

    /// Sends a packet and returns the id it went out with.
    ///
    /// An `id` of 0 picks a random one. With `ACK_REQUIRED` set the id is
    /// tracked once the transport has accepted the frame. Nothing is
    /// retransmitted if the ack never arrives.
    pub fn send(
        &mut self,
        id: u16,
        payload: &[u8],
        destination: &str,
        flags: PacketFlags,
    ) -> Result<NonZeroU16> {
        let packet = self.packet(id, destination, payload, flags)?;
        let frame = encode(&packet)?;

        self.transport.send(&frame)?;
        self.stats.frames_sent += 1;

        log::debug!(
            "sent packet id={} to '{}' ({} byte frame, flags={:#04x})",
            packet.id,
            packet.destination,
            packet.wire_size(),
            packet.flags.bits()
        );

        if packet.requires_ack() {
            self.tracker.mark_pending(packet.id);
        }

        Ok(packet.id)
    }

    /// Processes one inbound frame.
    ///
    /// Corrupt or malformed frames are dropped without touching the tracker
    /// or the handler. Ack frames clear the matching pending id. Other
    /// frames are acked if requested and then handed to the handler.
    pub fn handle_frame(&mut self, bytes: &[u8]) -> Dispatch {
        self.stats.frames_received += 1;

        let packet = match verify(bytes).and_then(|()| decode(bytes)) {
            Ok(packet) => packet,
            Err(err) => return self.drop_frame(&err),
        };

        let kind = FrameKind::classify(packet.flags);
        log::trace!(
            "received {:?} id={} from '{}' to '{}'",
            kind,
            packet.id,
            packet.source,
            packet.destination
        );

        if !kind.is_delivered() {
            self.stats.acks_received += 1;
            let was_pending = self.tracker.acknowledge(packet.id);
            if was_pending {
                log::debug!("packet id={} acknowledged by '{}'", packet.id, packet.source);
            }
            return Dispatch::Acknowledged {
                id: packet.id,
                was_pending,
            };
        }

        let replied = kind == FrameKind::AckRequired
            && self.config.auto_ack
            && self.reply_ack(&packet);
        let handled = self.deliver(&packet);
        Dispatch::Delivered {
            id: packet.id,
            kind,
            replied,
            handled,
        }
    }

    /// Checksum failures are counted, not logged.
    fn drop_frame(&mut self, err: &Error) -> Dispatch {
        match err {
            Error::ChecksumMismatch { .. } => {
                self.stats.checksum_errors += 1;
                Dispatch::Dropped(DropReason::Checksum)
            }
            _ => {
                log::trace!("dropping malformed frame: {}", err);
                self.stats.framing_errors += 1;
                Dispatch::Dropped(DropReason::Framing)
            }
        }
    }

    /// Sends the ack for `packet`. Failures are logged, never retried.
    fn reply_ack(&mut self, packet: &Packet) -> bool {
        let ack = packet.ack_reply(&self.config.identity);
        let sent = encode(&ack).and_then(|frame| self.transport.send(&frame));

        match sent {
            Ok(()) => {
                self.stats.frames_sent += 1;
                self.stats.acks_sent += 1;
                log::debug!("acked packet id={} to '{}'", ack.id, ack.destination);
                true
            }
            Err(err) => {
                log::warn!("failed to ack packet id={}: {}", ack.id, err);
                false
            }
        }
    }

    fn deliver(&mut self, packet: &Packet) -> bool {
        match self.handler.as_mut() {
            Some(handler) => {
                handler(packet);
                self.stats.packets_delivered += 1;
                true
            }
            None => false,
        }
    }
}
