use std::net::SocketAddr;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{info, warn};
use packetlib::{Node, NodeConfig, PacketFlags, UdpTransport};

const DEFAULT_LOCAL_ADDR: &str = "0.0.0.0:47101";
const DEFAULT_TARGET_ADDR: &str = "255.255.255.255:47100";

/// Send one packet over the UDP broadcast radio.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Identity written as the packet source
    #[arg(long, default_value = "client")]
    identity: String,

    /// Destination identifier
    #[arg(long, default_value = "server")]
    destination: String,

    /// Payload text
    #[arg(long, default_value = "hello")]
    message: String,

    /// Packet id, 0 picks a random one
    #[arg(long, default_value_t = 0)]
    id: u16,

    /// Ask the receiver for an ack and wait for it
    #[arg(long)]
    ack: bool,

    /// How long to wait for the ack, in milliseconds
    #[arg(long, default_value_t = 2000)]
    wait_ms: u64,

    /// Local address to bind
    #[arg(long, default_value = DEFAULT_LOCAL_ADDR)]
    bind: SocketAddr,

    /// Address frames are broadcast to
    #[arg(long, default_value = DEFAULT_TARGET_ADDR)]
    target: SocketAddr,
}

fn main() -> Result<(), packetlib::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let transport = UdpTransport::bind(args.bind, args.target)?;
    let mut node = Node::new(transport, NodeConfig::new(args.identity))?;

    let flags = if args.ack {
        PacketFlags::ACK_REQUIRED
    } else {
        PacketFlags::NONE
    };

    let id = node.send(args.id, args.message.as_bytes(), &args.destination, flags)?;
    info!(
        "Sent packet id={} to '{}' via {}",
        id,
        args.destination,
        node.transport().target()
    );

    if !args.ack {
        return Ok(());
    }

    let deadline = Instant::now() + Duration::from_millis(args.wait_ms);
    let mut buf = UdpTransport::recv_buffer();

    while node.tracker().is_pending(id) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        node.transport().set_read_timeout(Some(remaining))?;

        let Some((n, from)) = node.transport().recv_from(&mut buf)? else {
            break;
        };
        let outcome = node.handle_frame(&buf[..n]);
        if outcome.is_dropped() {
            warn!("Dropped frame from {}: {:?}", from, outcome);
        }
    }

    if node.tracker().is_pending(id) {
        warn!("No ack for packet id={} within {} ms", id, args.wait_ms);
    } else {
        info!("Packet id={} acknowledged", id);
    }

    let stats = node.tracker().stats();
    info!("=== Client Finished ===");
    info!("Acks: {} of {} ({:.1}%)", stats.acknowledged, stats.registered, stats.ack_rate());

    Ok(())
}
