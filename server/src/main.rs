use std::net::SocketAddr;

use clap::Parser;
use log::{debug, info};
use packetlib::{Dispatch, Node, NodeConfig, UdpTransport};

const DEFAULT_LOCAL_ADDR: &str = "0.0.0.0:47100";
const DEFAULT_TARGET_ADDR: &str = "255.255.255.255:47101";

/// Listen on the UDP broadcast radio and acknowledge what arrives.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Identity written as the source of acks
    #[arg(long, default_value = "server")]
    identity: String,

    /// Do not answer ack-required packets
    #[arg(long)]
    no_ack: bool,

    /// Stop after this many delivered packets
    #[arg(long)]
    count: Option<u64>,

    /// Local address to bind
    #[arg(long, default_value = DEFAULT_LOCAL_ADDR)]
    bind: SocketAddr,

    /// Address acks are broadcast to
    #[arg(long, default_value = DEFAULT_TARGET_ADDR)]
    target: SocketAddr,
}

fn main() -> Result<(), packetlib::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    let args = Args::parse();

    let transport = UdpTransport::bind(args.bind, args.target)?;
    let config = NodeConfig::new(args.identity).with_auto_ack(!args.no_ack);
    let mut node = Node::new(transport, config)?;

    let identity = node.identity().to_owned();
    node.on_receive(move |packet| {
        let marker = if packet.is_addressed_to(&identity) {
            ""
        } else {
            " (not for us)"
        };
        info!(
            "Packet id={} from '{}' to '{}'{}: {}",
            packet.id,
            packet.source,
            packet.destination,
            marker,
            packet.payload_text()
        );
    });

    info!("Server listening on {}", node.transport().local_addr()?);

    let mut buf = UdpTransport::recv_buffer();
    loop {
        let Some((n, from)) = node.transport().recv_from(&mut buf)? else {
            continue;
        };

        let outcome = node.handle_frame(&buf[..n]);
        debug!("{} byte frame from {}: {:?}", n, from, outcome);

        if let Dispatch::Delivered { .. } = outcome {
            if args
                .count
                .is_some_and(|count| node.stats().packets_delivered >= count)
            {
                break;
            }
        }
    }

    let stats = node.stats();
    info!("=== Server Finished ===");
    info!("Frames received: {}", stats.frames_received);
    info!("Packets delivered: {}", stats.packets_delivered);
    info!("Acks sent: {}", stats.acks_sent);
    info!(
        "Dropped: {} checksum, {} framing",
        stats.checksum_errors, stats.framing_errors
    );

    Ok(())
}
