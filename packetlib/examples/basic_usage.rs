//! Basic usage example demonstrating the PacketLib protocol.
//!
//! This example shows how to:
//! - Compute and verify the XOR checksum
//! - Encode and decode a frame
//! - Exchange an ack-required packet between two nodes over loopback
//! - Watch a corrupted frame get dropped
//!
//! Run with: cargo run --example basic_usage

use packetlib::{
    checksum, decode, verify, Dispatch, LoopbackTransport, Node, NodeConfig, PacketFlags, Xor8,
};

fn main() -> Result<(), packetlib::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!("=== PacketLib Basic Usage Example ===\n");

    // Example 1: XOR checksum
    println!("1. XOR Checksum:");
    let data = b"Hello, PacketLib!";
    let sum = checksum(data);
    println!("   Data: {:?}", String::from_utf8_lossy(data));
    println!("   Checksum: 0x{:02X}", sum);
    println!("   Verify: {}\n", Xor8::verify(data, sum));

    // Example 2: Frame encoding
    println!("2. Frame Encoding:");
    let mut alice = Node::new(
        LoopbackTransport::new(),
        NodeConfig::new("alice").with_id_seed(2024),
    )?;
    let frame = alice.encode(100, "bob", b"Test payload data", PacketFlags::NONE)?;
    println!("   Frame size: {} bytes", frame.len());
    println!("   Frame bytes: {:02X?}", frame.as_bytes());

    verify(&frame)?;
    let decoded = decode(&frame)?;
    println!("   Decoded id: {}", decoded.id);
    println!("   Decoded payload: {:?}\n", decoded.payload_text());

    // Example 3: Ack exchange
    println!("3. Ack Exchange:");
    let mut bob = Node::new(LoopbackTransport::new(), NodeConfig::new("bob"))?;
    bob.on_receive(|packet| {
        println!(
            "   bob received {:?} from {}",
            packet.payload_text(),
            packet.source
        );
    });

    let id = alice.send(0, b"are you there?", "bob", PacketFlags::ACK_REQUIRED)?;
    println!("   alice sent id {} (pending: {})", id, alice.tracker().is_pending(id));

    for frame in alice.transport_mut().drain() {
        let outcome = bob.handle_frame(&frame);
        println!("   bob: {:?}", outcome);
    }
    for frame in bob.transport_mut().drain() {
        let outcome = alice.handle_frame(&frame);
        println!("   alice: {:?}", outcome);
    }
    println!("   alice pending after ack: {}\n", alice.tracker().is_pending(id));

    // Example 4: Corruption
    println!("4. Corrupted Frame:");
    alice.send(0, b"noisy", "bob", PacketFlags::NONE)?;
    if let Some(mut frame) = alice.transport_mut().pop() {
        frame[5] ^= 0x10;
        let outcome = bob.handle_frame(&frame);
        println!("   bob: {:?}", outcome);
        assert!(matches!(outcome, Dispatch::Dropped(_)));
    }

    let stats = bob.stats();
    println!("\n=== bob's statistics ===");
    println!("Frames received: {}", stats.frames_received);
    println!("Packets delivered: {}", stats.packets_delivered);
    println!("Acks sent: {}", stats.acks_sent);
    println!("Checksum errors: {}", stats.checksum_errors);

    Ok(())
}
