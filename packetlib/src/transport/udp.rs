//! UDP broadcast transport.
//!
//! Stands in for a shared radio channel: every node binds the same port and
//! frames are sent to a broadcast (or loopback) address, one frame per
//! datagram.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use super::Transport;
use crate::core::MAX_FRAME_SIZE;
use crate::error::{Error, Result};

/// Transport sending each frame as one UDP datagram.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpTransport {
    /// Binds `local` and broadcasts frames to `target`.
    pub fn bind(local: impl ToSocketAddrs, target: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(local)?;
        Self::from_socket(socket, target)
    }

    /// Wraps an already bound socket.
    pub fn from_socket(socket: UdpSocket, target: SocketAddr) -> Result<Self> {
        socket.set_broadcast(true)?;
        log::debug!(
            "udp transport on {:?}, sending to {}",
            socket.local_addr().ok(),
            target
        );
        Ok(Self { socket, target })
    }

    /// Returns the address frames are sent to.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Returns the local address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Sets how long [`recv_from`](Self::recv_from) blocks; `None` blocks forever.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        Ok(self.socket.set_read_timeout(timeout)?)
    }

    /// Receives one datagram into `buf`.
    ///
    /// Returns `Ok(None)` when the read timeout expires.
    pub fn recv_from(&self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>> {
        match self.socket.recv_from(buf) {
            Ok(received) => Ok(Some(received)),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns a receive buffer large enough for any frame.
    pub fn recv_buffer() -> Vec<u8> {
        // One spare byte lets oversized datagrams show up as framing errors
        vec![0u8; MAX_FRAME_SIZE + 1]
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        let sent = self.socket.send_to(frame, self.target)?;
        if sent != frame.len() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::WriteZero,
                "datagram truncated",
            )));
        }
        log::trace!("sent {} byte frame to {}", sent, self.target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_roundtrip_on_localhost() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let target = receiver.local_addr().unwrap();

        let mut transport = UdpTransport::bind("127.0.0.1:0", target).unwrap();
        transport.send(b"over the air").unwrap();

        let mut buf = UdpTransport::recv_buffer();
        let (n, from) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"over the air");
        assert_eq!(from, transport.local_addr().unwrap());
    }

    #[test]
    fn test_recv_timeout_returns_none() {
        let transport = UdpTransport::bind("127.0.0.1:0", "127.0.0.1:9".parse().unwrap()).unwrap();
        transport
            .set_read_timeout(Some(Duration::from_millis(20)))
            .unwrap();

        let mut buf = UdpTransport::recv_buffer();
        assert!(transport.recv_from(&mut buf).unwrap().is_none());
    }
}
