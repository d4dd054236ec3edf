use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};

use bytes::BytesMut;
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::PacketSink;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// UDP datagram transport.
///
/// One OSC packet maps to one datagram. The socket is non-blocking:
/// `recv_packet` returns `Ok(None)` when no datagram is waiting, and the
/// caller polls again later. Outbound packets are staged in an internal
/// buffer between `begin_packet` and `end_packet`, then sent as a single
/// datagram to the configured destination.
pub struct UdpTransport {
    socket: UdpSocket,
    destination: Option<SocketAddr>,
    outbound: BytesMut,
}

impl UdpTransport {
    /// Bind a non-blocking UDP socket on `addr`.
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr).map_err(|source| TransportError::Bind { addr, source })?;
        socket
            .set_nonblocking(true)
            .map_err(|source| TransportError::Bind { addr, source })?;
        info!(%addr, "udp transport bound");
        Ok(Self {
            socket,
            destination: None,
            outbound: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        })
    }

    /// Bind with a destination already configured.
    pub fn bind_with_destination(addr: SocketAddr, destination: SocketAddr) -> Result<Self> {
        let mut transport = Self::bind(addr)?;
        transport.set_destination(destination);
        Ok(transport)
    }

    /// Set the destination for subsequent outbound packets.
    pub fn set_destination(&mut self, destination: SocketAddr) {
        debug!(%destination, "udp destination set");
        self.destination = Some(destination);
    }

    /// Destination for outbound packets, if configured.
    pub fn destination(&self) -> Option<SocketAddr> {
        self.destination
    }

    /// Local address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive one datagram into `buf` if one is waiting.
    ///
    /// Returns the payload length and the sender address, or `Ok(None)`
    /// when nothing has arrived. A datagram longer than `buf` is truncated
    /// by the socket layer.
    pub fn recv_packet(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>> {
        loop {
            match self.socket.recv_from(buf) {
                Ok((len, from)) => return Ok(Some((len, from))),
                Err(err) if err.kind() == ErrorKind::WouldBlock => return Ok(None),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    /// Borrow the underlying socket.
    pub fn get_ref(&self) -> &UdpSocket {
        &self.socket
    }
}

impl PacketSink for UdpTransport {
    fn begin_packet(&mut self) -> Result<()> {
        self.outbound.clear();
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.outbound.extend_from_slice(bytes);
        Ok(())
    }

    fn end_packet(&mut self) -> Result<()> {
        let destination = self.destination.ok_or(TransportError::NoDestination)?;
        loop {
            match self.socket.send_to(&self.outbound, destination) {
                Ok(_) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl std::fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpTransport")
            .field("destination", &self.destination)
            .finish()
    }
}
