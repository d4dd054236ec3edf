use std::net::SocketAddr;

use oscwire_codec::{write_message, Arg, MessageView};
use oscwire_transport::UdpTransport;
use tracing::trace;

use crate::error::Result;
use crate::sender::OscSender;
use crate::{deliver, DEFAULT_RECV_CAPACITY};

/// An OSC endpoint over UDP datagrams.
///
/// One message or bundle per datagram; no framing layer is needed.
/// Receiving is polled, like every other endpoint: each
/// [`receive`](Self::receive) call handles at most one waiting datagram.
pub struct UdpEndpoint {
    transport: UdpTransport,
    recv_buf: Vec<u8>,
    last_timetag: u64,
}

impl UdpEndpoint {
    /// Bind an endpoint on `addr` with the default receive capacity.
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        Self::with_capacity(addr, DEFAULT_RECV_CAPACITY)
    }

    /// Bind with an explicit receive buffer capacity.
    ///
    /// Datagrams longer than `capacity` are truncated by the socket.
    pub fn with_capacity(addr: SocketAddr, capacity: usize) -> Result<Self> {
        Ok(Self {
            transport: UdpTransport::bind(addr)?,
            recv_buf: vec![0; capacity],
            last_timetag: 0,
        })
    }

    /// Set the destination for outbound messages.
    pub fn set_destination(&mut self, destination: SocketAddr) {
        self.transport.set_destination(destination);
    }

    /// Local address the endpoint is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.transport.local_addr()?)
    }

    /// Poll for one datagram and dispatch its messages to `on_message`.
    ///
    /// Non-blocking: returns `Ok(())` without a callback when nothing has
    /// arrived.
    pub fn receive<F>(&mut self, on_message: F) -> Result<()>
    where
        F: FnMut(&mut MessageView<'_>),
    {
        let Some((len, from)) = self.transport.recv_packet(&mut self.recv_buf)? else {
            return Ok(());
        };
        trace!(len, %from, "udp packet received");
        deliver(&self.recv_buf[..len], &mut self.last_timetag, on_message);
        Ok(())
    }

    /// Timetag of the most recently received bundle (0 for a standalone
    /// message, 1 means "immediately").
    pub fn last_timetag(&self) -> u64 {
        self.last_timetag
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &UdpTransport {
        &self.transport
    }
}

impl OscSender for UdpEndpoint {
    fn send(&mut self, address: &str, args: &[Arg<'_>]) -> Result<()> {
        write_message(&mut self.transport, address, args)?;
        Ok(())
    }
}
