use crate::error::Result;

/// An outbound packet sink.
///
/// Implementations delimit packets however their medium requires: a UDP
/// transport maps one packet to one datagram, a SLIP writer brackets the
/// payload with terminator bytes. Writers call `begin_packet`, then
/// `write_bytes` any number of times, then `end_packet` to transmit.
pub trait PacketSink {
    /// Open a new outbound packet.
    fn begin_packet(&mut self) -> Result<()>;

    /// Append raw payload bytes to the current packet.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Close and transmit the current packet.
    fn end_packet(&mut self) -> Result<()>;
}

/// A polled, non-blocking source of inbound bytes.
///
/// `read_byte` never waits: it returns `Ok(None)` when no byte is
/// currently available, and the caller polls again once the transport may
/// have produced more. Framing layers bound their loops to the bytes
/// available right now.
pub trait ByteSource {
    /// Number of bytes already buffered and readable without blocking.
    fn bytes_available(&self) -> usize;

    /// Read one byte if immediately available.
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

impl<S: PacketSink + ?Sized> PacketSink for &mut S {
    fn begin_packet(&mut self) -> Result<()> {
        (**self).begin_packet()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }

    fn end_packet(&mut self) -> Result<()> {
        (**self).end_packet()
    }
}
