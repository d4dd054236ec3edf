use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use oscwire_transport::PacketSink;

use crate::codec::{stuff_byte, END};
use crate::error::{Result, SlipError};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes SLIP-framed packets to any `Write` stream.
///
/// Implements [`PacketSink`]: `begin_packet` and `end_packet` each emit a
/// terminator byte, payload bytes are stuffed in between. The framed
/// packet is staged internally and written to the stream in one burst when
/// the packet ends.
pub struct SlipWriter<W> {
    inner: W,
    buf: BytesMut,
}

impl<W: Write> SlipWriter<W> {
    /// Wrap a byte stream.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Frame and send one complete payload.
    pub fn send_packet(&mut self, payload: &[u8]) -> Result<()> {
        self.start();
        self.stuff(payload);
        self.finish()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn start(&mut self) {
        self.buf.clear();
        self.buf.extend_from_slice(&[END]);
    }

    fn stuff(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            stuff_byte(byte, &mut self.buf);
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.buf.extend_from_slice(&[END]);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(SlipError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(SlipError::Io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(SlipError::Io(err)),
            }
        }
    }
}

impl<W: Write> PacketSink for SlipWriter<W> {
    fn begin_packet(&mut self) -> oscwire_transport::Result<()> {
        self.start();
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> oscwire_transport::Result<()> {
        self.stuff(bytes);
        Ok(())
    }

    fn end_packet(&mut self) -> oscwire_transport::Result<()> {
        self.finish().map_err(into_transport_error)
    }
}

fn into_transport_error(err: SlipError) -> oscwire_transport::TransportError {
    match err {
        SlipError::Io(io) => oscwire_transport::TransportError::Io(io),
        SlipError::Transport(inner) => inner,
        SlipError::ConnectionClosed => oscwire_transport::TransportError::Closed,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::{SlipDecoder, ESC, ESC_ESC};

    #[test]
    fn send_packet_brackets_payload() {
        let mut writer = SlipWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send_packet(&[0x01, 0x02]).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire, vec![END, 0x01, 0x02, END]);
    }

    #[test]
    fn reserved_bytes_are_stuffed() {
        let mut writer = SlipWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send_packet(&[ESC]).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire, vec![END, ESC, ESC_ESC, END]);
    }

    #[test]
    fn packet_sink_roundtrip() {
        let mut writer = SlipWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.begin_packet().unwrap();
        writer.write_bytes(&[0x10, END]).unwrap();
        writer.write_bytes(&[0x20]).unwrap();
        writer.end_packet().unwrap();

        let wire = writer.into_inner().into_inner();
        let mut decoder = SlipDecoder::new();
        let mut dst = [0u8; 16];
        let mut decoded = Vec::new();
        for byte in wire {
            if let Some(len) = decoder.push(byte, &mut dst) {
                if len > 0 {
                    decoded.push(dst[..len].to_vec());
                }
            }
        }
        assert_eq!(decoded, vec![vec![0x10, END, 0x20]]);
    }

    #[test]
    fn zero_write_reports_connection_closed() {
        struct ZeroWriter;
        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = SlipWriter::new(ZeroWriter);
        let err = writer.send_packet(&[1]).unwrap_err();
        assert!(matches!(err, SlipError::ConnectionClosed));
    }

    #[test]
    fn interrupted_write_and_flush_retry() {
        struct InterruptedOnce {
            write_hiccup: bool,
            flush_hiccup: bool,
            data: Vec<u8>,
        }
        impl Write for InterruptedOnce {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.write_hiccup {
                    self.write_hiccup = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                if !self.flush_hiccup {
                    self.flush_hiccup = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                Ok(())
            }
        }

        let mut writer = SlipWriter::new(InterruptedOnce {
            write_hiccup: false,
            flush_hiccup: false,
            data: Vec::new(),
        });
        writer.send_packet(&[5, 6]).unwrap();
        assert_eq!(writer.get_ref().data, vec![END, 5, 6, END]);
    }
}
