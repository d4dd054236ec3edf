use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::error::{Result, TransportError};
use crate::traits::ByteSource;

const READ_CHUNK_SIZE: usize = 256;

/// Adapts any `Read` byte stream into a polled [`ByteSource`].
///
/// Serial ports, non-blocking TCP streams, stdin, and test cursors all fit.
/// Bytes are pulled in chunks into an internal buffer; `WouldBlock` from
/// the inner stream means "no byte available yet", end-of-input surfaces
/// as [`TransportError::Closed`] once the buffer is drained.
pub struct StreamSource<T> {
    inner: T,
    buf: BytesMut,
    eof: bool,
}

impl<T: Read> StreamSource<T> {
    /// Wrap a byte stream.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
            eof: false,
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the source and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn fill(&mut self) -> Result<()> {
        if self.eof {
            return Ok(());
        }
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<T: Read> ByteSource for StreamSource<T> {
    fn bytes_available(&self) -> usize {
        self.buf.len()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.buf.is_empty() {
            self.fill()?;
        }
        if self.buf.is_empty() {
            if self.eof {
                return Err(TransportError::Closed);
            }
            return Ok(None);
        }
        let byte = self.buf[0];
        self.buf.advance(1);
        Ok(Some(byte))
    }
}
