use oscwire_transport::{ByteSource, TransportError};

use crate::codec::SlipDecoder;
use crate::error::{Result, SlipError};

/// Reads SLIP-framed packets from a polled byte source.
///
/// `poll_packet` is non-blocking and resumable: it consumes whatever the
/// source has available right now and returns `Ok(None)` if that was not
/// enough to finish a packet. Decoder state carries over, so the caller
/// simply polls again once more bytes may have arrived.
pub struct SlipReader<S> {
    inner: S,
    decoder: SlipDecoder,
}

impl<S: ByteSource> SlipReader<S> {
    /// Wrap a byte source.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            decoder: SlipDecoder::new(),
        }
    }

    /// Decode the next packet into `dst` from currently-available input.
    ///
    /// Returns `Ok(Some(len))` for a completed non-empty packet and
    /// `Ok(None)` when input ran dry first. Empty packets (back-to-back
    /// terminators, and the flush after an oversized packet was dropped)
    /// are discarded internally.
    pub fn poll_packet(&mut self, dst: &mut [u8]) -> Result<Option<usize>> {
        loop {
            let byte = match self.inner.read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => return Ok(None),
                Err(TransportError::Closed) => return Err(SlipError::ConnectionClosed),
                Err(err) => return Err(SlipError::Transport(err)),
            };
            if let Some(len) = self.decoder.push(byte, dst) {
                if len > 0 {
                    return Ok(Some(len));
                }
            }
        }
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}
