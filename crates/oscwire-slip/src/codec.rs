use bytes::BytesMut;

/// Packet terminator.
pub const END: u8 = 0xC0;
/// Escape marker.
pub const ESC: u8 = 0xDB;
/// Escaped form of `END`.
pub const ESC_END: u8 = 0xDC;
/// Escaped form of `ESC`.
pub const ESC_ESC: u8 = 0xDD;

/// Resumable SLIP unstuffing state machine.
///
/// Decoded payload bytes accumulate in a caller-owned buffer, one wire
/// byte per [`push`](Self::push) call. The decoder never waits for input
/// and never allocates; state survives across calls so a packet can arrive
/// in arbitrarily small pieces.
///
/// A packet longer than the destination buffer is dropped in its entirety:
/// the overflow flag sticks until the next terminator, which flushes the
/// damage and resynchronizes the stream. An escape marker followed by
/// anything other than `ESC_END`/`ESC_ESC` drops the offending byte and
/// continues.
#[derive(Debug, Default)]
pub struct SlipDecoder {
    parse_index: usize,
    escaping: bool,
    overflowed: bool,
}

impl SlipDecoder {
    /// Create a decoder in the empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one wire byte, accumulating payload into `dst`.
    ///
    /// Returns `Some(len)` when `byte` terminates a packet; `len` is the
    /// accumulated payload length and may be 0 (back-to-back terminators
    /// produce an empty packet, as does the flush after an overflow).
    /// Returns `None` when the byte did not complete a packet.
    pub fn push(&mut self, byte: u8, dst: &mut [u8]) -> Option<usize> {
        if self.escaping {
            self.escaping = false;
            match byte {
                ESC_END => self.store(END, dst),
                ESC_ESC => self.store(ESC, dst),
                // Stray escape: drop the byte and keep decoding.
                _ => {}
            }
            return None;
        }

        match byte {
            END => {
                let len = self.parse_index;
                self.parse_index = 0;
                self.escaping = false;
                self.overflowed = false;
                Some(len)
            }
            ESC if !self.overflowed => {
                self.escaping = true;
                None
            }
            _ => {
                self.store(byte, dst);
                None
            }
        }
    }

    /// Bytes accumulated for the in-progress packet.
    pub fn pending(&self) -> usize {
        self.parse_index
    }

    /// Whether the in-progress packet has overflowed the destination.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Discard any partial packet and return to the empty state.
    pub fn reset(&mut self) {
        self.parse_index = 0;
        self.escaping = false;
        self.overflowed = false;
    }

    fn store(&mut self, byte: u8, dst: &mut [u8]) {
        if self.overflowed {
            return;
        }
        if self.parse_index >= dst.len() {
            self.overflowed = true;
            self.parse_index = 0;
            return;
        }
        dst[self.parse_index] = byte;
        self.parse_index += 1;
    }
}

/// Encode one payload as a complete SLIP packet into `dst`.
///
/// The packet is bracketed by `END` on both sides; a leading terminator
/// flushes any line noise accumulated at the receiver before the frame.
pub fn encode(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(payload.len() + 2);
    dst.extend_from_slice(&[END]);
    for &byte in payload {
        stuff_byte(byte, dst);
    }
    dst.extend_from_slice(&[END]);
}

/// Append the escaped form of one payload byte to `dst`.
pub fn stuff_byte(byte: u8, dst: &mut BytesMut) {
    match byte {
        END => dst.extend_from_slice(&[ESC, ESC_END]),
        ESC => dst.extend_from_slice(&[ESC, ESC_ESC]),
        _ => dst.extend_from_slice(&[byte]),
    }
}
