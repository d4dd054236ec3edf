use crate::endian::WireOrder;
use crate::error::{OscError, Result};

/// A decoded OSC message: a read cursor over a caller-owned packet buffer.
///
/// Nothing is copied out of the buffer. The view holds offsets: the
/// address, the type-tag string, and a read cursor that starts at the
/// first argument byte and advances as arguments are consumed. Every read
/// validates remaining length first; the first `None` from a `next_*`
/// reader means the message ran short and iteration should stop.
///
/// The read cursor stays 4-byte aligned relative to the argument region
/// between reads, mirroring the wire format's padding rules.
#[derive(Debug)]
pub struct MessageView<'a> {
    buf: &'a [u8],
    address_end: usize,
    tags_start: usize,
    tags_end: usize,
    read_cursor: usize,
    type_cursor: usize,
}

impl<'a> MessageView<'a> {
    /// Parse one message from a packet buffer.
    ///
    /// The address is whatever precedes the first NUL; no syntax
    /// validation is applied to it. The type-tag string must start with a
    /// comma and be NUL-terminated inside the buffer. Argument data begins
    /// at the first 4-byte-aligned offset strictly past that terminator.
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        let address_end = find_nul(buf, 0).ok_or(OscError::MissingTypeTags)?;

        let comma = buf[address_end..]
            .iter()
            .position(|&b| b == b',')
            .map(|pos| address_end + pos)
            .ok_or(OscError::MissingTypeTags)?;

        let tags_start = comma + 1;
        let tags_end = find_nul(buf, tags_start).ok_or(OscError::UnterminatedTypeTags)?;

        let read_cursor = (tags_end + 4) & !0x3;

        Ok(Self {
            buf,
            address_end,
            tags_start,
            tags_end,
            read_cursor,
            type_cursor: 0,
        })
    }

    /// The message address.
    pub fn address(&self) -> &'a str {
        std::str::from_utf8(&self.buf[..self.address_end]).unwrap_or("")
    }

    /// The type-tag characters, without the leading comma.
    pub fn type_tags(&self) -> &'a str {
        std::str::from_utf8(&self.buf[self.tags_start..self.tags_end]).unwrap_or("")
    }

    /// Whether the address matches exactly.
    pub fn check_address(&self, address: &str) -> bool {
        &self.buf[..self.address_end] == address.as_bytes()
    }

    /// Whether both the address and the type tags match exactly.
    pub fn check_address_and_type_tags(&self, address: &str, tags: &str) -> bool {
        self.check_address(address) && &self.buf[self.tags_start..self.tags_end] == tags.as_bytes()
    }

    /// The tag of the next unread argument, without consuming it.
    pub fn peek_type_tag(&self) -> Option<char> {
        self.buf[self.tags_start..self.tags_end]
            .get(self.type_cursor)
            .map(|&b| b as char)
    }

    /// Read the next argument as a 32-bit integer.
    pub fn next_i32(&mut self) -> Option<i32> {
        self.take4().map(|b| i32::from_ne_bytes(b).from_wire())
    }

    /// Read the next argument as a 32-bit float.
    pub fn next_f32(&mut self) -> Option<f32> {
        self.take4().map(|b| f32::from_ne_bytes(b).from_wire())
    }

    /// Read the next argument as a 64-bit float.
    pub fn next_f64(&mut self) -> Option<f64> {
        self.take8().map(|b| f64::from_ne_bytes(b).from_wire())
    }

    /// Read the next argument as a 64-bit integer.
    pub fn next_i64(&mut self) -> Option<i64> {
        self.take8().map(|b| i64::from_ne_bytes(b).from_wire())
    }

    /// Read the next argument as a NUL-terminated string.
    ///
    /// Returns `None`, without advancing, if no terminator exists before
    /// the buffer end or the bytes are not valid UTF-8.
    pub fn next_str(&mut self) -> Option<&'a str> {
        let start = self.read_cursor;
        let nul = find_nul(self.buf, start)?;
        let text = std::str::from_utf8(&self.buf[start..nul]).ok()?;
        self.read_cursor = start + ((nul - start + 4) & !0x3);
        self.type_cursor += 1;
        Some(text)
    }

    /// Read the next argument as a length-prefixed blob.
    ///
    /// The declared length is checked against the remaining buffer; an
    /// oversized claim returns `None` and leaves the cursor in place.
    pub fn next_blob(&mut self) -> Option<&'a [u8]> {
        let start = self.read_cursor;
        let prefix: [u8; 4] = self.buf.get(start..start + 4)?.try_into().ok()?;
        let len = u32::from_ne_bytes(prefix).from_wire() as usize;

        let data_start = start + 4;
        let data_end = data_start.checked_add(len)?;
        if data_end > self.buf.len() {
            return None;
        }

        // Skip the length field plus the blob rounded up to alignment.
        self.read_cursor = start + ((len + 7) & !0x3);
        self.type_cursor += 1;
        Some(&self.buf[data_start..data_end])
    }

    /// Read the next argument as a 4-byte MIDI event.
    pub fn next_midi(&mut self) -> Option<[u8; 4]> {
        self.take4()
    }

    /// Consume a zero-byte marker tag (`T`, `F`, `N`, `I`).
    ///
    /// Marker arguments live entirely in the tag string, so this advances
    /// only the type cursor. Returns the tag, or `None` if the current tag
    /// carries data (or no tags remain).
    pub fn next_marker(&mut self) -> Option<char> {
        match self.peek_type_tag() {
            Some(tag @ ('T' | 'F' | 'N' | 'I')) => {
                self.type_cursor += 1;
                Some(tag)
            }
            _ => None,
        }
    }

    fn take4(&mut self) -> Option<[u8; 4]> {
        let bytes = self
            .buf
            .get(self.read_cursor..self.read_cursor + 4)?
            .try_into()
            .ok()?;
        self.read_cursor += 4;
        self.type_cursor += 1;
        Some(bytes)
    }

    fn take8(&mut self) -> Option<[u8; 8]> {
        let bytes = self
            .buf
            .get(self.read_cursor..self.read_cursor + 8)?
            .try_into()
            .ok()?;
        self.read_cursor += 8;
        self.type_cursor += 1;
        Some(bytes)
    }
}

fn find_nul(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .iter()
        .position(|&b| b == 0)
        .map(|pos| from + pos)
}
