use crate::endian::WireOrder;
use crate::error::{OscError, Result};
use crate::message::MessageView;

/// Leading bytes of every OSC bundle: `#bundle` plus NUL.
pub const BUNDLE_HEADER: [u8; 8] = *b"#bundle\0";

/// Timetag value meaning "process immediately".
pub const TIMETAG_IMMEDIATELY: u64 = 1;

/// Whether the packet starts with the bundle header.
pub fn is_bundle(buf: &[u8]) -> bool {
    buf.len() >= BUNDLE_HEADER.len() && buf[..BUNDLE_HEADER.len()] == BUNDLE_HEADER
}

/// A bundle: timetag plus length-prefixed elements, walked in place.
///
/// Elements are yielded flat: a nested bundle comes back as an opaque
/// element region, not unwrapped recursively.
#[derive(Debug)]
pub struct BundleView<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl<'a> BundleView<'a> {
    /// Recognize a bundle. `None` if the header is absent or the buffer
    /// ends before the timetag.
    pub fn parse(buf: &'a [u8]) -> Option<Self> {
        if !is_bundle(buf) || buf.len() < 16 {
            return None;
        }
        Some(Self { buf, cursor: 16 })
    }

    /// The raw 64-bit timetag from bytes 8..16.
    pub fn timetag(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.buf[8..16]);
        u64::from_ne_bytes(bytes).from_wire()
    }

    /// The next length-prefixed element region, advancing the cursor.
    ///
    /// A length prefix that would run past the end of the bundle buffer
    /// ends the walk instead of reading out of bounds.
    pub fn next_element(&mut self) -> Option<&'a [u8]> {
        if self.cursor >= self.buf.len() {
            return None;
        }
        let prefix: [u8; 4] = self
            .buf
            .get(self.cursor..self.cursor + 4)?
            .try_into()
            .ok()?;
        let len = u32::from_ne_bytes(prefix).from_wire() as usize;

        let start = self.cursor + 4;
        let end = start.checked_add(len)?;
        let element = self.buf.get(start..end)?;

        self.cursor = end;
        Some(element)
    }
}

/// One received packet, classified.
#[derive(Debug)]
pub enum Packet<'a> {
    /// A standalone message.
    Message(MessageView<'a>),
    /// A bundle of messages.
    Bundle(BundleView<'a>),
}

impl<'a> Packet<'a> {
    /// Classify a packet buffer as a message or a bundle.
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        if is_bundle(buf) {
            let bundle = BundleView::parse(buf).ok_or(OscError::TruncatedBundle)?;
            Ok(Packet::Bundle(bundle))
        } else {
            Ok(Packet::Message(MessageView::parse(buf)?))
        }
    }
}

/// Decode one packet and invoke `on_message` for every message in it.
///
/// Bundle elements are visited in order, one callback per element. The
/// walk is flat: an element that is itself a bundle is skipped, not
/// unwrapped. An element that fails to parse is skipped and the walk
/// continues. A standalone message that fails to parse returns the error
/// and fires no callback.
pub fn for_each_message<F>(buf: &[u8], mut on_message: F) -> Result<()>
where
    F: FnMut(&mut MessageView<'_>),
{
    match Packet::parse(buf)? {
        Packet::Message(mut message) => on_message(&mut message),
        Packet::Bundle(mut bundle) => {
            while let Some(element) = bundle.next_element() {
                if is_bundle(element) {
                    continue;
                }
                if let Ok(mut message) = MessageView::parse(element) {
                    on_message(&mut message);
                }
            }
        }
    }
    Ok(())
}
