//! High-level OSC endpoints.
//!
//! This is the "just works" layer: a [`SlipEndpoint`] pairs a SLIP reader
//! and writer over any byte stream, a [`UdpEndpoint`] wraps a datagram
//! socket, and both expose the same poll-and-dispatch receive call plus
//! one-call senders for each OSC argument type via [`OscSender`].

pub mod error;
pub mod sender;
pub mod slip;
pub mod udp;

pub use error::{EndpointError, Result};
pub use sender::OscSender;
pub use slip::SlipEndpoint;
pub use udp::UdpEndpoint;

use oscwire_codec::{for_each_message, BundleView, MessageView};
use tracing::warn;

/// Receive buffer size endpoints allocate by default.
pub const DEFAULT_RECV_CAPACITY: usize = 1024;

/// Dispatch one received packet: record its timetag (0 for a standalone
/// message) and fire the callback per message. Malformed packets are
/// logged and swallowed; an unattended device keeps running.
pub(crate) fn deliver<F>(packet: &[u8], last_timetag: &mut u64, on_message: F)
where
    F: FnMut(&mut MessageView<'_>),
{
    *last_timetag = BundleView::parse(packet).map_or(0, |bundle| bundle.timetag());
    if let Err(err) = for_each_message(packet, on_message) {
        warn!(error = %err, "dropping malformed osc packet");
    }
}
