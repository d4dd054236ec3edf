//! Transport abstraction for OSC packet I/O.
//!
//! Provides the two trait seams the framing and codec layers are written
//! against:
//! - [`PacketSink`] — open, fill, and transmit one outbound packet
//! - [`ByteSource`] — polled, non-blocking inbound bytes
//!
//! plus a UDP datagram transport and an adapter that turns any
//! `std::io::Read` byte stream (serial port, TCP, stdin) into a
//! [`ByteSource`]. This is the lowest layer of oscwire. Everything else
//! builds on the traits provided here.

pub mod error;
pub mod stream;
pub mod traits;
pub mod udp;

pub use error::{Result, TransportError};
pub use stream::StreamSource;
pub use traits::{ByteSource, PacketSink};
pub use udp::UdpTransport;
