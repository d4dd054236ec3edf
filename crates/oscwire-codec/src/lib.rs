//! OSC 1.0 wire encoding and decoding.
//!
//! This is the core value-add layer of oscwire. Decoding is zero-copy: a
//! [`MessageView`] is a bounds-checked read cursor over a caller-owned
//! packet buffer, and a [`BundleView`] walks a bundle's length-prefixed
//! elements without materializing anything. Encoding streams one message
//! into any [`PacketSink`](oscwire_transport::PacketSink), padding to the
//! 4-byte alignment the wire format requires.
//!
//! Nothing in this crate allocates or blocks; it is written to run on
//! memory-constrained targets polled from a single-threaded main loop.

pub mod arg;
pub mod bundle;
pub mod endian;
pub mod error;
pub mod message;
pub mod writer;

pub use arg::Arg;
pub use bundle::{
    for_each_message, is_bundle, BundleView, Packet, BUNDLE_HEADER, TIMETAG_IMMEDIATELY,
};
pub use endian::WireOrder;
pub use error::{OscError, Result};
pub use message::MessageView;
pub use writer::{write_message, MessageWriter};
