//! OSC 1.0 encoding and decoding over SLIP streams and UDP.
//!
//! oscwire implements the Open Sound Control wire format (messages,
//! bundles, typed arguments) as zero-copy views and streaming writers,
//! with SLIP byte-stuffing for byte-stream transports.
//!
//! # Crate Structure
//!
//! - [`transport`] — Packet sink / byte source traits, UDP, stream adapter
//! - [`slip`] — SLIP packet framing for byte streams
//! - [`codec`] — OSC message/bundle encoding and decoding
//! - [`endpoint`] — High-level SLIP and UDP endpoints

/// Re-export transport types.
pub mod transport {
    pub use oscwire_transport::*;
}

/// Re-export SLIP framing types.
pub mod slip {
    pub use oscwire_slip::*;
}

/// Re-export codec types.
pub mod codec {
    pub use oscwire_codec::*;
}

/// Re-export endpoint types.
pub mod endpoint {
    pub use oscwire_endpoint::*;
}
