//! SLIP packet framing for byte-stream transports.
//!
//! SLIP delimits packets on an undifferentiated byte stream with a
//! terminator byte (`0xC0`) and escapes occurrences of the reserved bytes
//! inside the payload, so a single OSC packet can travel over a serial
//! line or TCP stream without an out-of-band length header.
//!
//! The decoder is a resumable state machine over a caller-owned buffer:
//! feed it whatever bytes the transport has right now, get a packet back
//! the moment a terminator arrives.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{encode, SlipDecoder, END, ESC, ESC_END, ESC_ESC};
pub use error::{Result, SlipError};
pub use reader::SlipReader;
pub use writer::SlipWriter;
