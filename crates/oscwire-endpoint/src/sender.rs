use oscwire_codec::Arg;

use crate::error::Result;

/// One-call message senders shared by every endpoint flavor.
///
/// Implementors provide [`send`](Self::send); the typed helpers wrap the
/// common single-argument messages.
pub trait OscSender {
    /// Encode and transmit one message.
    fn send(&mut self, address: &str, args: &[Arg<'_>]) -> Result<()>;

    /// Send a single int32 message.
    fn send_int(&mut self, address: &str, value: i32) -> Result<()> {
        self.send(address, &[Arg::Int(value)])
    }

    /// Send a single float32 message.
    fn send_float(&mut self, address: &str, value: f32) -> Result<()> {
        self.send(address, &[Arg::Float(value)])
    }

    /// Send a single double64 message.
    fn send_double(&mut self, address: &str, value: f64) -> Result<()> {
        self.send(address, &[Arg::Double(value)])
    }

    /// Send a single int64 message.
    fn send_int64(&mut self, address: &str, value: i64) -> Result<()> {
        self.send(address, &[Arg::Int64(value)])
    }

    /// Send a single string message.
    fn send_string(&mut self, address: &str, value: &str) -> Result<()> {
        self.send(address, &[Arg::Str(value)])
    }

    /// Send a single blob message.
    fn send_blob(&mut self, address: &str, data: &[u8]) -> Result<()> {
        self.send(address, &[Arg::Blob(data)])
    }

    /// Send a single MIDI message.
    fn send_midi(&mut self, address: &str, event: [u8; 4]) -> Result<()> {
        self.send(address, &[Arg::Midi(event)])
    }

    /// Send a true marker message.
    fn send_true(&mut self, address: &str) -> Result<()> {
        self.send(address, &[Arg::True])
    }

    /// Send a false marker message.
    fn send_false(&mut self, address: &str) -> Result<()> {
        self.send(address, &[Arg::False])
    }

    /// Send a nil marker message.
    fn send_nil(&mut self, address: &str) -> Result<()> {
        self.send(address, &[Arg::Nil])
    }

    /// Send an impulse marker message.
    fn send_impulse(&mut self, address: &str) -> Result<()> {
        self.send(address, &[Arg::Impulse])
    }
}
