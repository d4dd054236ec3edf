use std::io::{Read, Write};

use oscwire_codec::{write_message, Arg, MessageView};
use oscwire_slip::{SlipReader, SlipWriter};
use oscwire_transport::StreamSource;
use tracing::trace;

use crate::error::Result;
use crate::sender::OscSender;
use crate::{deliver, DEFAULT_RECV_CAPACITY};

/// An OSC endpoint over a SLIP-framed byte stream.
///
/// Pairs a packet reader on `input` with a packet writer on `output`; for
/// a serial port opened read/write, pass two handles to it. Receiving is
/// polled: each [`receive`](Self::receive) call decodes at most one packet
/// from the bytes available right now.
pub struct SlipEndpoint<R, W> {
    reader: SlipReader<StreamSource<R>>,
    writer: SlipWriter<W>,
    recv_buf: Vec<u8>,
    last_timetag: u64,
}

impl<R: Read, W: Write> SlipEndpoint<R, W> {
    /// Create an endpoint with the default receive capacity.
    pub fn new(input: R, output: W) -> Self {
        Self::with_capacity(input, output, DEFAULT_RECV_CAPACITY)
    }

    /// Create an endpoint with an explicit receive buffer capacity.
    ///
    /// Inbound packets longer than `capacity` are dropped by the framer.
    pub fn with_capacity(input: R, output: W, capacity: usize) -> Self {
        Self {
            reader: SlipReader::new(StreamSource::new(input)),
            writer: SlipWriter::new(output),
            recv_buf: vec![0; capacity],
            last_timetag: 0,
        }
    }

    /// Poll for one packet and dispatch its messages to `on_message`.
    ///
    /// Non-blocking: returns `Ok(())` without a callback when no complete
    /// packet has arrived yet.
    pub fn receive<F>(&mut self, on_message: F) -> Result<()>
    where
        F: FnMut(&mut MessageView<'_>),
    {
        let Some(len) = self.reader.poll_packet(&mut self.recv_buf)? else {
            return Ok(());
        };
        trace!(len, "slip packet received");
        deliver(&self.recv_buf[..len], &mut self.last_timetag, on_message);
        Ok(())
    }

    /// Timetag of the most recently received bundle (0 for a standalone
    /// message, 1 means "immediately").
    pub fn last_timetag(&self) -> u64 {
        self.last_timetag
    }

    /// Consume the endpoint and return the inner input and output.
    pub fn into_inner(self) -> (R, W) {
        (
            self.reader.into_inner().into_inner(),
            self.writer.into_inner(),
        )
    }
}

impl<R: Read, W: Write> OscSender for SlipEndpoint<R, W> {
    fn send(&mut self, address: &str, args: &[Arg<'_>]) -> Result<()> {
        write_message(&mut self.writer, address, args)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Run one endpoint's output back into another endpoint's input.
    fn loopback(wire: Vec<u8>) -> SlipEndpoint<Cursor<Vec<u8>>, Vec<u8>> {
        SlipEndpoint::new(Cursor::new(wire), Vec::new())
    }

    fn sent_wire<F>(send: F) -> Vec<u8>
    where
        F: FnOnce(&mut SlipEndpoint<Cursor<Vec<u8>>, Vec<u8>>),
    {
        let mut endpoint = loopback(Vec::new());
        send(&mut endpoint);
        endpoint.into_inner().1
    }

    #[test]
    fn send_receive_roundtrip() {
        let wire = sent_wire(|endpoint| {
            endpoint.send_float("/synth/1/freq", 440.0).unwrap();
        });

        let mut receiver = loopback(wire);
        let mut received = Vec::new();
        receiver
            .receive(|message| {
                assert!(message.check_address_and_type_tags("/synth/1/freq", "f"));
                received.push(message.next_f32().unwrap());
            })
            .unwrap();
        assert_eq!(received, vec![440.0]);
        assert_eq!(receiver.last_timetag(), 0);
    }

    #[test]
    fn each_receive_decodes_one_packet() {
        let wire = sent_wire(|endpoint| {
            endpoint.send_int("/a", 1).unwrap();
            endpoint.send_int("/b", 2).unwrap();
        });

        let mut receiver = loopback(wire);
        let mut seen = Vec::new();
        receiver
            .receive(|message| seen.push(message.address().to_string()))
            .unwrap();
        assert_eq!(seen, vec!["/a"]);
        receiver
            .receive(|message| seen.push(message.address().to_string()))
            .unwrap();
        assert_eq!(seen, vec!["/a", "/b"]);
    }

    #[test]
    fn convenience_senders_cover_each_type() {
        let wire = sent_wire(|endpoint| {
            endpoint.send_int("/i", -1).unwrap();
            endpoint.send_double("/d", 0.25).unwrap();
            endpoint.send_int64("/h", 1 << 40).unwrap();
            endpoint.send_string("/s", "osc").unwrap();
            endpoint.send_blob("/b", &[1, 2, 3]).unwrap();
            endpoint.send_midi("/m", [0, 0x90, 60, 100]).unwrap();
            endpoint.send_true("/t").unwrap();
            endpoint.send_false("/f").unwrap();
            endpoint.send_nil("/n").unwrap();
            endpoint.send_impulse("/imp").unwrap();
        });

        let mut receiver = loopback(wire);
        let mut tags = Vec::new();
        for _ in 0..10 {
            receiver
                .receive(|message| tags.push(message.type_tags().to_string()))
                .unwrap();
        }
        assert_eq!(tags, vec!["i", "d", "h", "s", "b", "m", "T", "F", "N", "I"]);
    }

    #[test]
    fn bundle_timetag_is_recorded() {
        // Hand-built bundle with one int message and timetag 7.
        let mut element = Vec::new();
        element.extend_from_slice(b"/tt\0,i\0\0");
        element.extend_from_slice(&3i32.to_be_bytes());

        let mut bundle = Vec::new();
        bundle.extend_from_slice(b"#bundle\0");
        bundle.extend_from_slice(&7u64.to_be_bytes());
        bundle.extend_from_slice(&(element.len() as u32).to_be_bytes());
        bundle.extend_from_slice(&element);

        let mut framed = Vec::new();
        {
            let mut writer = SlipWriter::new(&mut framed);
            writer.send_packet(&bundle).unwrap();
        }

        let mut receiver = loopback(framed);
        let mut seen = 0;
        receiver.receive(|_| seen += 1).unwrap();
        assert_eq!(seen, 1);
        assert_eq!(receiver.last_timetag(), 7);
    }

    #[test]
    fn malformed_packet_is_swallowed() {
        let mut framed = Vec::new();
        {
            let mut writer = SlipWriter::new(&mut framed);
            writer.send_packet(b"garbage without tags").unwrap();
        }

        let mut receiver = loopback(framed);
        let mut seen = 0;
        receiver.receive(|_| seen += 1).unwrap();
        assert_eq!(seen, 0);
    }

    #[test]
    fn oversized_packet_dropped_next_survives() {
        let wire = sent_wire(|endpoint| {
            endpoint.send_blob("/big", &[0u8; 64]).unwrap();
            endpoint.send_int("/small", 5).unwrap();
        });

        let mut receiver = SlipEndpoint::with_capacity(Cursor::new(wire), Vec::new(), 32);
        let mut seen = Vec::new();
        receiver
            .receive(|message| seen.push(message.address().to_string()))
            .unwrap();
        assert_eq!(seen, vec!["/small"]);
    }
}
