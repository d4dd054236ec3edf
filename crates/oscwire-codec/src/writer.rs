use oscwire_transport::PacketSink;

use crate::arg::Arg;
use crate::endian::WireOrder;
use crate::error::Result;

/// Serializes one OSC message into a packet sink.
///
/// Drives the `begin / address / type tags / arguments / finish` sequence
/// and keeps the single running byte counter the wire format's alignment
/// rules need: the address and tag string are NUL-padded to 4-byte
/// multiples, string and blob arguments pad after their data, numeric
/// arguments are already aligned.
///
/// [`write_message`] composes the whole sequence; the builder is public
/// for callers that stream arguments incrementally.
pub struct MessageWriter<'s, S: PacketSink> {
    sink: &'s mut S,
    written: usize,
}

impl<'s, S: PacketSink> MessageWriter<'s, S> {
    /// Open a packet on the sink and reset the byte counter.
    pub fn begin(sink: &'s mut S) -> Result<Self> {
        sink.begin_packet()?;
        Ok(Self { sink, written: 0 })
    }

    /// Emit the address and its NUL padding.
    pub fn write_address(&mut self, address: &str) -> Result<()> {
        self.write_bytes(address.as_bytes())?;
        self.write_bytes(&[0])?;
        self.pad()
    }

    /// Emit the comma-led type-tag string derived from `args`, padded.
    pub fn write_type_tags(&mut self, args: &[Arg<'_>]) -> Result<()> {
        self.write_bytes(&[b','])?;
        for arg in args {
            self.write_bytes(&[arg.type_tag()])?;
        }
        self.write_bytes(&[0])?;
        self.pad()
    }

    /// Emit one argument's bytes.
    pub fn write_arg(&mut self, arg: &Arg<'_>) -> Result<()> {
        match *arg {
            Arg::Int(value) => self.write_bytes(&value.to_wire().to_ne_bytes()),
            Arg::Float(value) => self.write_bytes(&value.to_wire().to_ne_bytes()),
            Arg::Double(value) => self.write_bytes(&value.to_wire().to_ne_bytes()),
            Arg::Int64(value) => self.write_bytes(&value.to_wire().to_ne_bytes()),
            Arg::Str(text) => {
                self.write_bytes(text.as_bytes())?;
                self.write_bytes(&[0])?;
                self.pad()
            }
            Arg::Blob(data) => {
                self.write_bytes(&(data.len() as u32).to_wire().to_ne_bytes())?;
                self.write_bytes(data)?;
                self.pad()
            }
            Arg::Midi(event) => self.write_bytes(&event),
            // Markers live entirely in the tag string.
            Arg::True | Arg::False | Arg::Nil | Arg::Impulse => Ok(()),
        }
    }

    /// Close and transmit the packet.
    pub fn finish(self) -> Result<()> {
        self.sink.end_packet()?;
        Ok(())
    }

    /// Bytes emitted so far for this message.
    pub fn written(&self) -> usize {
        self.written
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write_bytes(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    fn pad(&mut self) -> Result<()> {
        while self.written % 4 != 0 {
            self.write_bytes(&[0])?;
        }
        Ok(())
    }
}

/// Encode one complete message into the sink.
pub fn write_message<S: PacketSink>(sink: &mut S, address: &str, args: &[Arg<'_>]) -> Result<()> {
    let mut writer = MessageWriter::begin(sink)?;
    writer.write_address(address)?;
    writer.write_type_tags(args)?;
    for arg in args {
        writer.write_arg(arg)?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use oscwire_transport::TransportError;

    use super::*;
    use crate::message::MessageView;

    /// Collects finished packets; packet boundaries are recorded so tests
    /// can assert on exact payloads.
    #[derive(Default)]
    struct CollectSink {
        current: Vec<u8>,
        packets: Vec<Vec<u8>>,
    }

    impl PacketSink for CollectSink {
        fn begin_packet(&mut self) -> oscwire_transport::Result<()> {
            self.current.clear();
            Ok(())
        }

        fn write_bytes(&mut self, bytes: &[u8]) -> oscwire_transport::Result<()> {
            self.current.extend_from_slice(bytes);
            Ok(())
        }

        fn end_packet(&mut self) -> oscwire_transport::Result<()> {
            self.packets.push(std::mem::take(&mut self.current));
            Ok(())
        }
    }

    fn encode(address: &str, args: &[Arg<'_>]) -> Vec<u8> {
        let mut sink = CollectSink::default();
        write_message(&mut sink, address, args).unwrap();
        assert_eq!(sink.packets.len(), 1);
        sink.packets.remove(0)
    }

    #[test]
    fn float_message_matches_reference_bytes() {
        let wire = encode("/synth/1/freq", &[Arg::Float(440.0)]);

        let mut expected = Vec::new();
        expected.extend_from_slice(b"/synth/1/freq\0\0\0");
        expected.extend_from_slice(b",f\0\0");
        expected.extend_from_slice(&440.0f32.to_be_bytes());
        assert_eq!(wire, expected);
        assert_eq!(wire.len(), 24);
    }

    #[test]
    fn every_message_length_is_a_multiple_of_four() {
        let cases: Vec<(&str, Vec<Arg<'_>>)> = vec![
            ("/a", vec![]),
            ("/ab", vec![Arg::Int(1)]),
            ("/abc", vec![Arg::Str("x")]),
            ("/abcd", vec![Arg::Str("xyzw"), Arg::Blob(&[1, 2, 3])]),
            ("/e", vec![Arg::Blob(&[])]),
            ("/f", vec![Arg::Double(0.5), Arg::Int64(-9)]),
            ("/g", vec![Arg::True, Arg::Nil, Arg::Impulse, Arg::False]),
            ("/h", vec![Arg::Midi([1, 2, 3, 4])]),
        ];
        for (address, args) in cases {
            let wire = encode(address, &args);
            assert_eq!(wire.len() % 4, 0, "unaligned message for {address}");
        }
    }

    #[test]
    fn markers_emit_no_argument_bytes() {
        let wire = encode("/flags", &[Arg::True, Arg::False, Arg::Nil, Arg::Impulse]);
        // Address (8) + ",TFNI\0\0\0" (8), nothing after.
        assert_eq!(wire.len(), 16);
        assert_eq!(&wire[8..16], b",TFNI\0\0\0");
    }

    #[test]
    fn roundtrip_is_bit_exact() {
        let blob = [0xC0u8, 0xDB, 0x00, 0xFF, 0x7E];
        let args = [
            Arg::Int(-123456),
            Arg::Float(f32::MIN_POSITIVE),
            Arg::Str("hello osc"),
            Arg::Blob(&blob),
            Arg::Double(-1e300),
            Arg::Int64(i64::MAX),
            Arg::Midi([0x01, 0x90, 0x3C, 0x64]),
            Arg::True,
        ];
        let wire = encode("/round/trip", &args);

        let mut view = MessageView::parse(&wire).unwrap();
        assert!(view.check_address_and_type_tags("/round/trip", "ifsbdhmT"));
        assert_eq!(view.next_i32(), Some(-123456));
        assert_eq!(
            view.next_f32().map(f32::to_bits),
            Some(f32::MIN_POSITIVE.to_bits())
        );
        assert_eq!(view.next_str(), Some("hello osc"));
        assert_eq!(view.next_blob(), Some(&blob[..]));
        assert_eq!(view.next_f64().map(f64::to_bits), Some((-1e300f64).to_bits()));
        assert_eq!(view.next_i64(), Some(i64::MAX));
        assert_eq!(view.next_midi(), Some([0x01, 0x90, 0x3C, 0x64]));
        assert_eq!(view.next_marker(), Some('T'));
        assert_eq!(view.peek_type_tag(), None);
    }

    #[test]
    fn string_padding_matches_wire_format() {
        // 4-byte string needs a full pad word after its terminator.
        let wire = encode("/s", &[Arg::Str("abcd")]);
        let mut expected = Vec::new();
        expected.extend_from_slice(b"/s\0\0,s\0\0");
        expected.extend_from_slice(b"abcd\0\0\0\0");
        assert_eq!(wire, expected);
    }

    #[test]
    fn blob_length_prefix_is_big_endian() {
        let wire = encode("/b", &[Arg::Blob(&[0xAA, 0xBB])]);
        let mut expected = Vec::new();
        expected.extend_from_slice(b"/b\0\0,b\0\0");
        expected.extend_from_slice(&2u32.to_be_bytes());
        expected.extend_from_slice(&[0xAA, 0xBB, 0x00, 0x00]);
        assert_eq!(wire, expected);
    }

    #[test]
    fn sink_failure_propagates() {
        struct RefusingSink;
        impl PacketSink for RefusingSink {
            fn begin_packet(&mut self) -> oscwire_transport::Result<()> {
                Err(TransportError::NoDestination)
            }
            fn write_bytes(&mut self, _bytes: &[u8]) -> oscwire_transport::Result<()> {
                Ok(())
            }
            fn end_packet(&mut self) -> oscwire_transport::Result<()> {
                Ok(())
            }
        }

        let err = write_message(&mut RefusingSink, "/x", &[]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::OscError::Transport(TransportError::NoDestination)
        ));
    }
}
