use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use oscwire_codec::MessageView;
use oscwire_endpoint::{EndpointError, SlipEndpoint, UdpEndpoint};
use oscwire_slip::SlipError;
use serde::Serialize;
use serde_json::Value;

use crate::cmd::{ListenArgs, OutputFormat};
use crate::exit::{endpoint_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: ListenArgs) -> CliResult<i32> {
    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    if args.slip {
        listen_slip(&args, &running)
    } else {
        listen_udp(&args, &running)
    }
}

fn listen_udp(args: &ListenArgs, running: &AtomicBool) -> CliResult<i32> {
    let mut endpoint =
        UdpEndpoint::bind(args.bind).map_err(|err| endpoint_error("bind failed", err))?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let mut batch = Vec::new();
        endpoint
            .receive(|message| batch.push(DecodedMessage::from_view(message)))
            .map_err(|err| endpoint_error("receive failed", err))?;

        if batch.is_empty() {
            std::thread::sleep(Duration::from_millis(1));
            continue;
        }

        let timetag = endpoint.last_timetag();
        for decoded in batch {
            decoded.print(args.format, timetag);
            printed += 1;
            if let Some(count) = args.count {
                if printed >= count {
                    return Ok(SUCCESS);
                }
            }
        }
    }

    Ok(SUCCESS)
}

fn listen_slip(args: &ListenArgs, running: &AtomicBool) -> CliResult<i32> {
    let stdin = std::io::stdin();
    let mut endpoint = SlipEndpoint::new(stdin.lock(), std::io::sink());

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let mut batch = Vec::new();
        match endpoint.receive(|message| batch.push(DecodedMessage::from_view(message))) {
            Ok(()) => {}
            // End of the piped stream is a clean exit.
            Err(EndpointError::Slip(SlipError::ConnectionClosed)) => return Ok(SUCCESS),
            Err(err) => return Err(endpoint_error("receive failed", err)),
        }

        let timetag = endpoint.last_timetag();
        for decoded in batch {
            decoded.print(args.format, timetag);
            printed += 1;
            if let Some(count) = args.count {
                if printed >= count {
                    return Ok(SUCCESS);
                }
            }
        }
    }

    Ok(SUCCESS)
}

#[derive(Debug, Serialize)]
struct DecodedMessage {
    address: String,
    type_tags: String,
    args: Vec<Value>,
    timetag: u64,
}

impl DecodedMessage {
    fn from_view(message: &mut MessageView<'_>) -> Self {
        let address = message.address().to_string();
        let type_tags = message.type_tags().to_string();
        let args = argument_values(message);
        Self {
            address,
            type_tags,
            args,
            timetag: 0,
        }
    }

    fn print(mut self, format: OutputFormat, timetag: u64) {
        self.timetag = timetag;
        match format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string(&self).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Text => {
                let rendered: Vec<String> = self
                    .args
                    .iter()
                    .map(|value| value.to_string())
                    .collect();
                println!(
                    "{} ,{} {}",
                    self.address,
                    self.type_tags,
                    rendered.join(" ")
                );
            }
        }
    }
}

/// Walk the tag string and decode every argument to a JSON value.
///
/// Stops at the first short read, like any other consumer.
fn argument_values(message: &mut MessageView<'_>) -> Vec<Value> {
    let mut values = Vec::new();
    while let Some(tag) = message.peek_type_tag() {
        let value = match tag {
            'i' => message.next_i32().map(Value::from),
            'f' => message.next_f32().map(|v| Value::from(f64::from(v))),
            'd' => message.next_f64().map(Value::from),
            'h' => message.next_i64().map(Value::from),
            's' => message.next_str().map(|s| Value::from(s.to_string())),
            'b' => message.next_blob().map(|data| Value::from(to_hex(data))),
            'm' => message.next_midi().map(|event| Value::from(to_hex(&event))),
            'T' => message.next_marker().map(|_| Value::from(true)),
            'F' => message.next_marker().map(|_| Value::from(false)),
            'N' => message.next_marker().map(|_| Value::Null),
            'I' => message.next_marker().map(|_| Value::from("impulse")),
            _ => None,
        };
        match value {
            Some(value) => values.push(value),
            None => break,
        }
    }
    values
}

fn to_hex(data: &[u8]) -> String {
    data.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

#[cfg(test)]
mod tests {
    use oscwire_codec::{write_message, Arg};
    use oscwire_transport::PacketSink;

    use super::*;

    #[derive(Default)]
    struct OnePacket(Vec<u8>);

    impl PacketSink for OnePacket {
        fn begin_packet(&mut self) -> oscwire_transport::Result<()> {
            self.0.clear();
            Ok(())
        }
        fn write_bytes(&mut self, bytes: &[u8]) -> oscwire_transport::Result<()> {
            self.0.extend_from_slice(bytes);
            Ok(())
        }
        fn end_packet(&mut self) -> oscwire_transport::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn decodes_arguments_to_json_values() {
        let mut sink = OnePacket::default();
        write_message(
            &mut sink,
            "/all",
            &[
                Arg::Int(1),
                Arg::Float(0.5),
                Arg::Str("x"),
                Arg::Blob(&[0xC0]),
                Arg::True,
                Arg::Nil,
                Arg::Impulse,
            ],
        )
        .unwrap();

        let mut view = MessageView::parse(&sink.0).unwrap();
        let values = argument_values(&mut view);
        assert_eq!(
            values,
            vec![
                Value::from(1),
                Value::from(0.5),
                Value::from("x"),
                Value::from("c0"),
                Value::from(true),
                Value::Null,
                Value::from("impulse"),
            ]
        );
    }

    #[test]
    fn hex_rendering_is_lowercase_paired() {
        assert_eq!(to_hex(&[0x00, 0xAB, 0x0F]), "00ab0f");
    }
}
