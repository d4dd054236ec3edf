use std::io::Write;

use oscwire_codec::{write_message, Arg};
use oscwire_endpoint::{OscSender, UdpEndpoint};
use oscwire_slip::SlipWriter;
use tracing::debug;

use crate::cmd::SendArgs;
use crate::exit::{endpoint_error, io_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};

pub fn run(args: SendArgs) -> CliResult<i32> {
    if !args.address.starts_with('/') {
        return Err(CliError::new(
            USAGE,
            format!("address must start with '/': {}", args.address),
        ));
    }

    let owned: Vec<OwnedArg> = args
        .args
        .iter()
        .map(|literal| parse_arg_literal(literal))
        .collect::<CliResult<_>>()?;
    let message_args: Vec<Arg<'_>> = owned.iter().map(OwnedArg::as_arg).collect();

    if args.slip {
        let stdout = std::io::stdout();
        let mut writer = SlipWriter::new(stdout.lock());
        write_message(&mut writer, &args.address, &message_args)
            .map_err(|err| CliError::new(FAILURE, format!("send failed: {err}")))?;
        writer
            .get_mut()
            .flush()
            .map_err(|err| io_error("flush failed", err))?;
        return Ok(SUCCESS);
    }

    let Some(destination) = args.to else {
        return Err(CliError::new(USAGE, "--to is required unless --slip is set"));
    };

    let mut endpoint = UdpEndpoint::bind(args.bind)
        .map_err(|err| endpoint_error("bind failed", err))?;
    endpoint.set_destination(destination);
    debug!(%destination, address = %args.address, "sending message");
    endpoint
        .send(&args.address, &message_args)
        .map_err(|err| endpoint_error("send failed", err))?;

    Ok(SUCCESS)
}

/// Owning counterpart of [`Arg`] so parsed literals outlive the borrow.
#[derive(Debug, PartialEq)]
enum OwnedArg {
    Int(i32),
    Float(f32),
    Double(f64),
    Int64(i64),
    Str(String),
    Blob(Vec<u8>),
    Midi([u8; 4]),
    True,
    False,
    Nil,
    Impulse,
}

impl OwnedArg {
    fn as_arg(&self) -> Arg<'_> {
        match self {
            OwnedArg::Int(value) => Arg::Int(*value),
            OwnedArg::Float(value) => Arg::Float(*value),
            OwnedArg::Double(value) => Arg::Double(*value),
            OwnedArg::Int64(value) => Arg::Int64(*value),
            OwnedArg::Str(text) => Arg::Str(text),
            OwnedArg::Blob(data) => Arg::Blob(data),
            OwnedArg::Midi(event) => Arg::Midi(*event),
            OwnedArg::True => Arg::True,
            OwnedArg::False => Arg::False,
            OwnedArg::Nil => Arg::Nil,
            OwnedArg::Impulse => Arg::Impulse,
        }
    }
}

fn parse_arg_literal(input: &str) -> CliResult<OwnedArg> {
    match input {
        "T" => return Ok(OwnedArg::True),
        "F" => return Ok(OwnedArg::False),
        "N" => return Ok(OwnedArg::Nil),
        "I" => return Ok(OwnedArg::Impulse),
        _ => {}
    }

    let (tag, value) = input
        .split_once(':')
        .ok_or_else(|| CliError::new(USAGE, format!("expected TAG:VALUE, got: {input}")))?;

    match tag {
        "i" => value
            .parse()
            .map(OwnedArg::Int)
            .map_err(|_| invalid(input, "int32")),
        "f" => value
            .parse()
            .map(OwnedArg::Float)
            .map_err(|_| invalid(input, "float32")),
        "d" => value
            .parse()
            .map(OwnedArg::Double)
            .map_err(|_| invalid(input, "double64")),
        "h" => value
            .parse()
            .map(OwnedArg::Int64)
            .map_err(|_| invalid(input, "int64")),
        "s" => Ok(OwnedArg::Str(value.to_string())),
        "b" => decode_hex(value)
            .map(OwnedArg::Blob)
            .ok_or_else(|| invalid(input, "hex blob")),
        "m" => decode_hex(value)
            .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
            .map(OwnedArg::Midi)
            .ok_or_else(|| invalid(input, "4-byte hex midi")),
        other => Err(CliError::new(USAGE, format!("unknown type tag: {other}"))),
    }
}

fn invalid(input: &str, expected: &str) -> CliError {
    CliError::new(USAGE, format!("invalid {expected} literal: {input}"))
}

fn decode_hex(input: &str) -> Option<Vec<u8>> {
    if input.len() % 2 != 0 {
        return None;
    }
    (0..input.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(input.get(i..i + 2)?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_literal_kind() {
        assert_eq!(parse_arg_literal("i:42").unwrap(), OwnedArg::Int(42));
        assert_eq!(parse_arg_literal("f:440.0").unwrap(), OwnedArg::Float(440.0));
        assert_eq!(parse_arg_literal("d:2.5").unwrap(), OwnedArg::Double(2.5));
        assert_eq!(
            parse_arg_literal("h:9000000000").unwrap(),
            OwnedArg::Int64(9_000_000_000)
        );
        assert_eq!(
            parse_arg_literal("s:hello").unwrap(),
            OwnedArg::Str("hello".to_string())
        );
        assert_eq!(
            parse_arg_literal("b:68656c6c6f").unwrap(),
            OwnedArg::Blob(b"hello".to_vec())
        );
        assert_eq!(
            parse_arg_literal("m:00903c64").unwrap(),
            OwnedArg::Midi([0x00, 0x90, 0x3C, 0x64])
        );
        assert_eq!(parse_arg_literal("T").unwrap(), OwnedArg::True);
        assert_eq!(parse_arg_literal("F").unwrap(), OwnedArg::False);
        assert_eq!(parse_arg_literal("N").unwrap(), OwnedArg::Nil);
        assert_eq!(parse_arg_literal("I").unwrap(), OwnedArg::Impulse);
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(parse_arg_literal("42").is_err());
        assert!(parse_arg_literal("i:notanint").is_err());
        assert!(parse_arg_literal("x:1").is_err());
        assert!(parse_arg_literal("b:abc").is_err()); // odd hex length
        assert!(parse_arg_literal("m:0090").is_err()); // midi needs 4 bytes
    }

    #[test]
    fn decode_hex_roundtrip() {
        assert_eq!(decode_hex("c0db00ff"), Some(vec![0xC0, 0xDB, 0x00, 0xFF]));
        assert_eq!(decode_hex(""), Some(Vec::new()));
        assert_eq!(decode_hex("zz"), None);
    }
}
