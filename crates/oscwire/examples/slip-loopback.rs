//! Encode a few messages over an in-memory SLIP "wire" and decode them
//! back, printing what arrives. Run with:
//!
//! ```sh
//! cargo run --example slip-loopback
//! ```

use std::io::Cursor;

use oscwire::codec::Arg;
use oscwire::endpoint::{OscSender, SlipEndpoint};

fn main() {
    // Sender half: frames go into a plain Vec<u8>.
    let mut sender = SlipEndpoint::new(Cursor::new(Vec::new()), Vec::new());
    sender.send_float("/synth/1/freq", 440.0).unwrap();
    sender.send_string("/synth/1/label", "lead").unwrap();
    sender
        .send("/synth/1/adsr", &[Arg::Float(0.01), Arg::Float(0.2), Arg::Float(0.7), Arg::Float(1.5)])
        .unwrap();
    let (_, wire) = sender.into_inner();

    // Receiver half: the same bytes come back in.
    let mut receiver = SlipEndpoint::new(Cursor::new(wire), Vec::new());
    for _ in 0..3 {
        receiver
            .receive(|message| {
                print!("{} ,{}", message.address(), message.type_tags());
                while let Some(tag) = message.peek_type_tag() {
                    match tag {
                        'f' => print!(" {}", message.next_f32().unwrap()),
                        's' => print!(" {:?}", message.next_str().unwrap()),
                        _ => break,
                    }
                }
                println!();
            })
            .unwrap();
    }
}
