//! Query a module's AT registers over a TCP serial bridge.
//!
//! Expose the module's serial port on TCP (e.g. with ser2net), then run:
//!   cargo run --example at-query -- 127.0.0.1:9750 NI MY SH SL

use std::net::TcpStream;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use xbeeprims::api::{ApiFrame, AtCommand, Session, SessionConfig, SessionEvent};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .try_init();

    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:9750".to_string());
    let mut commands: Vec<String> = args.collect();
    if commands.is_empty() {
        commands = vec!["NI".into(), "MY".into(), "AP".into()];
    }

    let link = TcpStream::connect(&addr)?;
    eprintln!("Connected to {addr}");

    let (tx, rx) = mpsc::channel();
    let config = SessionConfig {
        prime_link: true,
        ..SessionConfig::default()
    };
    let handler = move |event: SessionEvent| {
        let _ = tx.send(event);
    };
    let session = Session::from_link(link, handler, config)?;
    session.start()?;

    let frames: Vec<ApiFrame> = commands
        .iter()
        .zip(1u8..)
        .map(|(command, frame_id)| AtCommand::new(frame_id, command.as_str()).into())
        .collect();
    let sent = session.send_frames(&frames)?;
    eprintln!("Sent {sent} command(s)");

    let deadline = Instant::now() + Duration::from_secs(3);
    let mut answered = 0;
    while answered < sent {
        let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
            break;
        };
        match rx.recv_timeout(remaining) {
            Ok(SessionEvent::Frame(frame)) => match ApiFrame::from_frame(&frame) {
                Ok(ApiFrame::AtCommandResponse(response)) => {
                    answered += 1;
                    let value = response.params.as_deref().map(hex::encode).unwrap_or_default();
                    println!("{} [{}] {}", response.command, response.status, value);
                }
                Ok(other) => eprintln!("Other frame: {other:?}"),
                Err(e) => eprintln!("Undecoded frame 0x{:02x}: {e}", frame.frame_type()),
            },
            Ok(SessionEvent::ReadError(e)) => eprintln!("Read error: {e}"),
            Ok(SessionEvent::Closed) => {
                eprintln!("Link closed");
                break;
            }
            Err(_) => break,
        }
    }

    session.stop()?;
    session.wait_stopped(Duration::from_secs(1));
    Ok(())
}
