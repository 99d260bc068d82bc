//! Decode a captured byte stream and print each frame as JSON.
//!
//! Reads raw API-mode bytes from a file (or stdin), resynchronizing over
//! noise the same way a live session does:
//!   cargo run --example frame-dump -- capture.bin

use std::fs::File;
use std::io::{self, Read};

use xbeeprims::api::ApiFrame;
use xbeeprims::frame::{FrameError, StreamFramer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();

    let input: Box<dyn Read> = match std::env::args().nth(1) {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };

    let mut framer = StreamFramer::new(input);
    loop {
        let frames = match framer.read_frames() {
            Ok(frames) => frames,
            Err(FrameError::LinkClosed) => break,
            Err(e) => return Err(e.into()),
        };

        for frame in frames {
            let line = match ApiFrame::from_frame(&frame) {
                Ok(api) => serde_json::to_string(&api)?,
                Err(e) => serde_json::json!({
                    "type": format!("0x{:02x}", frame.frame_type()),
                    "len": frame.length(),
                    "error": e.to_string(),
                })
                .to_string(),
            };
            println!("{line}");
        }
    }

    let stats = framer.stats();
    eprintln!(
        "{} frame(s), {} malformed, {} byte(s) of noise",
        stats.frames, stats.malformed, stats.discarded_bytes
    );
    Ok(())
}
