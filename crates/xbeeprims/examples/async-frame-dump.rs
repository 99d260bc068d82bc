//! Async variant of `frame-dump` built on `FramedRead`.
//!
//!   cargo run --example async-frame-dump --features async < capture.bin

use futures_util::StreamExt;
use tokio_util::codec::FramedRead;
use xbeeprims::api::ApiFrame;
use xbeeprims::frame::ApiFrameCodec;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    let mut frames = FramedRead::new(tokio::io::stdin(), ApiFrameCodec::new());
    while let Some(frame) = frames.next().await {
        let frame = frame?;
        match ApiFrame::from_frame(&frame) {
            Ok(api) => println!("{}", serde_json::to_string(&api)?),
            Err(e) => println!("0x{:02x}: {e}", frame.frame_type()),
        }
    }

    let stats = frames.decoder().stats();
    eprintln!("{} frame(s), {} malformed", stats.frames, stats.malformed);
    Ok(())
}
