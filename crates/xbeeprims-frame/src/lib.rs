//! API-mode frame codec for radio modules.
//!
//! Every frame on the wire is:
//! - a start delimiter byte (`0x7E`)
//! - a 2-byte big-endian length of the frame body
//! - the body: one frame-type byte followed by the type-specific payload
//! - a checksum byte, `0xFF` minus the low byte of the body sum
//!
//! [`StreamFramer`] turns arbitrarily chunked reads into validated frames,
//! resynchronizing on the start delimiter after noise or corruption.

pub mod codec;
pub mod error;
pub mod frame_type;
pub mod framer;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

#[cfg(feature = "async")]
pub use async_codec::ApiFrameCodec;
pub use codec::{
    checksum, total_frame_size, Frame, FrameBuffer, HEADER_SIZE, MAX_BODY_LEN, MIN_FRAME_SIZE,
    START_DELIMITER,
};
pub use error::{FrameError, Result};
pub use frame_type::FrameType;
pub use framer::{next_frame, FramerConfig, FramerStats, StreamFramer};
pub use writer::FrameWriter;
