//! `tokio_util::codec` adapter for API-mode frames.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::codec::{Frame, MAX_BODY_LEN};
use crate::error::FrameError;
use crate::framer::{next_frame, FramerStats};

/// Frame codec for `FramedRead`/`FramedWrite` with the same resync rules as
/// [`crate::StreamFramer`].
#[derive(Debug, Clone)]
pub struct ApiFrameCodec {
    max_frame_data: usize,
    stats: FramerStats,
}

impl ApiFrameCodec {
    /// Create a codec accepting any length the length field can express.
    pub fn new() -> Self {
        Self::with_max_frame_data(MAX_BODY_LEN)
    }

    /// Create a codec that treats larger length fields as noise.
    pub fn with_max_frame_data(max_frame_data: usize) -> Self {
        Self {
            max_frame_data,
            stats: FramerStats::default(),
        }
    }

    /// Counters accumulated since creation.
    pub fn stats(&self) -> FramerStats {
        self.stats
    }
}

impl Default for ApiFrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ApiFrameCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        Ok(next_frame(src, self.max_frame_data, &mut self.stats))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if !src.is_empty() {
            debug!(len = src.len(), "discarding incomplete frame at end of stream");
            src.clear();
        }
        Ok(None)
    }
}

impl Encoder<Frame> for ApiFrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        item.encode(dst);
        Ok(())
    }
}

impl Encoder<&Frame> for ApiFrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        item.encode(dst);
        Ok(())
    }
}
