use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};
use tracing::debug;

use crate::codec::{total_frame_size, Frame, MAX_BODY_LEN, MIN_FRAME_SIZE, START_DELIMITER};
use crate::error::{FrameError, Result};

/// Bytes requested from the link per read cycle.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 16;

/// Accumulator capacity above which storage is reallocated to fit.
pub const DEFAULT_SHRINK_THRESHOLD: usize = 128;

/// Configuration for the stream framer.
#[derive(Debug, Clone)]
pub struct FramerConfig {
    /// Scratch buffer size for a single link read. Default: 16 bytes.
    pub read_chunk_size: usize,
    /// Accumulator capacity that triggers compaction. Default: 128 bytes.
    pub shrink_threshold: usize,
    /// Largest length field accepted before the delimiter is treated as noise.
    pub max_frame_data: usize,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            shrink_threshold: DEFAULT_SHRINK_THRESHOLD,
            max_frame_data: MAX_BODY_LEN,
        }
    }
}

/// Counters kept while scanning a byte stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FramerStats {
    /// Frames decoded successfully.
    pub frames: u64,
    /// Length-consistent blocks dropped because they failed validation.
    pub malformed: u64,
    /// Bytes discarded while searching for a start delimiter.
    pub discarded_bytes: u64,
}

/// Extract the next valid frame from the front of `src`.
///
/// Returns `None` when `src` holds no complete frame yet; a partial frame is
/// left in place for the next call. Bytes ahead of a start delimiter are
/// dropped one at a time. A length-consistent block that fails validation is
/// consumed, counted and skipped.
pub fn next_frame(
    src: &mut BytesMut,
    max_frame_data: usize,
    stats: &mut FramerStats,
) -> Option<Frame> {
    while src.len() >= MIN_FRAME_SIZE {
        if src[0] != START_DELIMITER {
            src.advance(1);
            stats.discarded_bytes += 1;
            continue;
        }

        let data_len = u16::from_be_bytes([src[1], src[2]]) as usize;
        if data_len > max_frame_data {
            debug!(data_len, max_frame_data, "length field out of range, resyncing");
            src.advance(1);
            stats.discarded_bytes += 1;
            continue;
        }

        let total = total_frame_size(data_len);
        if src.len() < total {
            return None; // Need more data
        }

        let block = src.split_to(total);
        match Frame::deserialize(&block) {
            Ok(frame) => {
                stats.frames += 1;
                return Some(frame);
            }
            Err(err) => {
                stats.malformed += 1;
                debug!(error = %err, len = block.len(), "dropping malformed frame");
            }
        }
    }

    None
}

/// Reads validated frames from any `Read` stream.
///
/// Each call to [`StreamFramer::read_frames`] performs exactly one read, so
/// the latency between bytes arriving and frames being returned stays bounded
/// by the read chunk size. The accumulator is owned here and nowhere else.
pub struct StreamFramer<R> {
    inner: R,
    buf: BytesMut,
    scratch: Vec<u8>,
    config: FramerConfig,
    stats: FramerStats,
}

impl<R: Read> StreamFramer<R> {
    /// Create a new framer with default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, FramerConfig::default())
    }

    /// Create a new framer with explicit configuration.
    pub fn with_config(inner: R, config: FramerConfig) -> Self {
        let chunk = config.read_chunk_size.max(1);
        Self {
            inner,
            buf: BytesMut::with_capacity(chunk * 2),
            scratch: vec![0u8; chunk],
            config,
            stats: FramerStats::default(),
        }
    }

    /// Perform one read and return every frame completed by it (blocking).
    ///
    /// An empty vector is not an error; call again. Returns
    /// `Err(FrameError::LinkClosed)` when the stream reports EOF.
    pub fn read_frames(&mut self) -> Result<Vec<Frame>> {
        let read = loop {
            match self.inner.read(&mut self.scratch) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        };

        if read == 0 {
            return Err(FrameError::LinkClosed);
        }

        self.buf.extend_from_slice(&self.scratch[..read]);
        Ok(self.drain())
    }

    /// Feed bytes obtained elsewhere and return the frames they complete.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Frame> {
        self.buf.extend_from_slice(bytes);
        self.drain()
    }

    fn drain(&mut self) -> Vec<Frame> {
        let max_frame_data = self.config.max_frame_data;
        let mut frames = Vec::new();
        while let Some(frame) = next_frame(&mut self.buf, max_frame_data, &mut self.stats) {
            frames.push(frame);
        }

        if self.buf.capacity() > self.config.shrink_threshold {
            self.buf = BytesMut::from(&self.buf[..]);
        }

        frames
    }

    /// Bytes buffered but not yet part of a complete frame.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Counters accumulated since creation.
    pub fn stats(&self) -> FramerStats {
        self.stats
    }

    /// Current framer configuration.
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the framer and return the inner stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::FrameBuffer;

    fn wire(frame_type: u8, data: &[u8]) -> Vec<u8> {
        Frame::new(FrameBuffer::from_parts(frame_type, data).unwrap())
            .serialize()
            .to_vec()
    }

    fn read_all<R: Read>(framer: &mut StreamFramer<R>) -> Vec<Frame> {
        let mut frames = Vec::new();
        loop {
            match framer.read_frames() {
                Ok(batch) => frames.extend(batch),
                Err(FrameError::LinkClosed) => return frames,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    }

    #[test]
    fn read_single_frame() {
        let bytes = wire(0x88, &[0x01, b'M', b'Y', 0x00, 0x00, 0x00]);
        let mut framer = StreamFramer::new(Cursor::new(bytes));

        let frames = read_all(&mut framer);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].frame_type(), 0x88);
        assert_eq!(frames[0].length(), 7);
    }

    #[test]
    fn resync_past_leading_garbage() {
        let frame = wire(0x8A, &[0x06]);
        for noise_len in [0usize, 1, 5, 16, 17, 200] {
            let mut bytes: Vec<u8> = (0..noise_len).map(|i| (i % 0x7E) as u8).collect();
            bytes.extend_from_slice(&frame);

            let mut framer = StreamFramer::new(Cursor::new(bytes));
            let frames = read_all(&mut framer);

            assert_eq!(frames.len(), 1, "noise_len={noise_len}");
            assert_eq!(frames[0].body().data(), &[0x06]);
            assert_eq!(framer.stats().discarded_bytes, noise_len as u64);
        }
    }

    #[test]
    fn partial_frame_waits_for_rest() {
        let bytes = wire(0x08, b"\x01AP");
        let mut framer = StreamFramer::new(Cursor::new(Vec::new()));

        assert!(framer.push(&bytes[..2]).is_empty());
        assert!(framer.push(&bytes[2..6]).is_empty());
        assert_eq!(framer.buffered(), &bytes[..6]);

        let frames = framer.push(&bytes[6..]);
        assert_eq!(frames.len(), 1);
        assert!(framer.buffered().is_empty());
    }

    #[test]
    fn byte_by_byte_delivery() {
        let bytes = wire(0x08, b"\x01NI");
        let mut framer = StreamFramer::new(ByteByByteReader { bytes, pos: 0 });

        let mut yielded = Vec::new();
        loop {
            match framer.read_frames() {
                Ok(batch) => yielded.push(batch.len()),
                Err(FrameError::LinkClosed) => break,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }

        assert_eq!(yielded.len(), 8);
        assert_eq!(yielded.iter().sum::<usize>(), 1);
        assert_eq!(yielded.last(), Some(&1));
    }

    #[test]
    fn concatenated_frames_in_order() {
        let mut bytes = wire(0x08, b"\x01NI");
        bytes.extend(wire(0x08, b"\x02AP"));

        let mut framer = StreamFramer::new(Cursor::new(Vec::new()));
        let frames = framer.push(&bytes);

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].body().data(), b"\x01NI");
        assert_eq!(frames[1].body().data(), b"\x02AP");
    }

    #[test]
    fn malformed_block_dropped_then_next_frame_decoded() {
        let mut bad = wire(0x08, b"\x01NI");
        let last = bad.len() - 1;
        bad[last] ^= 0x01;
        let mut bytes = bad;
        bytes.extend(wire(0x08, b"\x02AP"));

        let mut framer = StreamFramer::new(Cursor::new(bytes));
        let frames = read_all(&mut framer);

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].body().data(), b"\x02AP");
        assert_eq!(framer.stats().malformed, 1);
        assert_eq!(framer.stats().frames, 1);
    }

    #[test]
    fn oversized_length_treated_as_noise() {
        let mut bytes = vec![0x7E, 0xFF, 0xFF];
        bytes.extend(wire(0x8A, &[0x02]));

        let cfg = FramerConfig {
            max_frame_data: 256,
            ..FramerConfig::default()
        };
        let mut framer = StreamFramer::with_config(Cursor::new(bytes), cfg);
        let frames = read_all(&mut framer);

        assert_eq!(frames.len(), 1);
        assert_eq!(framer.stats().discarded_bytes, 3);
    }

    #[test]
    fn accumulator_shrinks_after_growth() {
        let mut framer = StreamFramer::new(Cursor::new(Vec::new()));
        let mut bytes = vec![0x7E, 0x01, 0x00];
        bytes.extend(std::iter::repeat(0x11).take(250));

        assert!(framer.push(&bytes).is_empty());
        assert_eq!(framer.buffered().len(), bytes.len());

        framer.push(&[0x11; 10]);
        assert_eq!(framer.stats().malformed, 1);
        assert_eq!(framer.buffered(), &[0x11; 3]);
        assert!(framer.buf.capacity() <= DEFAULT_SHRINK_THRESHOLD);
    }

    #[test]
    fn compaction_preserves_partial_frame() {
        let mut noise = vec![0x00; 300];
        let frame = wire(0x8A, &[0x0B]);
        noise.extend_from_slice(&frame[..3]);

        let mut framer = StreamFramer::new(Cursor::new(Vec::new()));
        assert!(framer.push(&noise).is_empty());
        assert!(framer.buffered().ends_with(&frame[..3]));
        assert!(framer.buffered().len() < MIN_FRAME_SIZE);

        let frames = framer.push(&frame[3..]);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn zero_length_read_is_link_closed() {
        let mut framer = StreamFramer::new(Cursor::new(Vec::<u8>::new()));
        assert!(matches!(framer.read_frames(), Err(FrameError::LinkClosed)));
    }

    #[test]
    fn read_error_propagates_as_io() {
        let mut framer = StreamFramer::new(FailingReader(ErrorKind::BrokenPipe));
        let err = framer.read_frames().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn interrupted_read_retries() {
        let bytes = wire(0x8A, &[0x00]);
        let reader = InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(bytes),
        };
        let mut framer = StreamFramer::new(reader);

        let frames = framer.read_frames().unwrap();
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut framer = StreamFramer::new(Cursor::new(Vec::<u8>::new()));
        let _ = framer.get_ref();
        let _ = framer.get_mut();
        assert_eq!(framer.config().read_chunk_size, DEFAULT_READ_CHUNK_SIZE);
        let _inner = framer.into_inner();
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct FailingReader(ErrorKind);

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(self.0))
        }
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }
}
