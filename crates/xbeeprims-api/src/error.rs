use xbeeprims_frame::{FrameError, FrameType};
use xbeeprims_link::LinkError;

/// Errors that can occur while decoding or encoding typed frames.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// No typed variant exists for this frame-type code.
    #[error("unsupported frame type 0x{0:02x}")]
    UnsupportedFrameType(u8),

    /// A variant decoder was handed a body of another type.
    #[error("expected {expected}, found frame type 0x{found:02x}")]
    WrongFrameType { expected: FrameType, found: u8 },

    /// The body is shorter than the variant's fixed fields.
    #[error("{kind} frame data too small ({len} bytes, min {min})")]
    TooSmall {
        kind: FrameType,
        len: usize,
        min: usize,
    },

    /// The fields violate the variant's validity rule.
    #[error("invalid payload for {kind}: {reason}")]
    InvalidPayload { kind: FrameType, reason: String },

    /// Textual address is not valid hex of the right width.
    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `start` was called while the read loop is running.
    #[error("session already running")]
    AlreadyRunning,

    /// `stop` was requested but the read loop has not exited yet.
    #[error("read loop is still stopping")]
    StopPending,

    /// The read loop panicked or could not be spawned; its reader is gone.
    #[error("read loop lost")]
    LoopLost,

    /// The read loop thread could not be spawned.
    #[error("failed to spawn read loop: {0}")]
    Spawn(std::io::Error),

    /// A send stopped part-way; `sent` frames were fully written.
    #[error("sent {sent} frame(s) before failure: {source}")]
    PartialSend { sent: usize, source: ApiError },

    /// Link preparation error.
    #[error("link error: {0}")]
    Link(#[from] LinkError),

    /// Frame-level error on the write path.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
