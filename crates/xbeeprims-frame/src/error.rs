/// Errors that can occur during frame encoding/decoding and link reads.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Fewer bytes than the smallest possible frame.
    #[error("frame too short ({len} bytes, min {min})")]
    FrameTooShort { len: usize, min: usize },

    /// The first byte is not the start delimiter.
    #[error("invalid start delimiter 0x{0:02x} (expected 0x7e)")]
    InvalidStartDelimiter(u8),

    /// The trailing checksum byte does not match the frame body.
    #[error("invalid checksum (expected 0x{expected:02x}, found 0x{found:02x})")]
    ChecksumInvalid { expected: u8, found: u8 },

    /// The length field disagrees with the number of body bytes present.
    #[error("length field {declared} does not match body length {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// A frame body must hold at least the frame-type byte.
    #[error("frame body is empty (frame-type byte missing)")]
    EmptyBody,

    /// The body does not fit the 16-bit length field.
    #[error("frame body too large ({size} bytes, max {max})")]
    BodyTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing the link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link reported end of stream.
    #[error("link closed")]
    LinkClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
