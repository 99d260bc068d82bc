/// Errors that can occur while preparing a link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// An I/O error occurred on the underlying channel.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A zero read deadline was requested; use `None` to block indefinitely.
    #[error("read deadline must be greater than zero")]
    ZeroDeadline,
}

pub type Result<T> = std::result::Result<T, LinkError>;
