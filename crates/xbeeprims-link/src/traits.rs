use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use tracing::debug;

use crate::error::{LinkError, Result};

/// A connected duplex byte channel to a radio module.
///
/// The link itself is the write half. [`Link::reader_half`] hands out an
/// independently owned read half so that exactly one execution context can
/// block in `read` while others write.
pub trait Link: Read + Write + Send + 'static {
    /// Owned read half handed to the read loop.
    type Reader: Read + Send + 'static;

    /// Split off an owned read half sharing the same underlying channel.
    fn reader_half(&self) -> Result<Self::Reader>;

    /// Bound how long a single read may block. `None` blocks indefinitely.
    ///
    /// A read that hits the deadline fails with `WouldBlock` or `TimedOut`
    /// (see [`is_read_timeout`]).
    fn set_read_deadline(&self, timeout: Option<Duration>) -> Result<()>;
}

/// Returns true if the error is a read deadline expiring rather than a fault.
pub fn is_read_timeout(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

fn check_deadline(timeout: Option<Duration>) -> Result<()> {
    if timeout == Some(Duration::ZERO) {
        return Err(LinkError::ZeroDeadline);
    }
    Ok(())
}

#[cfg(unix)]
impl Link for std::os::unix::net::UnixStream {
    type Reader = std::os::unix::net::UnixStream;

    fn reader_half(&self) -> Result<Self::Reader> {
        let reader = self.try_clone()?;
        debug!("split unix stream link");
        Ok(reader)
    }

    fn set_read_deadline(&self, timeout: Option<Duration>) -> Result<()> {
        check_deadline(timeout)?;
        self.set_read_timeout(timeout).map_err(Into::into)
    }
}

impl Link for TcpStream {
    type Reader = TcpStream;

    fn reader_half(&self) -> Result<Self::Reader> {
        let reader = self.try_clone()?;
        debug!(peer = ?self.peer_addr().ok(), "split tcp link");
        Ok(reader)
    }

    fn set_read_deadline(&self, timeout: Option<Duration>) -> Result<()> {
        check_deadline(timeout)?;
        self.set_read_timeout(timeout).map_err(Into::into)
    }
}
