//! Threaded session over a duplex link.
//!
//! A started session owns one background thread that is the only reader of
//! the link. Decoded frames and read failures are handed to the session's
//! handler in arrival order, on that thread. Writes go through a separate
//! lock so concurrent senders never interleave bytes on the wire.

use std::io::{Read, Write};
use std::mem;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};
use xbeeprims_frame::{Frame, FrameError, FrameWriter, FramerConfig, StreamFramer};
use xbeeprims_link::{is_read_timeout, Link};

use crate::api_frame::ApiFrame;
use crate::error::{ApiError, SessionError, SessionResult};

/// Local `AP` query written to wake the module's API parser.
pub const PRIMER: [u8; 8] = [0x7E, 0x00, 0x04, 0x08, 0x01, 0x41, 0x50, 0x65];

/// Default pause after a failed read before retrying.
pub const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_millis(200);

/// Default read deadline applied by [`Session::from_link`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Session tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub framer: FramerConfig,
    /// Pause after a read error. A stop request cuts it short.
    pub error_backoff: Duration,
    /// Link read deadline. Bounds how long a stop request can go unseen
    /// while the loop is blocked in a read. `None` leaves the link as is.
    pub poll_interval: Option<Duration>,
    /// Write [`PRIMER`] when starting and when stopping.
    pub prime_link: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            framer: FramerConfig::default(),
            error_backoff: DEFAULT_ERROR_BACKOFF,
            poll_interval: Some(DEFAULT_POLL_INTERVAL),
            prime_link: false,
        }
    }
}

/// What the read loop reports to the handler.
#[derive(Debug)]
pub enum SessionEvent {
    /// A complete, checksum-valid frame.
    Frame(Frame),
    /// A read failed. The loop backs off and retries.
    ReadError(FrameError),
    /// The link reached end of stream. The loop has exited.
    Closed,
}

type Handler = Box<dyn FnMut(SessionEvent) + Send + 'static>;

/// Everything the read loop owns while it runs.
struct LoopParts<R> {
    framer: StreamFramer<R>,
    handler: Handler,
}

enum LoopState<R> {
    Idle(LoopParts<R>),
    Running {
        stop_tx: Sender<()>,
        handle: LoopHandle<R>,
    },
    Stopping(LoopHandle<R>),
    Lost,
}

struct LoopHandle<R> {
    done: Arc<Done>,
    thread: JoinHandle<LoopParts<R>>,
}

/// Set when the loop thread exits, including by panic.
#[derive(Default)]
struct Done {
    finished: Mutex<bool>,
    cv: Condvar,
}

impl Done {
    fn wait(&self, timeout: Duration) -> bool {
        let finished = lock(&self.finished);
        let (finished, _) = self
            .cv
            .wait_timeout_while(finished, timeout, |finished| !*finished)
            .unwrap_or_else(PoisonError::into_inner);
        *finished
    }

    fn is_set(&self) -> bool {
        *lock(&self.finished)
    }
}

struct DoneGuard(Arc<Done>);

impl Drop for DoneGuard {
    fn drop(&mut self) {
        *lock(&self.0.finished) = true;
        self.0.cv.notify_all();
    }
}

/// A duplex link with a background frame reader.
///
/// `R` is the read half, owned by the loop thread while running. `W` is the
/// write half, shared by all senders.
pub struct Session<R, W> {
    state: Mutex<LoopState<R>>,
    writer: Mutex<FrameWriter<W>>,
    config: SessionConfig,
}

impl<L: Link> Session<L::Reader, L> {
    /// Build a session over a link.
    ///
    /// The configured poll interval is installed as the link's read
    /// deadline before the read half is split off.
    pub fn from_link<F>(link: L, handler: F, config: SessionConfig) -> SessionResult<Self>
    where
        F: FnMut(SessionEvent) + Send + 'static,
    {
        link.set_read_deadline(config.poll_interval)?;
        let reader = link.reader_half()?;
        Ok(Self::from_parts(reader, link, handler, config))
    }
}

impl<R, W> Session<R, W>
where
    R: Read + Send + 'static,
    W: Write + Send,
{
    /// Build a session from separate read and write halves.
    ///
    /// Read timeouts on `reader` (`WouldBlock`/`TimedOut`) are treated as
    /// idle ticks, not errors.
    pub fn from_parts<F>(reader: R, writer: W, handler: F, config: SessionConfig) -> Self
    where
        F: FnMut(SessionEvent) + Send + 'static,
    {
        let parts = LoopParts {
            framer: StreamFramer::with_config(reader, config.framer.clone()),
            handler: Box::new(handler),
        };
        Self {
            state: Mutex::new(LoopState::Idle(parts)),
            writer: Mutex::new(FrameWriter::new(writer)),
            config,
        }
    }

    /// Launch the read loop.
    ///
    /// Fails with `AlreadyRunning` if it is running and `StopPending` if a
    /// stopped loop has not exited yet.
    pub fn start(&self) -> SessionResult<()> {
        let mut state = lock(&self.state);
        reap(&mut *state);

        let parts = match mem::replace(&mut *state, LoopState::Lost) {
            LoopState::Idle(parts) => parts,
            other => {
                let err = match other {
                    LoopState::Running { .. } => SessionError::AlreadyRunning,
                    LoopState::Stopping(_) => SessionError::StopPending,
                    _ => SessionError::LoopLost,
                };
                *state = other;
                return Err(err);
            }
        };

        if self.config.prime_link {
            if let Err(err) = self.prime() {
                *state = LoopState::Idle(parts);
                return Err(err);
            }
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let done = Arc::new(Done::default());
        let guard = DoneGuard(Arc::clone(&done));
        let backoff = self.config.error_backoff;

        let thread = thread::Builder::new()
            .name("xbee-session".into())
            .spawn(move || {
                let _guard = guard;
                read_loop(parts, &stop_rx, backoff)
            })
            .map_err(SessionError::Spawn)?;

        *state = LoopState::Running {
            stop_tx,
            handle: LoopHandle { done, thread },
        };
        info!("session started");
        Ok(())
    }

    /// Ask the read loop to exit.
    ///
    /// The loop sees the request at its next iteration boundary: after the
    /// current read returns, times out, or during error backoff. Use
    /// [`Session::wait_stopped`] to wait for it. Stopping an idle session
    /// is a no-op.
    pub fn stop(&self) -> SessionResult<()> {
        let mut state = lock(&self.state);
        reap(&mut *state);

        match mem::replace(&mut *state, LoopState::Lost) {
            LoopState::Running { stop_tx, handle } => {
                let _ = stop_tx.send(());
                *state = LoopState::Stopping(handle);
                info!("session stop requested");
                if self.config.prime_link {
                    self.prime()?;
                }
                Ok(())
            }
            other => {
                *state = other;
                Ok(())
            }
        }
    }

    /// Whether the read loop is running and has not been asked to stop.
    pub fn is_running(&self) -> bool {
        let mut state = lock(&self.state);
        reap(&mut *state);
        matches!(*state, LoopState::Running { .. })
    }

    /// Wait up to `timeout` for the read loop thread to exit.
    ///
    /// Returns `true` once no loop thread is alive.
    pub fn wait_stopped(&self, timeout: Duration) -> bool {
        let done = match &*lock(&self.state) {
            LoopState::Running { handle, .. } | LoopState::Stopping(handle) => {
                Arc::clone(&handle.done)
            }
            LoopState::Idle(_) | LoopState::Lost => return true,
        };

        if !done.wait(timeout) {
            return false;
        }
        let mut state = lock(&self.state);
        reap(&mut *state);
        true
    }

    /// Encode and write typed frames back to back.
    ///
    /// Every frame is encoded before anything is written, so an invalid
    /// frame sends nothing. Returns the number of frames written.
    pub fn send_frames(&self, frames: &[ApiFrame]) -> SessionResult<usize> {
        let mut encoded = Vec::with_capacity(frames.len());
        for frame in frames {
            let frame = frame
                .to_frame()
                .map_err(|source| SessionError::PartialSend { sent: 0, source })?;
            encoded.push(frame);
        }
        self.send_raw_frames(&encoded)
    }

    /// Write already-built frames back to back.
    ///
    /// No other send can interleave with the batch. On failure the error
    /// carries how many frames were fully written.
    pub fn send_raw_frames(&self, frames: &[Frame]) -> SessionResult<usize> {
        let mut writer = lock(&self.writer);
        for (sent, frame) in frames.iter().enumerate() {
            writer
                .write_frame(frame)
                .map_err(|err| SessionError::PartialSend {
                    sent,
                    source: ApiError::Frame(err),
                })?;
        }
        Ok(frames.len())
    }

    /// Tuning this session was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn prime(&self) -> SessionResult<()> {
        lock(&self.writer).write_raw(&PRIMER)?;
        debug!("wrote link primer");
        Ok(())
    }
}

fn read_loop<R: Read>(
    mut parts: LoopParts<R>,
    stop_rx: &Receiver<()>,
    backoff: Duration,
) -> LoopParts<R> {
    loop {
        match stop_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        match parts.framer.read_frames() {
            Ok(frames) => {
                for frame in frames {
                    (parts.handler)(SessionEvent::Frame(frame));
                }
            }
            Err(FrameError::Io(err)) if is_read_timeout(&err) => {}
            Err(FrameError::LinkClosed) => {
                info!("link closed, read loop exiting");
                (parts.handler)(SessionEvent::Closed);
                break;
            }
            Err(err) => {
                warn!(error = %err, "link read failed");
                (parts.handler)(SessionEvent::ReadError(err));
                match stop_rx.recv_timeout(backoff) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }
    }

    let stats = parts.framer.stats();
    debug!(
        frames = stats.frames,
        malformed = stats.malformed,
        discarded_bytes = stats.discarded_bytes,
        "read loop stopped"
    );
    parts
}

/// Collect a finished loop thread, returning its parts to `Idle`.
///
/// `Done` is set just before the thread returns, so joining once it is set
/// blocks at most for the thread's exit.
fn reap<R>(state: &mut LoopState<R>) {
    let finished = match state {
        LoopState::Running { handle, .. } | LoopState::Stopping(handle) => {
            handle.done.is_set() || handle.thread.is_finished()
        }
        LoopState::Idle(_) | LoopState::Lost => false,
    };
    if !finished {
        return;
    }

    let handle = match mem::replace(state, LoopState::Lost) {
        LoopState::Running { handle, .. } | LoopState::Stopping(handle) => handle,
        other => {
            *state = other;
            return;
        }
    };
    match handle.thread.join() {
        Ok(parts) => *state = LoopState::Idle(parts),
        Err(_) => warn!("read loop panicked; session cannot be restarted"),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
