//! Duplex byte link abstraction.
//!
//! A radio module in API mode is reached over a byte-oriented duplex channel,
//! usually a serial port. This crate does not open or configure that channel;
//! it defines the [`Link`] trait the rest of xbeeprims builds on:
//! - an owned read half for the single read loop
//! - the write half, kept by the owner of the link
//! - an optional read deadline so a blocked read can be interrupted
//!
//! Implementations are provided for Unix domain sockets and TCP streams
//! (serial-over-network bridges, loopback tests).

pub mod error;
pub mod traits;

pub use error::{LinkError, Result};
pub use traits::{is_read_timeout, Link};
