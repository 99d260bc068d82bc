//! API-mode framing for XBee-style radio modules.
//!
//! xbeeprims turns the byte stream of a module in API mode into checksummed
//! frames, decodes the common frame types into typed records, and runs a
//! background read loop over a serial-like link.
//!
//! # Crate Structure
//!
//! - [`link`]: Duplex link abstraction over blocking streams
//! - [`frame`]: Single-frame codec and the resynchronizing stream framer
//! - [`api`]: Typed frame variants and the threaded session (behind `api` feature)

/// Re-export link types.
pub mod link {
    pub use xbeeprims_link::*;
}

/// Re-export frame types.
pub mod frame {
    pub use xbeeprims_frame::*;
}

/// Re-export typed frames and the session (requires `api` feature).
#[cfg(feature = "api")]
pub mod api {
    pub use xbeeprims_api::*;
}
