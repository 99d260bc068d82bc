//! Typed API frames and a threaded session for radio modules in API mode.
//!
//! Frame bodies decode into [`ApiFrame`] variants keyed by their type code.
//! A [`Session`] owns a link, runs the read loop and serializes writes.

pub mod address;
pub mod api_frame;
pub mod at_command;
pub mod at_command_response;
pub mod error;
pub mod explicit;
pub mod frame_data;
pub mod modem_status;
pub mod options;
pub mod session;
pub mod tx_request;

pub use address::{Address16, Address64};
pub use api_frame::ApiFrame;
pub use at_command::{AtCommand, AtCommandQueue};
pub use at_command_response::{AtCommandResponse, AtCommandStatus};
pub use error::{ApiError, Result, SessionError, SessionResult};
pub use explicit::{RxExplicitIndicator, TxExplicitAddressing, DIGI_DATA_ENDPOINT, DIGI_PROFILE_ID};
pub use frame_data::FrameData;
pub use modem_status::{ModemStatus, ModemStatusKind};
pub use options::{is_flag_set, options_from_flags, OptionFlag, RxOptionFlag, TxOptionFlag};
pub use session::{Session, SessionConfig, SessionEvent, PRIMER};
pub use tx_request::TxRequest;
