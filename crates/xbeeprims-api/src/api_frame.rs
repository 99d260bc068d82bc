use serde::{Deserialize, Serialize};
use xbeeprims_frame::{Frame, FrameBuffer, FrameType};

use crate::at_command::{AtCommand, AtCommandQueue};
use crate::at_command_response::AtCommandResponse;
use crate::error::{ApiError, Result};
use crate::explicit::{RxExplicitIndicator, TxExplicitAddressing};
use crate::frame_data::FrameData;
use crate::modem_status::ModemStatus;
use crate::tx_request::TxRequest;

/// Every frame payload with a typed decoder, keyed by frame-type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiFrame {
    AtCommand(AtCommand),
    AtCommandQueue(AtCommandQueue),
    AtCommandResponse(AtCommandResponse),
    ModemStatus(ModemStatus),
    TxRequest(TxRequest),
    TxExplicitAddressing(TxExplicitAddressing),
    RxExplicitIndicator(RxExplicitIndicator),
}

impl ApiFrame {
    /// Decode a body by its frame-type code.
    ///
    /// Codes without a typed variant fail with
    /// [`ApiError::UnsupportedFrameType`]; the raw body is still available
    /// to the caller.
    pub fn decode(body: &FrameBuffer) -> Result<Self> {
        let code = body.frame_type();
        let Some(kind) = FrameType::from_code(code) else {
            return Err(ApiError::UnsupportedFrameType(code));
        };

        match kind {
            FrameType::AtCommand => AtCommand::decode(body).map(Self::AtCommand),
            FrameType::AtCommandQueue => AtCommandQueue::decode(body).map(Self::AtCommandQueue),
            FrameType::AtCommandResponse => {
                AtCommandResponse::decode(body).map(Self::AtCommandResponse)
            }
            FrameType::ModemStatus => ModemStatus::decode(body).map(Self::ModemStatus),
            FrameType::TxRequest => TxRequest::decode(body).map(Self::TxRequest),
            FrameType::TxExplicitAddressing => {
                TxExplicitAddressing::decode(body).map(Self::TxExplicitAddressing)
            }
            FrameType::RxExplicitIndicator => {
                RxExplicitIndicator::decode(body).map(Self::RxExplicitIndicator)
            }
            _ => Err(ApiError::UnsupportedFrameType(code)),
        }
    }

    /// Decode the body of a wire frame.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Self::decode(frame.body())
    }

    pub fn frame_type(&self) -> FrameType {
        match self {
            Self::AtCommand(_) => AtCommand::FRAME_TYPE,
            Self::AtCommandQueue(_) => AtCommandQueue::FRAME_TYPE,
            Self::AtCommandResponse(_) => AtCommandResponse::FRAME_TYPE,
            Self::ModemStatus(_) => ModemStatus::FRAME_TYPE,
            Self::TxRequest(_) => TxRequest::FRAME_TYPE,
            Self::TxExplicitAddressing(_) => TxExplicitAddressing::FRAME_TYPE,
            Self::RxExplicitIndicator(_) => RxExplicitIndicator::FRAME_TYPE,
        }
    }

    /// Encode into a frame body, refusing invalid values.
    pub fn encode(&self) -> Result<FrameBuffer> {
        match self {
            Self::AtCommand(f) => f.encode(),
            Self::AtCommandQueue(f) => f.encode(),
            Self::AtCommandResponse(f) => f.encode(),
            Self::ModemStatus(f) => f.encode(),
            Self::TxRequest(f) => f.encode(),
            Self::TxExplicitAddressing(f) => f.encode(),
            Self::RxExplicitIndicator(f) => f.encode(),
        }
    }

    /// Encode into a complete wire frame.
    pub fn to_frame(&self) -> Result<Frame> {
        self.encode().map(Frame::new)
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Self::AtCommand(f) => f.is_valid(),
            Self::AtCommandQueue(f) => f.is_valid(),
            Self::AtCommandResponse(f) => f.is_valid(),
            Self::ModemStatus(f) => f.is_valid(),
            Self::TxRequest(f) => f.is_valid(),
            Self::TxExplicitAddressing(f) => f.is_valid(),
            Self::RxExplicitIndicator(f) => f.is_valid(),
        }
    }
}

impl TryFrom<&Frame> for ApiFrame {
    type Error = ApiError;

    fn try_from(frame: &Frame) -> Result<Self> {
        Self::from_frame(frame)
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ApiFrame {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    AtCommand,
    AtCommandQueue,
    AtCommandResponse,
    ModemStatus,
    TxRequest,
    TxExplicitAddressing,
    RxExplicitIndicator,
);
