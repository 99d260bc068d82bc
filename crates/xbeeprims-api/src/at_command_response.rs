use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use xbeeprims_frame::FrameType;

use crate::error::Result;
use crate::frame_data::{
    check_command, invalid, put_payload, read_command, take_payload, FrameData,
};

/// Outcome reported in an AT command response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AtCommandStatus {
    Ok = 0,
    Error = 1,
    InvalidCommand = 2,
    InvalidParam = 3,
    RemoteTransmissionFailed = 4,
}

impl AtCommandStatus {
    /// Look up a wire status code.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Ok,
            1 => Self::Error,
            2 => Self::InvalidCommand,
            3 => Self::InvalidParam,
            4 => Self::RemoteTransmissionFailed,
            _ => return None,
        })
    }

    /// Wire status code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable meaning.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Error => "Error",
            Self::InvalidCommand => "Invalid Command",
            Self::InvalidParam => "Invalid Parameter",
            Self::RemoteTransmissionFailed => "Remote Transmission Failed",
        }
    }

    /// Whether the command succeeded.
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for AtCommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

/// Reply (0x88) to a local AT command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtCommandResponse {
    pub frame_id: u8,
    pub command: String,
    pub status: AtCommandStatus,
    /// Register value for queries; absent otherwise.
    pub params: Option<Bytes>,
}

impl FrameData for AtCommandResponse {
    const FRAME_TYPE: FrameType = FrameType::AtCommandResponse;
    const MIN_LEN: usize = 5;

    fn read_fields(data: &mut Bytes) -> Result<Self> {
        let frame_id = data.get_u8();
        let command = read_command(Self::FRAME_TYPE, data)?;
        let code = data.get_u8();
        let status = AtCommandStatus::from_code(code)
            .ok_or_else(|| invalid(Self::FRAME_TYPE, format!("unknown status code {code}")))?;
        Ok(Self {
            frame_id,
            command,
            status,
            params: take_payload(data),
        })
    }

    fn write_fields(&self, dst: &mut BytesMut) {
        dst.put_u8(self.frame_id);
        dst.put_slice(self.command.as_bytes());
        dst.put_u8(self.status.code());
        put_payload(dst, self.params.as_ref());
    }

    fn validate(&self) -> Result<()> {
        check_command(Self::FRAME_TYPE, &self.command)
    }
}
