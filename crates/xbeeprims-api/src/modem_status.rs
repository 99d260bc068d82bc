use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use xbeeprims_frame::FrameType;

use crate::error::Result;
use crate::frame_data::{invalid, FrameData};

/// Known modem status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModemStatusKind {
    HardwareReset = 0x00,
    WatchdogTimerReset = 0x01,
    Joined = 0x02,
    Disassociated = 0x03,
    CoordinatorStarted = 0x06,
    NetworkKeyUpdated = 0x07,
    WokeUp = 0x0B,
    Sleeping = 0x0C,
    Overvoltage = 0x0D,
    KeyEstablished = 0x10,
    ConfigChangeInJoin = 0x11,
    StackError = 0x80,
}

impl ModemStatusKind {
    /// Highest defined status code.
    pub const MAX_CODE: u8 = 0x80;

    /// Look up a named status code.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x00 => Self::HardwareReset,
            0x01 => Self::WatchdogTimerReset,
            0x02 => Self::Joined,
            0x03 => Self::Disassociated,
            0x06 => Self::CoordinatorStarted,
            0x07 => Self::NetworkKeyUpdated,
            0x0B => Self::WokeUp,
            0x0C => Self::Sleeping,
            0x0D => Self::Overvoltage,
            0x10 => Self::KeyEstablished,
            0x11 => Self::ConfigChangeInJoin,
            0x80 => Self::StackError,
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
            Self::HardwareReset => "Hardware Reset",
            Self::WatchdogTimerReset => "Watchdog Timer Reset",
            Self::Joined => "Joined Network",
            Self::Disassociated => "Disassociated from Network",
            Self::CoordinatorStarted => "Coordinator Started",
            Self::NetworkKeyUpdated => "Network Security Key Updated",
            Self::WokeUp => "Network Woke Up",
            Self::Sleeping => "Network Went to Sleep",
            Self::Overvoltage => "Voltage Supply Limit Exceeded",
            Self::KeyEstablished => "Key Establishment Completed",
            Self::ConfigChangeInJoin => "Modem Config Changed While Join in Progress",
            Self::StackError => "Network Stack Error",
        }
    }
}

/// Unsolicited module state notification (0x8A).
///
/// The status byte is kept raw: codes between the named ones are
/// reserved but still valid on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModemStatus {
    pub status: u8,
}

impl ModemStatus {
    /// Wrap a raw status code.
    pub fn new(status: u8) -> Self {
        Self { status }
    }

    /// The named status, if this code has one.
    pub fn kind(&self) -> Option<ModemStatusKind> {
        ModemStatusKind::from_code(self.status)
    }

    /// Meaning of the code, or the raw code when it has no name.
    pub fn description(&self) -> String {
        match self.kind() {
            Some(kind) => kind.description().to_string(),
            None => format!("Unknown Modem Status 0x{:02x}", self.status),
        }
    }
}

impl From<ModemStatusKind> for ModemStatus {
    fn from(kind: ModemStatusKind) -> Self {
        Self::new(kind.code())
    }
}

impl fmt::Display for ModemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl FrameData for ModemStatus {
    const FRAME_TYPE: FrameType = FrameType::ModemStatus;
    const MIN_LEN: usize = 2;

    fn read_fields(data: &mut Bytes) -> Result<Self> {
        if data.remaining() != 1 {
            return Err(invalid(
                Self::FRAME_TYPE,
                format!("expected one status byte, got {}", data.remaining()),
            ));
        }
        Ok(Self::new(data.get_u8()))
    }

    fn write_fields(&self, dst: &mut BytesMut) {
        dst.put_u8(self.status);
    }

    fn validate(&self) -> Result<()> {
        if self.status > ModemStatusKind::MAX_CODE {
            return Err(invalid(
                Self::FRAME_TYPE,
                format!("status 0x{:02x} above highest known code", self.status),
            ));
        }
        Ok(())
    }
}
