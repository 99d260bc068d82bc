//! Frame-type codes.
//!
//! The first byte of every frame body selects how the rest of the body is
//! laid out. One table serves both the codec and the typed-frame layer.

use std::fmt;

/// API frame-type code carried in the first body byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    TxRequest64 = 0x00,
    TxRequest16 = 0x01,
    AtCommand = 0x08,
    AtCommandQueue = 0x09,
    TxRequest = 0x10,
    TxExplicitAddressing = 0x11,
    RemoteAtCommand = 0x17,
    TxSms = 0x1F,
    TxIpv4 = 0x20,
    SendIpDataRequest = 0x28,
    DeviceResponse = 0x2A,
    RxPacket64 = 0x80,
    RxPacket16 = 0x81,
    RxPacketIo64 = 0x82,
    RxPacketIo16 = 0x83,
    WifiRemoteAtCommandResponse = 0x87,
    AtCommandResponse = 0x88,
    TxStatus = 0x89,
    ModemStatus = 0x8A,
    ExtendedTxStatus = 0x8B,
    RouteInfoPacket = 0x8D,
    AggregateAddressingUpdate = 0x8E,
    WifiIoDataSampleRxIndicator = 0x8F,
    RxPacket = 0x90,
    RxExplicitIndicator = 0x91,
    IoDataSampleRxIndicator = 0x92,
    SensorReadIndicator = 0x94,
    NodeIdentificationIndicator = 0x95,
    RemoteAtCommandResponse = 0x97,
    ExtendedModemStatus = 0x98,
    RxSms = 0x9F,
    OtaFirmwareUpdateStatus = 0xA0,
    RouteRecordIndicator = 0xA1,
    ManyToOneRouteRequestIndicator = 0xA3,
    JoinNotificationStatus = 0xA5,
    RxIpv4 = 0xB0,
    SendIpDataResponse = 0xB8,
    DeviceRequest = 0xB9,
    DeviceResponseStatus = 0xBA,
    FrameErrorIndicator = 0xFE,
}

impl FrameType {
    /// Look up a frame type by its wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        use FrameType::*;
        let kind = match code {
            0x00 => TxRequest64,
            0x01 => TxRequest16,
            0x08 => AtCommand,
            0x09 => AtCommandQueue,
            0x10 => TxRequest,
            0x11 => TxExplicitAddressing,
            0x17 => RemoteAtCommand,
            0x1F => TxSms,
            0x20 => TxIpv4,
            0x28 => SendIpDataRequest,
            0x2A => DeviceResponse,
            0x80 => RxPacket64,
            0x81 => RxPacket16,
            0x82 => RxPacketIo64,
            0x83 => RxPacketIo16,
            0x87 => WifiRemoteAtCommandResponse,
            0x88 => AtCommandResponse,
            0x89 => TxStatus,
            0x8A => ModemStatus,
            0x8B => ExtendedTxStatus,
            0x8D => RouteInfoPacket,
            0x8E => AggregateAddressingUpdate,
            0x8F => WifiIoDataSampleRxIndicator,
            0x90 => RxPacket,
            0x91 => RxExplicitIndicator,
            0x92 => IoDataSampleRxIndicator,
            0x94 => SensorReadIndicator,
            0x95 => NodeIdentificationIndicator,
            0x97 => RemoteAtCommandResponse,
            0x98 => ExtendedModemStatus,
            0x9F => RxSms,
            0xA0 => OtaFirmwareUpdateStatus,
            0xA1 => RouteRecordIndicator,
            0xA3 => ManyToOneRouteRequestIndicator,
            0xA5 => JoinNotificationStatus,
            0xB0 => RxIpv4,
            0xB8 => SendIpDataResponse,
            0xB9 => DeviceRequest,
            0xBA => DeviceResponseStatus,
            0xFE => FrameErrorIndicator,
            _ => return None,
        };
        Some(kind)
    }

    /// The wire code for this frame type.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns a human-readable name for this frame type.
    pub fn name(self) -> &'static str {
        use FrameType::*;
        match self {
            TxRequest64 => "Tx Request (64-bit)",
            TxRequest16 => "Tx Request (16-bit)",
            AtCommand => "AT Command",
            AtCommandQueue => "AT Command Queue",
            TxRequest => "Tx Request",
            TxExplicitAddressing => "Tx Explicit Addressing",
            RemoteAtCommand => "Remote AT Command",
            TxSms => "Tx SMS",
            TxIpv4 => "Tx IPv4",
            SendIpDataRequest => "Send IP Data Request",
            DeviceResponse => "Device Response",
            RxPacket64 => "Rx Packet (64-bit)",
            RxPacket16 => "Rx Packet (16-bit)",
            RxPacketIo64 => "Rx Packet IO (64-bit)",
            RxPacketIo16 => "Rx Packet IO (16-bit)",
            WifiRemoteAtCommandResponse => "Wi-Fi Remote AT Command Response",
            AtCommandResponse => "AT Command Response",
            TxStatus => "Tx Status",
            ModemStatus => "Modem Status",
            ExtendedTxStatus => "Extended Tx Status",
            RouteInfoPacket => "Route Info Packet",
            AggregateAddressingUpdate => "Aggregate Addressing Update",
            WifiIoDataSampleRxIndicator => "Wi-Fi IO Data Sample Rx Indicator",
            RxPacket => "Rx Packet",
            RxExplicitIndicator => "Rx Explicit Indicator",
            IoDataSampleRxIndicator => "IO Data Sample Rx Indicator",
            SensorReadIndicator => "Sensor Read Indicator",
            NodeIdentificationIndicator => "Node Identification Indicator",
            RemoteAtCommandResponse => "Remote AT Command Response",
            ExtendedModemStatus => "Extended Modem Status",
            RxSms => "Rx SMS",
            OtaFirmwareUpdateStatus => "OTA Firmware Update Status",
            RouteRecordIndicator => "Route Record Indicator",
            ManyToOneRouteRequestIndicator => "Many-to-One Route Request Indicator",
            JoinNotificationStatus => "Join Notification Status",
            RxIpv4 => "Rx IPv4",
            SendIpDataResponse => "Send IP Data Response",
            DeviceRequest => "Device Request",
            DeviceResponseStatus => "Device Response Status",
            FrameErrorIndicator => "Frame Error",
        }
    }

    /// Returns true if the typed-frame layer can decode this type.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            FrameType::AtCommand
                | FrameType::AtCommandQueue
                | FrameType::AtCommandResponse
                | FrameType::ModemStatus
                | FrameType::TxRequest
                | FrameType::TxExplicitAddressing
                | FrameType::RxExplicitIndicator
        )
    }
}

impl TryFrom<u8> for FrameType {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, u8> {
        Self::from_code(code).ok_or(code)
    }
}

impl From<FrameType> for u8 {
    fn from(kind: FrameType) -> u8 {
        kind.code()
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.name(), self.code())
    }
}
