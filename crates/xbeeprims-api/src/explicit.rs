//! Explicit addressing frames: radio addresses plus application endpoints,
//! cluster and profile identifiers.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use xbeeprims_frame::FrameType;

use crate::address::{Address16, Address64};
use crate::error::Result;
use crate::frame_data::{put_payload, take_payload, FrameData};
use crate::options::{is_flag_set, options_from_flags, RxOptionFlag, TxOptionFlag};

/// Digi data endpoint, the usual source and destination for serial data.
pub const DIGI_DATA_ENDPOINT: u8 = 0xE8;

/// Digi application profile.
pub const DIGI_PROFILE_ID: u16 = 0xC105;

/// Explicit addressing transmit (0x11).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxExplicitAddressing {
    pub frame_id: u8,
    pub address64: Address64,
    pub address16: Address16,
    pub src_endpoint: u8,
    pub dst_endpoint: u8,
    pub cluster_id: u16,
    pub profile_id: u16,
    pub broadcast_radius: u8,
    pub options: u8,
    pub payload: Option<Bytes>,
}

/// Explicit addressing receive indicator (0x91).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RxExplicitIndicator {
    pub frame_id: u8,
    pub address64: Address64,
    pub address16: Address16,
    pub src_endpoint: u8,
    pub dst_endpoint: u8,
    pub cluster_id: u16,
    pub profile_id: u16,
    pub options: u8,
    pub payload: Option<Bytes>,
}

impl TxExplicitAddressing {
    /// Serial data to `address64` on the Digi data endpoint and profile.
    pub fn new(frame_id: u8, address64: Address64) -> Self {
        Self {
            frame_id,
            address64,
            address16: Address16::UNKNOWN,
            src_endpoint: DIGI_DATA_ENDPOINT,
            dst_endpoint: DIGI_DATA_ENDPOINT,
            cluster_id: 0x0011,
            profile_id: DIGI_PROFILE_ID,
            broadcast_radius: 0,
            options: 0,
            payload: None,
        }
    }

    /// Set the data to transmit.
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Replace the options byte with the OR of `flags`.
    pub fn set_options_flags(&mut self, flags: &[TxOptionFlag]) {
        self.options = options_from_flags(flags);
    }

    /// Whether `flag` is set in the options byte.
    pub fn is_options_flag_set(&self, flag: TxOptionFlag) -> bool {
        is_flag_set(self.options, flag)
    }
}

impl RxExplicitIndicator {
    /// Replace the options byte with the OR of `flags`.
    pub fn set_options_flags(&mut self, flags: &[RxOptionFlag]) {
        self.options = options_from_flags(flags);
    }

    /// Whether `flag` is set in the options byte.
    pub fn is_options_flag_set(&self, flag: RxOptionFlag) -> bool {
        is_flag_set(self.options, flag)
    }
}

impl FrameData for TxExplicitAddressing {
    const FRAME_TYPE: FrameType = FrameType::TxExplicitAddressing;
    const MIN_LEN: usize = 20;

    fn read_fields(data: &mut Bytes) -> Result<Self> {
        Ok(Self {
            frame_id: data.get_u8(),
            address64: Address64::from(data.get_u64()),
            address16: Address16::from(data.get_u16()),
            src_endpoint: data.get_u8(),
            dst_endpoint: data.get_u8(),
            cluster_id: data.get_u16(),
            profile_id: data.get_u16(),
            broadcast_radius: data.get_u8(),
            options: data.get_u8(),
            payload: take_payload(data),
        })
    }

    fn write_fields(&self, dst: &mut BytesMut) {
        dst.put_u8(self.frame_id);
        dst.put_slice(self.address64.as_bytes());
        dst.put_slice(self.address16.as_bytes());
        dst.put_u8(self.src_endpoint);
        dst.put_u8(self.dst_endpoint);
        dst.put_u16(self.cluster_id);
        dst.put_u16(self.profile_id);
        dst.put_u8(self.broadcast_radius);
        dst.put_u8(self.options);
        put_payload(dst, self.payload.as_ref());
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl FrameData for RxExplicitIndicator {
    const FRAME_TYPE: FrameType = FrameType::RxExplicitIndicator;
    const MIN_LEN: usize = 19;

    fn read_fields(data: &mut Bytes) -> Result<Self> {
        Ok(Self {
            frame_id: data.get_u8(),
            address64: Address64::from(data.get_u64()),
            address16: Address16::from(data.get_u16()),
            src_endpoint: data.get_u8(),
            dst_endpoint: data.get_u8(),
            cluster_id: data.get_u16(),
            profile_id: data.get_u16(),
            options: data.get_u8(),
            payload: take_payload(data),
        })
    }

    fn write_fields(&self, dst: &mut BytesMut) {
        dst.put_u8(self.frame_id);
        dst.put_slice(self.address64.as_bytes());
        dst.put_slice(self.address16.as_bytes());
        dst.put_u8(self.src_endpoint);
        dst.put_u8(self.dst_endpoint);
        dst.put_u16(self.cluster_id);
        dst.put_u16(self.profile_id);
        dst.put_u8(self.options);
        put_payload(dst, self.payload.as_ref());
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
