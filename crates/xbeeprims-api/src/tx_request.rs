use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use xbeeprims_frame::FrameType;

use crate::address::{Address16, Address64};
use crate::error::Result;
use crate::frame_data::{put_payload, take_payload, FrameData};
use crate::options::{is_flag_set, options_from_flags, TxOptionFlag};

/// Transmit request (0x10): send RF data to a remote node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRequest {
    pub frame_id: u8,
    pub address64: Address64,
    pub address16: Address16,
    /// Maximum hops for broadcasts; 0 means the network maximum.
    pub broadcast_radius: u8,
    pub options: u8,
    pub payload: Option<Bytes>,
}

impl TxRequest {
    /// Unicast to `address64` with the 16-bit address left for the module
    /// to discover.
    pub fn new(frame_id: u8, address64: Address64) -> Self {
        Self {
            frame_id,
            address64,
            address16: Address16::UNKNOWN,
            broadcast_radius: 0,
            options: 0,
            payload: None,
        }
    }

    /// Broadcast to every node on the network.
    pub fn broadcast(frame_id: u8) -> Self {
        Self::new(frame_id, Address64::BROADCAST)
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

impl FrameData for TxRequest {
    const FRAME_TYPE: FrameType = FrameType::TxRequest;
    const MIN_LEN: usize = 14;

    fn read_fields(data: &mut Bytes) -> Result<Self> {
        Ok(Self {
            frame_id: data.get_u8(),
            address64: Address64::from(data.get_u64()),
            address16: Address16::from(data.get_u16()),
            broadcast_radius: data.get_u8(),
            options: data.get_u8(),
            payload: take_payload(data),
        })
    }

    fn write_fields(&self, dst: &mut BytesMut) {
        dst.put_u8(self.frame_id);
        dst.put_slice(self.address64.as_bytes());
        dst.put_slice(self.address16.as_bytes());
        dst.put_u8(self.broadcast_radius);
        dst.put_u8(self.options);
        put_payload(dst, self.payload.as_ref());
    }

    // Address widths are fixed by their types.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use xbeeprims_frame::FrameBuffer;

    use super::*;
    use crate::error::ApiError;

    fn sample() -> TxRequest {
        TxRequest::new(0x52, "0013a20040a1b2c3".parse().unwrap()).with_payload(&b"hello"[..])
    }

    #[test]
    fn field_layout() {
        let body = sample().encode().unwrap();
        assert_eq!(
            body.as_bytes(),
            &[
                0x10, 0x52, 0x00, 0x13, 0xA2, 0x00, 0x40, 0xA1, 0xB2, 0xC3, 0xFF, 0xFE, 0x00,
                0x00, b'h', b'e', b'l', b'l', b'o',
            ]
        );
    }

    #[test]
    fn decode_restores_fields() {
        let tx = sample();
        let decoded = TxRequest::decode(&tx.encode().unwrap()).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.address64.to_hex(), "0013a20040a1b2c3");
        assert_eq!(decoded.address16, Address16::UNKNOWN);
    }

    #[test]
    fn no_payload_at_minimum_length() {
        let tx = TxRequest::broadcast(1);
        let body = tx.encode().unwrap();
        assert_eq!(body.len(), TxRequest::MIN_LEN);
        assert_eq!(TxRequest::decode(&body).unwrap().payload, None);
    }

    #[test]
    fn too_small_body_rejected() {
        let body = FrameBuffer::from_parts(0x10, &[0u8; 12]).unwrap();
        assert!(matches!(
            TxRequest::decode(&body),
            Err(ApiError::TooSmall { len: 13, min: 14, .. })
        ));
    }

    #[test]
    fn options_flags_replace_previous_bits() {
        let mut tx = sample();
        tx.set_options_flags(&[TxOptionFlag::DisableRetries, TxOptionFlag::EnableApsEncryption]);
        assert_eq!(tx.options, 0x21);
        assert!(tx.is_options_flag_set(TxOptionFlag::EnableApsEncryption));

        tx.set_options_flags(&[TxOptionFlag::Multicast]);
        assert_eq!(tx.options, 0x08);
        assert!(!tx.is_options_flag_set(TxOptionFlag::DisableRetries));
    }
}
