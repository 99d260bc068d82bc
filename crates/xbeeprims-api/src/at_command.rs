use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use xbeeprims_frame::FrameType;

use crate::error::Result;
use crate::frame_data::{check_command, put_payload, read_command, take_payload, FrameData};

/// Local AT command (0x08), applied immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtCommand {
    pub frame_id: u8,
    /// Two-character mnemonic, e.g. `"NI"`.
    pub command: String,
    /// Parameter value; absent for queries.
    pub params: Option<Bytes>,
}

/// Local AT command (0x09) whose parameter change is queued until `AC`
/// or another applying command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtCommandQueue {
    pub frame_id: u8,
    pub command: String,
    pub params: Option<Bytes>,
}

impl AtCommand {
    /// Query `command` with no parameter.
    pub fn new(frame_id: u8, command: impl Into<String>) -> Self {
        Self {
            frame_id,
            command: command.into(),
            params: None,
        }
    }

    /// Set the parameter value.
    pub fn with_params(mut self, params: impl Into<Bytes>) -> Self {
        self.params = Some(params.into());
        self
    }
}

impl AtCommandQueue {
    /// Query `command` with no parameter.
    pub fn new(frame_id: u8, command: impl Into<String>) -> Self {
        Self {
            frame_id,
            command: command.into(),
            params: None,
        }
    }

    /// Set the parameter value to queue.
    pub fn with_params(mut self, params: impl Into<Bytes>) -> Self {
        self.params = Some(params.into());
        self
    }
}

impl FrameData for AtCommand {
    const FRAME_TYPE: FrameType = FrameType::AtCommand;
    const MIN_LEN: usize = 4;

    fn read_fields(data: &mut Bytes) -> Result<Self> {
        let frame_id = data.get_u8();
        let command = read_command(Self::FRAME_TYPE, data)?;
        Ok(Self {
            frame_id,
            command,
            params: take_payload(data),
        })
    }

    fn write_fields(&self, dst: &mut BytesMut) {
        dst.put_u8(self.frame_id);
        dst.put_slice(self.command.as_bytes());
        put_payload(dst, self.params.as_ref());
    }

    fn validate(&self) -> Result<()> {
        check_command(Self::FRAME_TYPE, &self.command)
    }
}

impl FrameData for AtCommandQueue {
    const FRAME_TYPE: FrameType = FrameType::AtCommandQueue;
    const MIN_LEN: usize = 4;

    fn read_fields(data: &mut Bytes) -> Result<Self> {
        let frame_id = data.get_u8();
        let command = read_command(Self::FRAME_TYPE, data)?;
        Ok(Self {
            frame_id,
            command,
            params: take_payload(data),
        })
    }

    fn write_fields(&self, dst: &mut BytesMut) {
        dst.put_u8(self.frame_id);
        dst.put_slice(self.command.as_bytes());
        put_payload(dst, self.params.as_ref());
    }

    fn validate(&self) -> Result<()> {
        check_command(Self::FRAME_TYPE, &self.command)
    }
}

#[cfg(test)]
mod tests {
    use xbeeprims_frame::FrameBuffer;

    use super::*;
    use crate::error::ApiError;

    #[test]
    fn encodes_reference_frame() {
        let frame = AtCommand::new(1, "AP").to_frame().unwrap();
        assert_eq!(
            frame.serialize().as_ref(),
            &[0x7E, 0x00, 0x04, 0x08, 0x01, 0x41, 0x50, 0x65]
        );
    }

    #[test]
    fn decode_with_and_without_params() {
        let body = FrameBuffer::from_parts(0x08, b"\x05NI").unwrap();
        let at = AtCommand::decode(&body).unwrap();
        assert_eq!(at, AtCommand::new(5, "NI"));

        let body = FrameBuffer::from_parts(0x08, b"\x05NIkitchen").unwrap();
        let at = AtCommand::decode(&body).unwrap();
        assert_eq!(at.params.as_deref(), Some(&b"kitchen"[..]));
        assert_eq!(at.encode().unwrap(), body);
    }

    #[test]
    fn command_must_be_two_chars() {
        for command in ["", "A", "APX"] {
            let at = AtCommand::new(1, command);
            assert!(!at.is_valid());
            assert!(matches!(at.encode(), Err(ApiError::InvalidPayload { .. })));
        }
    }

    #[test]
    fn non_ascii_command_rejected() {
        let body = FrameBuffer::from_parts(0x08, &[0x01, 0xC3, 0xA9]).unwrap();
        assert!(matches!(
            AtCommand::decode(&body),
            Err(ApiError::InvalidPayload { .. })
        ));
        assert!(!AtCommand::new(1, "é").is_valid());
    }

    #[test]
    fn too_small_body_rejected() {
        let body = FrameBuffer::from_parts(0x08, b"\x01A").unwrap();
        assert!(matches!(
            AtCommand::decode(&body),
            Err(ApiError::TooSmall { len: 3, min: 4, .. })
        ));
    }

    #[test]
    fn wrong_type_rejected() {
        let body = FrameBuffer::from_parts(0x09, b"\x01AP").unwrap();
        assert!(matches!(
            AtCommand::decode(&body),
            Err(ApiError::WrongFrameType { found: 0x09, .. })
        ));
    }

    #[test]
    fn queue_variant_uses_its_own_code() {
        let queued = AtCommandQueue::new(2, "BD").with_params(vec![0x07u8]);
        let body = queued.encode().unwrap();
        assert_eq!(body.as_bytes(), &[0x09, 0x02, b'B', b'D', 0x07]);
        assert_eq!(AtCommandQueue::decode(&body).unwrap(), queued);
    }
}
