use bytes::{Buf, BufMut, Bytes, BytesMut};
use xbeeprims_frame::{Frame, FrameBuffer, FrameType};

use crate::error::{ApiError, Result};

/// A typed frame payload with a fixed frame-type code.
///
/// Implementors describe their fields; decoding and encoding around them
/// (type check, minimum size, validity) is shared.
pub trait FrameData: Sized {
    /// Frame-type code this variant is keyed by.
    const FRAME_TYPE: FrameType;

    /// Smallest body, type byte included, that holds every fixed field.
    const MIN_LEN: usize;

    /// Parse fields from the bytes following the type byte.
    ///
    /// `data` holds at least `MIN_LEN - 1` bytes.
    fn read_fields(data: &mut Bytes) -> Result<Self>;

    /// Append fields after the type byte.
    fn write_fields(&self, dst: &mut BytesMut);

    /// Check the variant's validity rule.
    fn validate(&self) -> Result<()>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Decode a frame body of this variant's type.
    fn decode(body: &FrameBuffer) -> Result<Self> {
        if body.frame_type() != Self::FRAME_TYPE.code() {
            return Err(ApiError::WrongFrameType {
                expected: Self::FRAME_TYPE,
                found: body.frame_type(),
            });
        }
        if body.len() < Self::MIN_LEN {
            return Err(ApiError::TooSmall {
                kind: Self::FRAME_TYPE,
                len: body.len(),
                min: Self::MIN_LEN,
            });
        }

        let mut data = body.clone().into_bytes();
        data.advance(1);
        let decoded = Self::read_fields(&mut data)?;
        decoded.validate()?;
        Ok(decoded)
    }

    /// Encode into a frame body. Invalid values are refused.
    fn encode(&self) -> Result<FrameBuffer> {
        self.validate()?;
        let mut buf = BytesMut::with_capacity(Self::MIN_LEN);
        buf.put_u8(Self::FRAME_TYPE.code());
        self.write_fields(&mut buf);
        Ok(FrameBuffer::new(buf.freeze())?)
    }

    /// Encode into a complete wire frame.
    fn to_frame(&self) -> Result<Frame> {
        self.encode().map(Frame::new)
    }
}

pub(crate) fn invalid(kind: FrameType, reason: impl Into<String>) -> ApiError {
    ApiError::InvalidPayload {
        kind,
        reason: reason.into(),
    }
}

/// Remaining bytes as an optional trailing payload.
pub(crate) fn take_payload(data: &mut Bytes) -> Option<Bytes> {
    if data.has_remaining() {
        Some(data.split_to(data.remaining()))
    } else {
        None
    }
}

pub(crate) fn put_payload(dst: &mut BytesMut, payload: Option<&Bytes>) {
    if let Some(payload) = payload {
        dst.put_slice(payload);
    }
}

/// Two ASCII characters naming an AT command.
pub(crate) fn read_command(kind: FrameType, data: &mut Bytes) -> Result<String> {
    let raw = data.split_to(2);
    if !raw.is_ascii() {
        return Err(invalid(kind, "command is not ASCII"));
    }
    Ok(raw.iter().map(|&b| b as char).collect())
}

pub(crate) fn check_command(kind: FrameType, command: &str) -> Result<()> {
    if command.len() != 2 || !command.is_ascii() {
        return Err(invalid(
            kind,
            format!("command must be two ASCII characters, got {command:?}"),
        ));
    }
    Ok(())
}
