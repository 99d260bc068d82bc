use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::frame_type::FrameType;

/// Start delimiter opening every frame.
pub const START_DELIMITER: u8 = 0x7E;

/// Frame header: delimiter (1) + length (2) = 3 bytes.
pub const HEADER_SIZE: usize = 3;

/// Trailing checksum byte.
pub const CHECKSUM_SIZE: usize = 1;

/// Smallest well-formed frame: header, frame-type byte, checksum.
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + 1 + CHECKSUM_SIZE;

/// Largest body the 16-bit length field can describe.
pub const MAX_BODY_LEN: usize = u16::MAX as usize;

/// Checksum over a frame body: `0xFF` minus the low byte of the byte sum.
pub fn checksum(body: &[u8]) -> u8 {
    0xFF - body.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Total wire size of a frame whose length field is `data_len`.
pub fn total_frame_size(data_len: usize) -> usize {
    HEADER_SIZE + data_len + CHECKSUM_SIZE
}

/// Raw frame body: `[frame-type byte][payload bytes]`.
///
/// Immutable after construction and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameBuffer {
    buf: Bytes,
}

#[allow(clippy::len_without_is_empty)]
impl FrameBuffer {
    /// Wrap a complete body (type byte included).
    pub fn new(buf: impl Into<Bytes>) -> Result<Self> {
        let buf = buf.into();
        if buf.is_empty() {
            return Err(FrameError::EmptyBody);
        }
        if buf.len() > MAX_BODY_LEN {
            return Err(FrameError::BodyTooLarge {
                size: buf.len(),
                max: MAX_BODY_LEN,
            });
        }
        Ok(Self { buf })
    }

    /// Build a body from a frame-type code and its payload.
    pub fn from_parts(frame_type: u8, data: &[u8]) -> Result<Self> {
        let mut buf = BytesMut::with_capacity(1 + data.len());
        buf.put_u8(frame_type);
        buf.put_slice(data);
        Self::new(buf.freeze())
    }

    /// The frame-type code (first body byte).
    pub fn frame_type(&self) -> u8 {
        self.buf[0]
    }

    /// The frame type, if the code is a known one.
    pub fn kind(&self) -> Option<FrameType> {
        FrameType::from_code(self.frame_type())
    }

    /// Payload bytes following the frame-type code.
    pub fn data(&self) -> &[u8] {
        &self.buf[1..]
    }

    /// Body length, type byte included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// The whole body, type byte included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the buffer and return the shared body bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buf
    }

    /// Checksum over the whole body.
    pub fn checksum(&self) -> u8 {
        checksum(&self.buf)
    }
}

/// A complete wire frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    length: u16,
    body: FrameBuffer,
    checksum: u8,
}

impl Frame {
    /// Create a frame around a body, deriving length and checksum.
    pub fn new(body: FrameBuffer) -> Self {
        // FrameBuffer guarantees the body fits the length field.
        let length = body.len() as u16;
        let checksum = body.checksum();
        Self {
            length,
            body,
            checksum,
        }
    }

    /// Value of the length field.
    pub fn length(&self) -> u16 {
        self.length
    }

    /// The frame body.
    pub fn body(&self) -> &FrameBuffer {
        &self.body
    }

    /// Consume the frame and return its body.
    pub fn into_body(self) -> FrameBuffer {
        self.body
    }

    /// The trailing checksum byte.
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// The frame-type code of the body.
    pub fn frame_type(&self) -> u8 {
        self.body.frame_type()
    }

    /// The total wire size of this frame.
    pub fn wire_size(&self) -> usize {
        total_frame_size(self.body.len())
    }

    /// Append the wire encoding of this frame to `dst`.
    ///
    /// Wire format:
    /// ```text
    /// ┌───────────┬─────────────┬────────────┬───────────────┬──────────┐
    /// │ 0x7E (1B) │ Length (2B  │ Type (1B)  │ Payload       │ Checksum │
    /// │           │ big-endian) │            │ (Length - 1B) │ (1B)     │
    /// └───────────┴─────────────┴────────────┴───────────────┴──────────┘
    /// ```
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(self.wire_size());
        dst.put_u8(START_DELIMITER);
        dst.put_u16(self.length);
        dst.put_slice(self.body.as_bytes());
        dst.put_u8(self.body.checksum());
    }

    /// Serialize this frame into a fresh buffer.
    pub fn serialize(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Decode exactly one frame occupying all of `src`.
    pub fn deserialize(src: &[u8]) -> Result<Self> {
        if src.len() < MIN_FRAME_SIZE {
            return Err(FrameError::FrameTooShort {
                len: src.len(),
                min: MIN_FRAME_SIZE,
            });
        }

        if src[0] != START_DELIMITER {
            return Err(FrameError::InvalidStartDelimiter(src[0]));
        }

        let checksum_index = src.len() - 1;
        let sum = src[HEADER_SIZE..]
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b));
        if sum != 0xFF {
            return Err(FrameError::ChecksumInvalid {
                expected: checksum(&src[HEADER_SIZE..checksum_index]),
                found: src[checksum_index],
            });
        }

        let declared = u16::from_be_bytes([src[1], src[2]]);
        let actual = checksum_index - HEADER_SIZE;
        if declared as usize != actual {
            return Err(FrameError::LengthMismatch {
                declared: declared as usize,
                actual,
            });
        }

        let body = FrameBuffer::new(Bytes::copy_from_slice(&src[HEADER_SIZE..checksum_index]))?;
        let found = src[checksum_index];
        if body.checksum() != found {
            return Err(FrameError::ChecksumInvalid {
                expected: body.checksum(),
                found,
            });
        }

        Ok(Self {
            length: declared,
            body,
            checksum: found,
        })
    }
}

impl From<FrameBuffer> for Frame {
    fn from(body: FrameBuffer) -> Self {
        Self::new(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AT_RESPONSE_MY: [u8; 11] = [
        0x7E, 0x00, 0x07, 0x88, 0x01, 0x4D, 0x59, 0x00, 0x00, 0x00, 0xD0,
    ];

    #[test]
    fn decode_at_response_vector() {
        let frame = Frame::deserialize(&AT_RESPONSE_MY).unwrap();

        assert_eq!(frame.length(), 7);
        assert_eq!(frame.body().len(), 7);
        assert_eq!(frame.frame_type(), 0x88);
        assert_eq!(frame.body().data(), &[0x01, 0x4D, 0x59, 0x00, 0x00, 0x00]);
        assert_eq!(frame.checksum(), 0xD0);
    }

    #[test]
    fn decode_bad_checksum_vector() {
        let mut bytes = AT_RESPONSE_MY;
        bytes[10] = 0xD1;

        let err = Frame::deserialize(&bytes).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ChecksumInvalid {
                expected: 0xD0,
                found: 0xD1
            }
        ));
    }

    #[test]
    fn encode_at_command_vector() {
        let body = FrameBuffer::from_parts(0x08, &[0x01, b'A', b'P']).unwrap();
        let frame = Frame::new(body);

        assert_eq!(
            frame.serialize().as_ref(),
            &[0x7E, 0x00, 0x04, 0x08, 0x01, 0x41, 0x50, 0x65]
        );
    }

    #[test]
    fn checksum_matches_definition() {
        assert_eq!(checksum(&[0x08, 0x07, 0x02]), 0xFF - (0x08 + 0x07 + 0x02));
        assert_eq!(checksum(&[0xFF, 0x01]), 0xFF);
    }

    #[test]
    fn serialize_deserialize_roundtrip() {
        let payloads: [&[u8]; 3] = [&[], &[0x00], &[0xAB; 300]];
        for payload in payloads {
            let frame = Frame::new(FrameBuffer::from_parts(0x10, payload).unwrap());
            let decoded = Frame::deserialize(&frame.serialize()).unwrap();
            assert_eq!(decoded, frame);
        }
    }

    #[test]
    fn single_bit_flip_breaks_checksum() {
        let wire = AT_RESPONSE_MY;
        for index in HEADER_SIZE..wire.len() {
            for bit in 0..8 {
                let mut corrupted = wire;
                corrupted[index] ^= 1 << bit;
                let err = Frame::deserialize(&corrupted).unwrap_err();
                assert!(
                    matches!(err, FrameError::ChecksumInvalid { .. }),
                    "byte {index} bit {bit}: {err}"
                );
            }
        }
    }

    #[test]
    fn decode_too_short() {
        let err = Frame::deserialize(&[0x7E, 0x00, 0x01, 0xFE]).unwrap_err();
        assert!(matches!(err, FrameError::FrameTooShort { len: 4, min: 5 }));
    }

    #[test]
    fn decode_invalid_delimiter() {
        let mut bytes = AT_RESPONSE_MY;
        bytes[0] = 0x7D;
        let err = Frame::deserialize(&bytes).unwrap_err();
        assert!(matches!(err, FrameError::InvalidStartDelimiter(0x7D)));
    }

    #[test]
    fn decode_length_mismatch() {
        let mut bytes = AT_RESPONSE_MY;
        bytes[2] = 0x08;
        let err = Frame::deserialize(&bytes).unwrap_err();
        assert!(matches!(
            err,
            FrameError::LengthMismatch {
                declared: 8,
                actual: 7
            }
        ));
    }

    #[test]
    fn empty_body_rejected() {
        assert!(matches!(
            FrameBuffer::new(Bytes::new()),
            Err(FrameError::EmptyBody)
        ));
    }

    #[test]
    fn oversized_body_rejected() {
        let err = FrameBuffer::new(vec![0u8; MAX_BODY_LEN + 1]).unwrap_err();
        assert!(matches!(err, FrameError::BodyTooLarge { .. }));
    }

    #[test]
    fn frame_buffer_accessors() {
        let body = FrameBuffer::from_parts(0x8A, &[0x02]).unwrap();
        assert_eq!(body.frame_type(), 0x8A);
        assert_eq!(body.kind(), Some(FrameType::ModemStatus));
        assert_eq!(body.data(), &[0x02]);
        assert_eq!(body.as_bytes(), &[0x8A, 0x02]);
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn wire_size_and_total_frame_size_agree() {
        let frame = Frame::new(FrameBuffer::from_parts(0x08, b"\x01AP").unwrap());
        assert_eq!(frame.wire_size(), total_frame_size(4));
        assert_eq!(frame.wire_size(), frame.serialize().len());
    }
}
