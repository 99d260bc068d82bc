//! Radio addresses.
//!
//! The canonical form is the raw big-endian bytes carried on the wire. Hex
//! text is accepted case-insensitively and always rendered lowercase.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ApiError, Result};

/// 64-bit (IEEE extended) device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address64([u8; 8]);

/// 16-bit network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address16([u8; 2]);

impl Address64 {
    /// Width on the wire.
    pub const LEN: usize = 8;
    /// The network coordinator.
    pub const COORDINATOR: Self = Self([0x00; 8]);
    /// Broadcast to every node.
    pub const BROADCAST: Self = Self([0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF]);

    /// Wrap raw big-endian bytes.
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Parse exactly 16 hex digits.
    pub fn from_hex(input: &str) -> Result<Self> {
        decode_hex(input).map(Self)
    }

    /// Lowercase, zero-padded hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw bytes as carried on the wire.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Big-endian integer value.
    pub fn to_u64(self) -> u64 {
        u64::from_be_bytes(self.0)
    }
}

impl Address16 {
    /// Width on the wire.
    pub const LEN: usize = 2;
    /// The coordinator's network address.
    pub const COORDINATOR: Self = Self([0x00, 0x00]);
    /// Network address not known; route by the 64-bit address.
    pub const UNKNOWN: Self = Self([0xFF, 0xFE]);

    /// Wrap raw big-endian bytes.
    pub const fn new(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    /// Parse exactly 4 hex digits.
    pub fn from_hex(input: &str) -> Result<Self> {
        decode_hex(input).map(Self)
    }

    /// Lowercase, zero-padded hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw bytes as carried on the wire.
    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    /// Big-endian integer value.
    pub fn to_u16(self) -> u16 {
        u16::from_be_bytes(self.0)
    }
}

fn decode_hex<const N: usize>(input: &str) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    hex::decode_to_slice(input, &mut out).map_err(|err| ApiError::InvalidAddress {
        input: input.to_string(),
        reason: match err {
            hex::FromHexError::InvalidHexCharacter { .. } => "address contains non-hex characters",
            _ if N == 8 => "expected 16 hex digits",
            _ => "expected 4 hex digits",
        },
    })?;
    Ok(out)
}

impl From<[u8; 8]> for Address64 {
    fn from(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }
}

impl From<u64> for Address64 {
    fn from(value: u64) -> Self {
        Self(value.to_be_bytes())
    }
}

impl From<[u8; 2]> for Address16 {
    fn from(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }
}

impl From<u16> for Address16 {
    fn from(value: u16) -> Self {
        Self(value.to_be_bytes())
    }
}

impl FromStr for Address64 {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl FromStr for Address16 {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Address64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for Address16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Address64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Address16 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address16 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}
