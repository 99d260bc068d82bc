//! Transmit and receive option bitsets.
//!
//! Tx and Rx options are separate flag spaces that happen to share bit
//! positions, so they get separate types.

/// Bits of the options byte on outgoing transmit frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TxOptionFlag {
    DisableRetries = 0x01,
    IndirectAddressing = 0x04,
    Multicast = 0x08,
    EnableApsEncryption = 0x20,
    UseTimeout = 0x40,
}

/// Bits of the options byte on received frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RxOptionFlag {
    PacketAcknowledged = 0x01,
    Broadcast = 0x02,
    ApsEncryption = 0x20,
    UseTimeout = 0x40,
}

/// A single bit of an options byte.
pub trait OptionFlag: Copy {
    fn bits(self) -> u8;
}

impl OptionFlag for TxOptionFlag {
    fn bits(self) -> u8 {
        self as u8
    }
}

impl OptionFlag for RxOptionFlag {
    fn bits(self) -> u8 {
        self as u8
    }
}

/// OR `flags` together into a fresh options byte.
///
/// The result starts from zero, so applying it replaces any earlier bits.
pub fn options_from_flags<F: OptionFlag>(flags: &[F]) -> u8 {
    flags.iter().fold(0, |acc, flag| acc | flag.bits())
}

/// Whether `flag` is set in `options`.
pub fn is_flag_set<F: OptionFlag>(options: u8, flag: F) -> bool {
    options & flag.bits() != 0
}
