#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod device;
pub mod interface;
pub mod interrupt;
pub mod registers;
pub mod sensors;

// Re-export main types
pub use device::Vcnl4040;
pub use interface::I2cInterface;
pub use interrupt::InterruptFlags;
pub use registers::Register;
pub use sensors::{lux_resolution, PsIntegrationTime, PsInterruptTrigger, PsMode};

/// VCNL4040 I2C bus address (fixed: 0x60)
///
/// The VCNL4040 has no address-select pin; every device on a bus answers
/// at this address. Use [`I2cInterface::default()`] for this configuration.
pub const I2C_ADDRESS: u8 = 0x60;

/// Expected value of the `ID` register (0x0C)
pub const DEVICE_ID: u16 = 0x0186;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Invalid `ID` register value (contains the actual value read)
    InvalidDevice(u16),
    /// Requested physical value is not one of the encodings the device
    /// supports (contains the rejected value)
    UnsupportedValue(u16),
    /// Field value has bits set outside the field's mask; nothing was
    /// written to the device
    InvalidFieldValue,
    /// Raw encoding read back from the device has no table entry, e.g.
    /// a register corrupted or written by another tool (contains the raw
    /// field value)
    UnknownEncoding(u16),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
