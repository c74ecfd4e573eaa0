//! Interrupt flag capture
//!
//! The VCNL4040 latches its interrupt reasons in the upper byte of the
//! `INT_FLAG` register (0x0B) and clears them when the register is read,
//! which also re-arms the INT pin. The driver therefore reads the register
//! once per interrupt ([`crate::Vcnl4040::reset_interrupt`]) and keeps the
//! captured word here so every reason can be interrogated afterwards.
//!
//! # Example
//!
//! ```ignore
//! # use vcnl4040::Vcnl4040;
//! # let mut sensor: Vcnl4040<_> = todo!();
//! // INT pin fired: capture the reasons (this clears the hardware latch)
//! sensor.reset_interrupt()?;
//!
//! if sensor.was_ps_close() {
//!     // object approached
//! }
//! if sensor.was_als_low() {
//!     // ambient light dropped below ALS_THDL
//! }
//! # Ok::<(), vcnl4040::Error<()>>(())
//! ```

/// PS entered sunlight protection mode
const PS_SPFLAG: u16 = 0x4000;
/// ALS reading crossed the low threshold
const ALS_IF_L: u16 = 0x2000;
/// ALS reading crossed the high threshold
const ALS_IF_H: u16 = 0x1000;
/// PS reading rose above the close threshold
const PS_IF_CLOSE: u16 = 0x0200;
/// PS reading dropped below the away threshold
const PS_IF_AWAY: u16 = 0x0100;

/// Interrupt reasons captured from the `INT_FLAG` register
///
/// The flag bits occupy distinct positions and are not mutually
/// exclusive; several predicates can be true for one capture.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptFlags {
    raw: u16,
}

impl InterruptFlags {
    pub(crate) const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    /// Raw captured `INT_FLAG` register value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Proximity sensor entered sunlight protection mode
    #[must_use]
    pub const fn ps_protection_mode(self) -> bool {
        self.raw & PS_SPFLAG != 0
    }

    /// Ambient light dropped below the ALS low threshold
    #[must_use]
    pub const fn als_low(self) -> bool {
        self.raw & ALS_IF_L != 0
    }

    /// Ambient light rose above the ALS high threshold
    #[must_use]
    pub const fn als_high(self) -> bool {
        self.raw & ALS_IF_H != 0
    }

    /// Proximity rose above the close threshold
    #[must_use]
    pub const fn ps_close(self) -> bool {
        self.raw & PS_IF_CLOSE != 0
    }

    /// Proximity dropped below the away threshold
    #[must_use]
    pub const fn ps_away(self) -> bool {
        self.raw & PS_IF_AWAY != 0
    }

    /// Check if any interrupt reason is set
    #[must_use]
    pub const fn any_set(self) -> bool {
        self.raw & (PS_SPFLAG | ALS_IF_L | ALS_IF_H | PS_IF_CLOSE | PS_IF_AWAY) != 0
    }
}
