//! Proximity sensor configuration types

/// Proximity sensor integration time
///
/// Expressed in multiples of the IRED pulse width T; longer integration
/// increases sensitivity and power draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PsIntegrationTime {
    /// 1.0 T
    T1 = 0,
    /// 1.5 T
    T1_5 = 1,
    /// 2.0 T
    T2 = 2,
    /// 2.5 T
    T2_5 = 3,
    /// 3.0 T
    T3 = 4,
    /// 3.5 T
    T3_5 = 5,
    /// 4.0 T
    T4 = 6,
    /// 8.0 T
    T8 = 7,
}

impl PsIntegrationTime {
    /// Raw `PS_IT` field encoding
    #[must_use]
    pub const fn raw(self) -> u16 {
        self as u16
    }

    /// Decode a raw `PS_IT` field value
    ///
    /// The field is 3 bits wide and every encoding is defined, so this is
    /// total over the field's range.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(Self::T1),
            1 => Some(Self::T1_5),
            2 => Some(Self::T2),
            3 => Some(Self::T2_5),
            4 => Some(Self::T3),
            5 => Some(Self::T3_5),
            6 => Some(Self::T4),
            7 => Some(Self::T8),
            _ => None,
        }
    }
}

/// Proximity interrupt trigger condition (`PS_INT` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PsInterruptTrigger {
    /// Interrupt disabled
    Disabled = 0,
    /// Trigger when an object comes closer than the high threshold
    Close = 1,
    /// Trigger when an object moves past the low threshold
    Away = 2,
    /// Trigger on both conditions
    CloseOrAway = 3,
}

impl PsInterruptTrigger {
    /// Raw `PS_INT` field encoding
    #[must_use]
    pub const fn raw(self) -> u16 {
        self as u16
    }

    /// Decode a raw `PS_INT` field value (total over the 2-bit field)
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(Self::Disabled),
            1 => Some(Self::Close),
            2 => Some(Self::Away),
            3 => Some(Self::CloseOrAway),
            _ => None,
        }
    }
}

/// Proximity operation mode (`PS_MS` bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PsMode {
    /// Normal operation: threshold crossings raise the interrupt flags
    Interrupt = 0,
    /// Detection logic output: the INT pin directly reflects whether an
    /// object is closer than the high threshold
    LogicOutput = 1,
}

impl PsMode {
    /// Raw `PS_MS` bit encoding
    #[must_use]
    pub const fn raw(self) -> u16 {
        self as u16
    }

    /// Decode the raw `PS_MS` bit
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(Self::Interrupt),
            1 => Some(Self::LogicOutput),
            _ => None,
        }
    }
}
