//! Register map of the VCNL4040
//!
//! The VCNL4040 exposes thirteen 16-bit little-endian registers at
//! addresses 0x00-0x0C. Two of them pack a pair of independent 8-bit
//! configuration bytes into one word (`PS_CONF1`/`PS_CONF2` at 0x03,
//! `PS_CONF3`/`PS_MS` at 0x04); fields in the upper byte are simply
//! described with masks above bit 7.
//!
//! Every configuration bit-range is declared here as a descriptor:
//! a [`Field`] carries the register, mask, and shift; a [`TableField`]
//! additionally carries the ordered list of physical values its encodings
//! stand for; a [`BitFlag`] names the raw value that means "enabled" so
//! that shutdown-active-low fields need no per-call polarity logic.
//! The generic accessor engine in [`crate::device`] interprets these
//! descriptors; no field has hand-written read-modify-write code.

/// VCNL4040 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// ALS_CONF - ALS configuration (low byte; high byte reserved)
    AlsConf = 0x00,
    /// ALS_THDH - ALS interrupt high threshold, full 16-bit
    AlsHighThreshold = 0x01,
    /// ALS_THDL - ALS interrupt low threshold, full 16-bit
    AlsLowThreshold = 0x02,
    /// PS_CONF1 (low byte) / PS_CONF2 (high byte)
    PsConf1 = 0x03,
    /// PS_CONF3 (low byte) / PS_MS (high byte)
    PsConf3 = 0x04,
    /// PS_CANC - proximity cancellation level, full 16-bit
    PsCancellation = 0x05,
    /// PS_THDL - proximity interrupt low threshold
    PsLowThreshold = 0x06,
    /// PS_THDH - proximity interrupt high threshold
    PsHighThreshold = 0x07,
    /// PS_DATA - proximity reading (read-only)
    PsData = 0x08,
    /// ALS_DATA - ambient light reading (read-only)
    AlsData = 0x09,
    /// WHITE_DATA - white channel reading (read-only)
    WhiteData = 0x0A,
    /// INT_FLAG - interrupt flags in the upper byte (read clears)
    InterruptFlags = 0x0B,
    /// ID - device identity, expected 0x0186
    Id = 0x0C,
}

impl Register {
    /// Register address on the bus
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// A named bit-range within a 16-bit register
///
/// The decoded value of a field is `(raw & mask) >> shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field {
    pub register: Register,
    pub mask: u16,
    pub shift: u8,
}

impl Field {
    pub(crate) const fn new(register: Register, mask: u16, shift: u8) -> Self {
        Self {
            register,
            mask,
            shift,
        }
    }
}

/// A field whose encodings index an ordered table of supported values
///
/// Encoding is exact-match only: a physical value absent from `values`
/// is rejected, never rounded or clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TableField<const N: usize> {
    pub field: Field,
    pub values: [u16; N],
}

/// A 1-bit field with a named "enabled" raw value
///
/// Several VCNL4040 fields are shutdown bits where 0 means "on"
/// (`ALS_SD`, `PS_SD`, `WHITE_EN`); `active` records which raw value
/// stands for the enabled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BitFlag {
    pub field: Field,
    pub active: u16,
}

// ==================== ALS_CONF (0x00) ====================

/// ALS_IT - integration time, encodings 0..3 = {80, 160, 320, 640} ms
pub(crate) const ALS_INTEGRATION_TIME: TableField<4> = TableField {
    field: Field::new(Register::AlsConf, 0x00C0, 6),
    values: [80, 160, 320, 640],
};

/// ALS_PERS - interrupt persistence, encodings 0..3 = {1, 2, 4, 8} hits
pub(crate) const ALS_PERSISTENCE: TableField<4> = TableField {
    field: Field::new(Register::AlsConf, 0x000C, 2),
    values: [1, 2, 4, 8],
};

/// ALS_INT_EN - interrupt enable (1 = enabled)
pub(crate) const ALS_INTERRUPT: BitFlag = BitFlag {
    field: Field::new(Register::AlsConf, 0x0002, 1),
    active: 1,
};

/// ALS_SD - shutdown (0 = powered)
pub(crate) const ALS_POWER: BitFlag = BitFlag {
    field: Field::new(Register::AlsConf, 0x0001, 0),
    active: 0,
};

// ==================== PS_CONF1 / PS_CONF2 (0x03) ====================

/// PS_DUTY - IRED on/off duty ratio, encodings 0..3 = 1/{40, 80, 160, 320}
pub(crate) const PS_DUTY: TableField<4> = TableField {
    field: Field::new(Register::PsConf1, 0x00C0, 6),
    values: [40, 80, 160, 320],
};

/// PS_PERS - interrupt persistence, hits = raw + 1 (1..=4)
pub(crate) const PS_PERSISTENCE: Field = Field::new(Register::PsConf1, 0x0030, 4);

/// PS_IT - integration time, encodings 0..7 = 1T..8T
pub(crate) const PS_INTEGRATION_TIME: Field = Field::new(Register::PsConf1, 0x000E, 1);

/// PS_SD - shutdown (0 = powered)
pub(crate) const PS_POWER: BitFlag = BitFlag {
    field: Field::new(Register::PsConf1, 0x0001, 0),
    active: 0,
};

/// PS_HD - output resolution (0 = 12-bit, 1 = 16-bit)
pub(crate) const PS_RESOLUTION: Field = Field::new(Register::PsConf1, 0x0800, 11);

/// PS_INT - interrupt trigger condition (0=off, 1=close, 2=away, 3=both)
pub(crate) const PS_INTERRUPT: Field = Field::new(Register::PsConf1, 0x0300, 8);

// ==================== PS_CONF3 / PS_MS (0x04) ====================

/// PS_MPS - IRED pulses per measurement, encodings 0..3 = {1, 2, 4, 8}
pub(crate) const PS_MULTI_PULSE: TableField<4> = TableField {
    field: Field::new(Register::PsConf3, 0x0060, 5),
    values: [1, 2, 4, 8],
};

/// PS_SMART_PERS - smart persistence (1 = enabled)
pub(crate) const PS_SMART_PERSISTENCE: BitFlag = BitFlag {
    field: Field::new(Register::PsConf3, 0x0010, 4),
    active: 1,
};

/// PS_AF - active force mode (1 = enabled)
pub(crate) const PS_ACTIVE_FORCE: BitFlag = BitFlag {
    field: Field::new(Register::PsConf3, 0x0008, 3),
    active: 1,
};

/// PS_TRIG - one-shot measurement trigger, self-clearing
pub(crate) const PS_TRIGGER: Field = Field::new(Register::PsConf3, 0x0004, 2);

/// PS_SC_EN - sunlight cancellation (1 = enabled)
pub(crate) const PS_SUN_CANCELLATION: BitFlag = BitFlag {
    field: Field::new(Register::PsConf3, 0x0001, 0),
    active: 1,
};

/// WHITE_EN - white channel shutdown (0 = powered)
pub(crate) const WHITE_POWER: BitFlag = BitFlag {
    field: Field::new(Register::PsConf3, 0x8000, 15),
    active: 0,
};

/// PS_MS - operation mode (0 = interrupt, 1 = detection logic output)
pub(crate) const PS_MODE: Field = Field::new(Register::PsConf3, 0x4000, 14);

/// LED_I - IRED current, encodings 0..7 =
/// {50, 75, 100, 120, 140, 160, 180, 200} mA
pub(crate) const PS_LED_CURRENT: TableField<8> = TableField {
    field: Field::new(Register::PsConf3, 0x0700, 8),
    values: [50, 75, 100, 120, 140, 160, 180, 200],
};
