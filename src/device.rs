//! High-level driver API for the VCNL4040
//!
//! All configuration accessors go through one generic field engine:
//! a read of the 16-bit register, a mask/shift decode or a validated
//! read-modify-write encode, and for table-driven settings an exact-match
//! lookup between physical values and their hardware encodings. The field
//! descriptors and tables live in [`crate::registers`].

#[cfg(feature = "async")]
use crate::interface::AsyncTransport;
#[cfg(not(feature = "async"))]
use crate::interface::Transport;
use crate::interrupt::InterruptFlags;
use crate::registers::{self, BitFlag, Field, Register, TableField};
use crate::sensors::{lux_resolution, PsIntegrationTime, PsInterruptTrigger, PsMode};
use crate::{Error, DEVICE_ID};

/// Main driver for the VCNL4040
///
/// Owns the injected transport exclusively plus one piece of state: the
/// interrupt flags captured by the most recent
/// [`reset_interrupt()`](Self::reset_interrupt) call. Configuration
/// updates are read-modify-write sequences without atomicity across the
/// pair, so a driver instance must not be shared between concurrent
/// callers without external synchronization.
pub struct Vcnl4040<I> {
    interface: I,
    interrupt_flags: InterruptFlags,
}

impl<I> Vcnl4040<I> {
    /// Consume the driver and return the transport
    pub fn release(self) -> I {
        self.interface
    }

    /// Interrupt reasons captured by the last
    /// [`reset_interrupt()`](Self::reset_interrupt) call
    ///
    /// All zero until the first capture.
    #[must_use]
    pub const fn interrupt_flags(&self) -> InterruptFlags {
        self.interrupt_flags
    }

    /// Whether the last captured interrupt was raised by the proximity
    /// sensor entering sunlight protection mode
    #[must_use]
    pub const fn was_ps_protection_mode(&self) -> bool {
        self.interrupt_flags.ps_protection_mode()
    }

    /// Whether the last captured interrupt was raised by ambient light
    /// dropping below the ALS low threshold
    #[must_use]
    pub const fn was_als_low(&self) -> bool {
        self.interrupt_flags.als_low()
    }

    /// Whether the last captured interrupt was raised by ambient light
    /// rising above the ALS high threshold
    #[must_use]
    pub const fn was_als_high(&self) -> bool {
        self.interrupt_flags.als_high()
    }

    /// Whether the last captured interrupt was raised by an object
    /// closer than the proximity high threshold
    #[must_use]
    pub const fn was_ps_close(&self) -> bool {
        self.interrupt_flags.ps_close()
    }

    /// Whether the last captured interrupt was raised by an object
    /// farther than the proximity low threshold
    #[must_use]
    pub const fn was_ps_away(&self) -> bool {
        self.interrupt_flags.ps_away()
    }
}

#[cfg(not(feature = "async"))]
impl<I> Vcnl4040<I>
where
    I: Transport,
{
    /// Create a new VCNL4040 driver instance
    ///
    /// Reads the `ID` register and verifies it against [`DEVICE_ID`].
    /// The device powers up with both sensor cores shut down; enable them
    /// with [`set_als_power()`](Self::set_als_power) and
    /// [`set_ps_power()`](Self::set_ps_power).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `ID` register contains an unexpected value
    pub fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self {
            interface,
            interrupt_flags: InterruptFlags::default(),
        };

        let id = driver.get_id()?;
        if id != DEVICE_ID {
            return Err(Error::InvalidDevice(id));
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("VCNL4040 found, id {=u16:x}", id);

        Ok(driver)
    }

    /// Read the `ID` register
    ///
    /// Plain 16-bit read, no field decode; expected to be [`DEVICE_ID`]
    /// (0x0186).
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_id(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::Id)
    }

    // ==================== field-accessor engine ====================

    /// Read one 16-bit little-endian register
    fn read_register(&mut self, register: Register) -> Result<u16, Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.interface.read_register(register.addr(), &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Write one 16-bit little-endian register
    fn write_register(&mut self, register: Register, value: u16) -> Result<(), Error<I::Error>> {
        self.interface
            .write_register(register.addr(), &value.to_le_bytes())?;
        Ok(())
    }

    /// Replace the masked bits of a register, preserving the rest
    ///
    /// `value` is already shifted into field position and must not have
    /// bits outside `mask`; the check runs before any bus traffic so a
    /// rejected update leaves the device untouched. The read/write pair
    /// is not atomic.
    fn write_masked(
        &mut self,
        register: Register,
        mask: u16,
        value: u16,
    ) -> Result<(), Error<I::Error>> {
        if value & !mask != 0 {
            return Err(Error::InvalidFieldValue);
        }
        let current = self.read_register(register)?;
        self.write_register(register, (current & !mask) | value)
    }

    fn read_field(&mut self, field: &Field) -> Result<u16, Error<I::Error>> {
        Ok((self.read_register(field.register)? & field.mask) >> field.shift)
    }

    fn write_field(&mut self, field: &Field, raw: u16) -> Result<(), Error<I::Error>> {
        self.write_masked(field.register, field.mask, raw << field.shift)
    }

    /// Decode a table-driven field into its physical value
    fn read_table<const N: usize>(
        &mut self,
        table: &TableField<N>,
    ) -> Result<u16, Error<I::Error>> {
        let raw = self.read_field(&table.field)?;
        table
            .values
            .get(raw as usize)
            .copied()
            .ok_or(Error::UnknownEncoding(raw))
    }

    /// Encode a physical value through a table-driven field (exact match
    /// only, no rounding or clamping)
    fn write_table<const N: usize>(
        &mut self,
        table: &TableField<N>,
        value: u16,
    ) -> Result<(), Error<I::Error>> {
        match table.values.iter().position(|&v| v == value) {
            Some(index) => self.write_field(&table.field, index as u16),
            None => Err(Error::UnsupportedValue(value)),
        }
    }

    fn read_flag(&mut self, flag: &BitFlag) -> Result<bool, Error<I::Error>> {
        Ok(self.read_field(&flag.field)? == flag.active)
    }

    fn write_flag(&mut self, flag: &BitFlag, enabled: bool) -> Result<(), Error<I::Error>> {
        let raw = if enabled { flag.active } else { flag.active ^ 1 };
        self.write_field(&flag.field, raw)
    }

    // ==================== ambient light sensor ====================

    /// Power the ALS core on or off (`ALS_SD`, shutdown-active-low)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_als_power(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::ALS_POWER, enabled)
    }

    /// Whether the ALS core is powered
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_als_power(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::ALS_POWER)
    }

    /// Set the ALS integration time in milliseconds
    ///
    /// Supported values: 80, 160, 320, 640. Longer integration increases
    /// sensitivity (and lux resolution) at the cost of refresh rate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other value; nothing
    /// is written in that case.
    pub fn set_als_integration_time(&mut self, time_ms: u16) -> Result<(), Error<I::Error>> {
        self.write_table(&registers::ALS_INTEGRATION_TIME, time_ms)
    }

    /// Current ALS integration time in milliseconds
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_als_integration_time(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_table(&registers::ALS_INTEGRATION_TIME)
    }

    /// Set how many consecutive threshold crossings raise an ALS
    /// interrupt (`ALS_PERS`; 1, 2, 4 or 8)
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other count.
    pub fn set_als_persistence(&mut self, hits: u16) -> Result<(), Error<I::Error>> {
        self.write_table(&registers::ALS_PERSISTENCE, hits)
    }

    /// Current ALS interrupt persistence
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_als_persistence(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_table(&registers::ALS_PERSISTENCE)
    }

    /// Enable or disable the ALS threshold interrupt (`ALS_INT_EN`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_als_interrupt(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::ALS_INTERRUPT, enabled)
    }

    /// Whether the ALS threshold interrupt is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_als_interrupt(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::ALS_INTERRUPT)
    }

    /// Set the ALS interrupt high threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_als_high_threshold(&mut self, counts: u16) -> Result<(), Error<I::Error>> {
        self.write_register(Register::AlsHighThreshold, counts)
    }

    /// ALS interrupt high threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_als_high_threshold(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::AlsHighThreshold)
    }

    /// Set the ALS interrupt low threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_als_low_threshold(&mut self, counts: u16) -> Result<(), Error<I::Error>> {
        self.write_register(Register::AlsLowThreshold, counts)
    }

    /// ALS interrupt low threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_als_low_threshold(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::AlsLowThreshold)
    }

    /// Read the ambient light level in raw counts (`ALS_DATA`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_ambient_light(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::AlsData)
    }

    /// Read the ambient light level in lux
    ///
    /// Scales the raw count by the resolution of the currently configured
    /// integration time (0.1 lx/count at 80 ms, halving per doubling), so
    /// this costs two register reads.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_lux(&mut self) -> Result<f32, Error<I::Error>> {
        let integration_time = self.get_als_integration_time()?;
        let counts = self.read_register(Register::AlsData)?;
        Ok(f32::from(counts) * lux_resolution(integration_time))
    }

    /// Read the white channel in raw counts (`WHITE_DATA`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_white(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::WhiteData)
    }

    /// Power the white channel on or off (`WHITE_EN`, shutdown-active-low)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_white_power(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::WHITE_POWER, enabled)
    }

    /// Whether the white channel is powered
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_white_power(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::WHITE_POWER)
    }

    // ==================== proximity sensor ====================

    /// Power the proximity core on or off (`PS_SD`, shutdown-active-low)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ps_power(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::PS_POWER, enabled)
    }

    /// Whether the proximity core is powered
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_power(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::PS_POWER)
    }

    /// Set the IRED duty ratio denominator (`PS_DUTY`)
    ///
    /// Supported values: 40, 80, 160, 320 for duty ratios of 1/40 down
    /// to 1/320.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other denominator.
    pub fn set_ps_duty(&mut self, ratio: u16) -> Result<(), Error<I::Error>> {
        self.write_table(&registers::PS_DUTY, ratio)
    }

    /// Current IRED duty ratio denominator
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_duty(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_table(&registers::PS_DUTY)
    }

    /// Set the proximity integration time (`PS_IT`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ps_integration_time(
        &mut self,
        time: PsIntegrationTime,
    ) -> Result<(), Error<I::Error>> {
        self.write_field(&registers::PS_INTEGRATION_TIME, time.raw())
    }

    /// Current proximity integration time
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_integration_time(&mut self) -> Result<PsIntegrationTime, Error<I::Error>> {
        let raw = self.read_field(&registers::PS_INTEGRATION_TIME)?;
        PsIntegrationTime::from_raw(raw).ok_or(Error::UnknownEncoding(raw))
    }

    /// Set how many consecutive threshold crossings raise a proximity
    /// interrupt (`PS_PERS`; 1 to 4)
    ///
    /// The hardware stores `hits - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for counts outside 1..=4.
    pub fn set_ps_persistence(&mut self, hits: u16) -> Result<(), Error<I::Error>> {
        if !(1..=4).contains(&hits) {
            return Err(Error::UnsupportedValue(hits));
        }
        self.write_field(&registers::PS_PERSISTENCE, hits - 1)
    }

    /// Current proximity interrupt persistence (1 to 4 hits)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_persistence(&mut self) -> Result<u16, Error<I::Error>> {
        Ok(self.read_field(&registers::PS_PERSISTENCE)? + 1)
    }

    /// Set the number of IRED pulses per measurement (`PS_MPS`)
    ///
    /// Supported values: 1, 2, 4, 8.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other count.
    pub fn set_ps_multi_pulse(&mut self, pulses: u16) -> Result<(), Error<I::Error>> {
        self.write_table(&registers::PS_MULTI_PULSE, pulses)
    }

    /// Current number of IRED pulses per measurement
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_multi_pulse(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_table(&registers::PS_MULTI_PULSE)
    }

    /// Set the proximity output resolution in bits (`PS_HD`; 12 or 16)
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other width; nothing
    /// is written in that case.
    pub fn set_ps_resolution(&mut self, bits: u8) -> Result<(), Error<I::Error>> {
        let raw = match bits {
            12 => 0,
            16 => 1,
            _ => return Err(Error::UnsupportedValue(u16::from(bits))),
        };
        self.write_field(&registers::PS_RESOLUTION, raw)
    }

    /// Current proximity output resolution in bits (12 or 16)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_resolution(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(if self.read_field(&registers::PS_RESOLUTION)? == 0 {
            12
        } else {
            16
        })
    }

    /// Set the proximity interrupt trigger condition (`PS_INT`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ps_interrupt(
        &mut self,
        trigger: PsInterruptTrigger,
    ) -> Result<(), Error<I::Error>> {
        self.write_field(&registers::PS_INTERRUPT, trigger.raw())
    }

    /// Current proximity interrupt trigger condition
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_interrupt(&mut self) -> Result<PsInterruptTrigger, Error<I::Error>> {
        let raw = self.read_field(&registers::PS_INTERRUPT)?;
        PsInterruptTrigger::from_raw(raw).ok_or(Error::UnknownEncoding(raw))
    }

    /// Enable or disable smart persistence (`PS_SMART_PERS`)
    ///
    /// Shortens the interrupt response time while persistence is active.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ps_smart_persistence(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::PS_SMART_PERSISTENCE, enabled)
    }

    /// Whether smart persistence is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_smart_persistence(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::PS_SMART_PERSISTENCE)
    }

    /// Enable or disable active force mode (`PS_AF`)
    ///
    /// In active force mode the proximity sensor only measures when
    /// [`trigger_ps_measurement()`](Self::trigger_ps_measurement) is
    /// called.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ps_active_force(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::PS_ACTIVE_FORCE, enabled)
    }

    /// Whether active force mode is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_active_force(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::PS_ACTIVE_FORCE)
    }

    /// Trigger one proximity measurement cycle (`PS_TRIG`)
    ///
    /// Only meaningful in active force mode; the bit clears itself once
    /// the measurement finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn trigger_ps_measurement(&mut self) -> Result<(), Error<I::Error>> {
        self.write_field(&registers::PS_TRIGGER, 1)
    }

    /// Enable or disable sunlight cancellation (`PS_SC_EN`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ps_sun_cancellation(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::PS_SUN_CANCELLATION, enabled)
    }

    /// Whether sunlight cancellation is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_sun_cancellation(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::PS_SUN_CANCELLATION)
    }

    /// Set the proximity operation mode (`PS_MS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ps_mode(&mut self, mode: PsMode) -> Result<(), Error<I::Error>> {
        self.write_field(&registers::PS_MODE, mode.raw())
    }

    /// Current proximity operation mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_mode(&mut self) -> Result<PsMode, Error<I::Error>> {
        let raw = self.read_field(&registers::PS_MODE)?;
        PsMode::from_raw(raw).ok_or(Error::UnknownEncoding(raw))
    }

    /// Set the IRED current in milliamps (`LED_I`)
    ///
    /// Supported values: 50, 75, 100, 120, 140, 160, 180, 200.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other current; nothing
    /// is written in that case.
    pub fn set_ps_led_current(&mut self, current_ma: u16) -> Result<(), Error<I::Error>> {
        self.write_table(&registers::PS_LED_CURRENT, current_ma)
    }

    /// Current IRED current in milliamps
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_led_current(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_table(&registers::PS_LED_CURRENT)
    }

    /// Set the proximity cancellation level in raw counts (`PS_CANC`)
    ///
    /// Subtracted from every measurement to cancel crosstalk from cover
    /// glass reflections.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ps_cancellation(&mut self, counts: u16) -> Result<(), Error<I::Error>> {
        self.write_register(Register::PsCancellation, counts)
    }

    /// Proximity cancellation level in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_cancellation(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::PsCancellation)
    }

    /// Set the proximity interrupt low threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ps_low_threshold(&mut self, counts: u16) -> Result<(), Error<I::Error>> {
        self.write_register(Register::PsLowThreshold, counts)
    }

    /// Proximity interrupt low threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_low_threshold(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::PsLowThreshold)
    }

    /// Set the proximity interrupt high threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ps_high_threshold(&mut self, counts: u16) -> Result<(), Error<I::Error>> {
        self.write_register(Register::PsHighThreshold, counts)
    }

    /// Proximity interrupt high threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_ps_high_threshold(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::PsHighThreshold)
    }

    /// Read the proximity level in raw counts (`PS_DATA`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_proximity(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::PsData)
    }

    // ==================== interrupt capture ====================

    /// Capture the pending interrupt reasons and re-arm the interrupt
    ///
    /// Reads `INT_FLAG`, which clears the hardware latch and releases the
    /// INT pin, and stores the captured reasons for the `was_*`
    /// predicates and [`interrupt_flags()`](Self::interrupt_flags).
    /// The previous capture is overwritten, so interrogate all reasons of
    /// interest before calling this again.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset_interrupt(&mut self) -> Result<(), Error<I::Error>> {
        let raw = self.read_register(Register::InterruptFlags)?;
        self.interrupt_flags = InterruptFlags::from_raw(raw);

        #[cfg(feature = "defmt")]
        defmt::debug!("captured interrupt flags {=u16:x}", raw);

        Ok(())
    }
}


#[cfg(feature = "async")]
impl<I> Vcnl4040<I>
where
    I: AsyncTransport,
{
    /// Create a new VCNL4040 driver instance
    ///
    /// Reads the `ID` register and verifies it against [`DEVICE_ID`].
    /// The device powers up with both sensor cores shut down; enable them
    /// with [`set_als_power()`](Self::set_als_power) and
    /// [`set_ps_power()`](Self::set_ps_power).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `ID` register contains an unexpected value
    pub async fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self {
            interface,
            interrupt_flags: InterruptFlags::default(),
        };

        let id = driver.get_id().await?;
        if id != DEVICE_ID {
            return Err(Error::InvalidDevice(id));
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("VCNL4040 found, id {=u16:x}", id);

        Ok(driver)
    }

    /// Read the `ID` register
    ///
    /// Plain 16-bit read, no field decode; expected to be [`DEVICE_ID`]
    /// (0x0186).
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_id(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::Id).await
    }

    // ==================== field-accessor engine ====================

    async fn read_register(&mut self, register: Register) -> Result<u16, Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.interface.read_register(register.addr(), &mut buf).await?;
        Ok(u16::from_le_bytes(buf))
    }

    async fn write_register(
        &mut self,
        register: Register,
        value: u16,
    ) -> Result<(), Error<I::Error>> {
        self.interface
            .write_register(register.addr(), &value.to_le_bytes())
            .await?;
        Ok(())
    }

    /// Replace the masked bits of a register, preserving the rest
    ///
    /// `value` is already shifted into field position and must not have
    /// bits outside `mask`; the check runs before any bus traffic so a
    /// rejected update leaves the device untouched. The read/write pair
    /// is not atomic.
    async fn write_masked(
        &mut self,
        register: Register,
        mask: u16,
        value: u16,
    ) -> Result<(), Error<I::Error>> {
        if value & !mask != 0 {
            return Err(Error::InvalidFieldValue);
        }
        let current = self.read_register(register).await?;
        self.write_register(register, (current & !mask) | value).await
    }

    async fn read_field(&mut self, field: &Field) -> Result<u16, Error<I::Error>> {
        Ok((self.read_register(field.register).await? & field.mask) >> field.shift)
    }

    async fn write_field(&mut self, field: &Field, raw: u16) -> Result<(), Error<I::Error>> {
        self.write_masked(field.register, field.mask, raw << field.shift)
            .await
    }

    async fn read_table<const N: usize>(
        &mut self,
        table: &TableField<N>,
    ) -> Result<u16, Error<I::Error>> {
        let raw = self.read_field(&table.field).await?;
        table
            .values
            .get(raw as usize)
            .copied()
            .ok_or(Error::UnknownEncoding(raw))
    }

    async fn write_table<const N: usize>(
        &mut self,
        table: &TableField<N>,
        value: u16,
    ) -> Result<(), Error<I::Error>> {
        match table.values.iter().position(|&v| v == value) {
            Some(index) => self.write_field(&table.field, index as u16).await,
            None => Err(Error::UnsupportedValue(value)),
        }
    }

    async fn read_flag(&mut self, flag: &BitFlag) -> Result<bool, Error<I::Error>> {
        Ok(self.read_field(&flag.field).await? == flag.active)
    }

    async fn write_flag(&mut self, flag: &BitFlag, enabled: bool) -> Result<(), Error<I::Error>> {
        let raw = if enabled { flag.active } else { flag.active ^ 1 };
        self.write_field(&flag.field, raw).await
    }

    // ==================== ambient light sensor ====================

    /// Power the ALS core on or off (`ALS_SD`, shutdown-active-low)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_als_power(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::ALS_POWER, enabled).await
    }

    /// Whether the ALS core is powered
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_als_power(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::ALS_POWER).await
    }

    /// Set the ALS integration time in milliseconds
    ///
    /// Supported values: 80, 160, 320, 640.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other value; nothing
    /// is written in that case.
    pub async fn set_als_integration_time(&mut self, time_ms: u16) -> Result<(), Error<I::Error>> {
        self.write_table(&registers::ALS_INTEGRATION_TIME, time_ms)
            .await
    }

    /// Current ALS integration time in milliseconds
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_als_integration_time(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_table(&registers::ALS_INTEGRATION_TIME).await
    }

    /// Set how many consecutive threshold crossings raise an ALS
    /// interrupt (`ALS_PERS`; 1, 2, 4 or 8)
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other count.
    pub async fn set_als_persistence(&mut self, hits: u16) -> Result<(), Error<I::Error>> {
        self.write_table(&registers::ALS_PERSISTENCE, hits).await
    }

    /// Current ALS interrupt persistence
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_als_persistence(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_table(&registers::ALS_PERSISTENCE).await
    }

    /// Enable or disable the ALS threshold interrupt (`ALS_INT_EN`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_als_interrupt(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::ALS_INTERRUPT, enabled).await
    }

    /// Whether the ALS threshold interrupt is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_als_interrupt(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::ALS_INTERRUPT).await
    }

    /// Set the ALS interrupt high threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_als_high_threshold(&mut self, counts: u16) -> Result<(), Error<I::Error>> {
        self.write_register(Register::AlsHighThreshold, counts).await
    }

    /// ALS interrupt high threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_als_high_threshold(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::AlsHighThreshold).await
    }

    /// Set the ALS interrupt low threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_als_low_threshold(&mut self, counts: u16) -> Result<(), Error<I::Error>> {
        self.write_register(Register::AlsLowThreshold, counts).await
    }

    /// ALS interrupt low threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_als_low_threshold(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::AlsLowThreshold).await
    }

    /// Read the ambient light level in raw counts (`ALS_DATA`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_ambient_light(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::AlsData).await
    }

    /// Read the ambient light level in lux
    ///
    /// Scales the raw count by the resolution of the currently configured
    /// integration time (0.1 lx/count at 80 ms, halving per doubling), so
    /// this costs two register reads.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_lux(&mut self) -> Result<f32, Error<I::Error>> {
        let integration_time = self.get_als_integration_time().await?;
        let counts = self.read_register(Register::AlsData).await?;
        Ok(f32::from(counts) * lux_resolution(integration_time))
    }

    /// Read the white channel in raw counts (`WHITE_DATA`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_white(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::WhiteData).await
    }

    /// Power the white channel on or off (`WHITE_EN`, shutdown-active-low)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_white_power(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::WHITE_POWER, enabled).await
    }

    /// Whether the white channel is powered
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_white_power(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::WHITE_POWER).await
    }

    // ==================== proximity sensor ====================

    /// Power the proximity core on or off (`PS_SD`, shutdown-active-low)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_ps_power(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::PS_POWER, enabled).await
    }

    /// Whether the proximity core is powered
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_power(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::PS_POWER).await
    }

    /// Set the IRED duty ratio denominator (`PS_DUTY`)
    ///
    /// Supported values: 40, 80, 160, 320.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other denominator.
    pub async fn set_ps_duty(&mut self, ratio: u16) -> Result<(), Error<I::Error>> {
        self.write_table(&registers::PS_DUTY, ratio).await
    }

    /// Current IRED duty ratio denominator
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_duty(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_table(&registers::PS_DUTY).await
    }

    /// Set the proximity integration time (`PS_IT`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_ps_integration_time(
        &mut self,
        time: PsIntegrationTime,
    ) -> Result<(), Error<I::Error>> {
        self.write_field(&registers::PS_INTEGRATION_TIME, time.raw())
            .await
    }

    /// Current proximity integration time
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_integration_time(&mut self) -> Result<PsIntegrationTime, Error<I::Error>> {
        let raw = self.read_field(&registers::PS_INTEGRATION_TIME).await?;
        PsIntegrationTime::from_raw(raw).ok_or(Error::UnknownEncoding(raw))
    }

    /// Set how many consecutive threshold crossings raise a proximity
    /// interrupt (`PS_PERS`; 1 to 4)
    ///
    /// The hardware stores `hits - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for counts outside 1..=4.
    pub async fn set_ps_persistence(&mut self, hits: u16) -> Result<(), Error<I::Error>> {
        if !(1..=4).contains(&hits) {
            return Err(Error::UnsupportedValue(hits));
        }
        self.write_field(&registers::PS_PERSISTENCE, hits - 1).await
    }

    /// Current proximity interrupt persistence (1 to 4 hits)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_persistence(&mut self) -> Result<u16, Error<I::Error>> {
        Ok(self.read_field(&registers::PS_PERSISTENCE).await? + 1)
    }

    /// Set the number of IRED pulses per measurement (`PS_MPS`)
    ///
    /// Supported values: 1, 2, 4, 8.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other count.
    pub async fn set_ps_multi_pulse(&mut self, pulses: u16) -> Result<(), Error<I::Error>> {
        self.write_table(&registers::PS_MULTI_PULSE, pulses).await
    }

    /// Current number of IRED pulses per measurement
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_multi_pulse(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_table(&registers::PS_MULTI_PULSE).await
    }

    /// Set the proximity output resolution in bits (`PS_HD`; 12 or 16)
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other width; nothing
    /// is written in that case.
    pub async fn set_ps_resolution(&mut self, bits: u8) -> Result<(), Error<I::Error>> {
        let raw = match bits {
            12 => 0,
            16 => 1,
            _ => return Err(Error::UnsupportedValue(u16::from(bits))),
        };
        self.write_field(&registers::PS_RESOLUTION, raw).await
    }

    /// Current proximity output resolution in bits (12 or 16)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_resolution(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(
            if self.read_field(&registers::PS_RESOLUTION).await? == 0 {
                12
            } else {
                16
            },
        )
    }

    /// Set the proximity interrupt trigger condition (`PS_INT`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_ps_interrupt(
        &mut self,
        trigger: PsInterruptTrigger,
    ) -> Result<(), Error<I::Error>> {
        self.write_field(&registers::PS_INTERRUPT, trigger.raw())
            .await
    }

    /// Current proximity interrupt trigger condition
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_interrupt(&mut self) -> Result<PsInterruptTrigger, Error<I::Error>> {
        let raw = self.read_field(&registers::PS_INTERRUPT).await?;
        PsInterruptTrigger::from_raw(raw).ok_or(Error::UnknownEncoding(raw))
    }

    /// Enable or disable smart persistence (`PS_SMART_PERS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_ps_smart_persistence(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::PS_SMART_PERSISTENCE, enabled)
            .await
    }

    /// Whether smart persistence is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_smart_persistence(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::PS_SMART_PERSISTENCE).await
    }

    /// Enable or disable active force mode (`PS_AF`)
    ///
    /// In active force mode the proximity sensor only measures when
    /// [`trigger_ps_measurement()`](Self::trigger_ps_measurement) is
    /// called.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_ps_active_force(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::PS_ACTIVE_FORCE, enabled).await
    }

    /// Whether active force mode is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_active_force(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::PS_ACTIVE_FORCE).await
    }

    /// Trigger one proximity measurement cycle (`PS_TRIG`)
    ///
    /// Only meaningful in active force mode; the bit clears itself once
    /// the measurement finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn trigger_ps_measurement(&mut self) -> Result<(), Error<I::Error>> {
        self.write_field(&registers::PS_TRIGGER, 1).await
    }

    /// Enable or disable sunlight cancellation (`PS_SC_EN`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_ps_sun_cancellation(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.write_flag(&registers::PS_SUN_CANCELLATION, enabled)
            .await
    }

    /// Whether sunlight cancellation is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_sun_cancellation(&mut self) -> Result<bool, Error<I::Error>> {
        self.read_flag(&registers::PS_SUN_CANCELLATION).await
    }

    /// Set the proximity operation mode (`PS_MS`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_ps_mode(&mut self, mode: PsMode) -> Result<(), Error<I::Error>> {
        self.write_field(&registers::PS_MODE, mode.raw()).await
    }

    /// Current proximity operation mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_mode(&mut self) -> Result<PsMode, Error<I::Error>> {
        let raw = self.read_field(&registers::PS_MODE).await?;
        PsMode::from_raw(raw).ok_or(Error::UnknownEncoding(raw))
    }

    /// Set the IRED current in milliamps (`LED_I`)
    ///
    /// Supported values: 50, 75, 100, 120, 140, 160, 180, 200.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for any other current; nothing
    /// is written in that case.
    pub async fn set_ps_led_current(&mut self, current_ma: u16) -> Result<(), Error<I::Error>> {
        self.write_table(&registers::PS_LED_CURRENT, current_ma)
            .await
    }

    /// Current IRED current in milliamps
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_led_current(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_table(&registers::PS_LED_CURRENT).await
    }

    /// Set the proximity cancellation level in raw counts (`PS_CANC`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_ps_cancellation(&mut self, counts: u16) -> Result<(), Error<I::Error>> {
        self.write_register(Register::PsCancellation, counts).await
    }

    /// Proximity cancellation level in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_cancellation(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::PsCancellation).await
    }

    /// Set the proximity interrupt low threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_ps_low_threshold(&mut self, counts: u16) -> Result<(), Error<I::Error>> {
        self.write_register(Register::PsLowThreshold, counts).await
    }

    /// Proximity interrupt low threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_low_threshold(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::PsLowThreshold).await
    }

    /// Set the proximity interrupt high threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_ps_high_threshold(&mut self, counts: u16) -> Result<(), Error<I::Error>> {
        self.write_register(Register::PsHighThreshold, counts).await
    }

    /// Proximity interrupt high threshold in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_ps_high_threshold(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::PsHighThreshold).await
    }

    /// Read the proximity level in raw counts (`PS_DATA`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_proximity(&mut self) -> Result<u16, Error<I::Error>> {
        self.read_register(Register::PsData).await
    }

    // ==================== interrupt capture ====================

    /// Capture the pending interrupt reasons and re-arm the interrupt
    ///
    /// Reads `INT_FLAG`, which clears the hardware latch and releases the
    /// INT pin, and stores the captured reasons for the `was_*`
    /// predicates and [`interrupt_flags()`](Self::interrupt_flags).
    /// The previous capture is overwritten, so interrogate all reasons of
    /// interest before calling this again.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn reset_interrupt(&mut self) -> Result<(), Error<I::Error>> {
        let raw = self.read_register(Register::InterruptFlags).await?;
        self.interrupt_flags = InterruptFlags::from_raw(raw);

        #[cfg(feature = "defmt")]
        defmt::debug!("captured interrupt flags {=u16:x}", raw);

        Ok(())
    }
}
