//! Bus interface for the VCNL4040
//!
//! The driver talks to the sensor through the [`Transport`] trait (and
//! [`AsyncTransport`] with the `async` feature), which moves raw bytes to
//! and from a register address. [`I2cInterface`] implements the trait over
//! the `embedded-hal` I2C traits.

use crate::I2C_ADDRESS;

/// Byte-level register transport
///
/// Every VCNL4040 register is 16 bits wide and is transferred as exactly
/// two bytes, low byte first. The transport is synchronous and blocking;
/// timeouts and retries are the implementation's responsibility.
pub trait Transport {
    /// Transport error type, surfaced unchanged through [`crate::Error::Bus`]
    type Error;

    /// Read `buf.len()` bytes starting at a register address
    fn read_register(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` starting at a register address
    fn write_register(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Async byte-level register transport
///
/// Same contract as [`Transport`], over `embedded-hal-async`.
#[cfg(feature = "async")]
pub trait AsyncTransport {
    /// Transport error type, surfaced unchanged through [`crate::Error::Bus`]
    type Error;

    /// Read `buf.len()` bytes starting at a register address
    async fn read_register(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` starting at a register address
    async fn write_register(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// I2C interface for the VCNL4040
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface with the fixed device address (0x60)
    ///
    /// The VCNL4040 has no address-select pin, so this is the right
    /// constructor for any directly-attached device.
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut sensor = Vcnl4040::new(interface)?;
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS,
        }
    }

    /// Create a new I2C interface with a custom device address
    ///
    /// Useful behind an address translator or multiplexer; for a
    /// directly-attached sensor prefer [`default()`](Self::default).
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `address` - The I2C device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Transport for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;

    fn read_register(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], buf)
    }

    fn write_register(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        // Command code followed by the data bytes in one transaction
        let mut buffer = [0u8; 3]; // 1 address + 2 data bytes
        buffer[0] = address;
        let len = data.len().min(2);
        buffer[1..=len].copy_from_slice(&data[..len]);

        self.i2c.write(self.address, &buffer[..=len])
    }
}

#[cfg(feature = "async")]
impl<I2C, E> AsyncTransport for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;

    async fn read_register(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], buf).await
    }

    async fn write_register(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        // Command code followed by the data bytes in one transaction
        let mut buffer = [0u8; 3]; // 1 address + 2 data bytes
        buffer[0] = address;
        let len = data.len().min(2);
        buffer[1..=len].copy_from_slice(&data[..len]);

        self.i2c.write(self.address, &buffer[..=len]).await
    }
}
