//! Sensor-specific types and helpers
//!
//! Configuration values with a natural physical unit (milliseconds,
//! milliamps, hit counts) are passed to the driver as plain integers and
//! validated against the device's encoding tables. The types here cover
//! the settings that have no single-unit representation: the proximity
//! integration time (multiples of the T pulse width), the interrupt
//! trigger condition, and the proximity operation mode.

pub mod als;
pub mod proximity;

pub use als::lux_resolution;
pub use proximity::{PsIntegrationTime, PsInterruptTrigger, PsMode};
