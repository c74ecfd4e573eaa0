//! Ambient light sensor helpers

/// ALS resolution in lux per count for a given integration time
///
/// The sensor resolves 0.1 lx/count at the 80 ms integration time; each
/// doubling of the integration time halves the step (640 ms resolves
/// 0.0125 lx/count). Used by [`crate::Vcnl4040::read_lux`] to scale the
/// raw `ALS_DATA` count.
///
/// # Arguments
///
/// * `integration_time_ms` - ALS integration time in milliseconds
///   (80, 160, 320 or 640)
#[must_use]
pub const fn lux_resolution(integration_time_ms: u16) -> f32 {
    8.0 / integration_time_ms as f32
}
