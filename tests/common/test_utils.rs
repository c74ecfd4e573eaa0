//! Test utilities and helper functions

use crate::common::mock_interface::MockTransport;
use vcnl4040::Vcnl4040;

/// Create a mock driver for testing
/// Returns (driver, transport) where transport is a clone that shares
/// state with the driver
pub fn create_mock_driver() -> (Vcnl4040<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    let transport_clone = transport.clone();
    let driver = Vcnl4040::new(transport).expect("Failed to create mock driver");
    (driver, transport_clone)
}

/// Assert that two floating point values are approximately equal
#[allow(dead_code)]
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
