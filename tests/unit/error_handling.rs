//! Unit tests for error propagation and recovery

use crate::common::create_mock_driver;
use vcnl4040::Error;

#[test]
fn test_read_failure_propagates() {
    let (mut driver, transport) = create_mock_driver();

    transport.fail_next_read();

    let result = driver.read_proximity();
    assert!(matches!(result, Err(Error::Bus(_))));
}

#[test]
fn test_read_failure_recovery() {
    let (mut driver, transport) = create_mock_driver();

    transport.fail_next_read();
    assert!(driver.read_ambient_light().is_err());

    // the failure was consumed; the next read succeeds
    transport.set_register(0x09, 1234);
    assert_eq!(driver.read_ambient_light().unwrap(), 1234);
}

#[test]
fn test_write_failure_propagates() {
    let (mut driver, transport) = create_mock_driver();

    transport.fail_next_write();

    let result = driver.set_ps_led_current(100);
    assert!(matches!(result, Err(Error::Bus(_))));
}

#[test]
fn test_failed_masked_update_reads_before_writing() {
    let (mut driver, transport) = create_mock_driver();

    // failing the read aborts the update before the write half
    transport.set_register(0x04, 0x0700);
    transport.clear_operations();
    transport.fail_next_read();

    assert!(driver.set_ps_led_current(50).is_err());
    assert_eq!(transport.write_count(), 0);
    assert_eq!(transport.get_register(0x04), 0x0700, "register unchanged");
}

#[test]
fn test_multiple_failures_in_sequence() {
    let (mut driver, transport) = create_mock_driver();

    for _ in 0..3 {
        transport.fail_next_read();
        assert!(driver.read_proximity().is_err());
    }

    transport.set_register(0x08, 77);
    assert_eq!(driver.read_proximity().unwrap(), 77);
}

#[test]
fn test_failure_does_not_corrupt_the_latch() {
    let (mut driver, transport) = create_mock_driver();

    transport.set_interrupt_flags(0x1000);
    driver.reset_interrupt().unwrap();
    assert!(driver.was_als_high());

    // a failed re-capture keeps the previous capture intact
    transport.fail_next_read();
    assert!(driver.reset_interrupt().is_err());
    assert!(driver.was_als_high());
}
