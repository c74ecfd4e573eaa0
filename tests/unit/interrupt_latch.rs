//! Unit tests for the interrupt capture latch

use crate::common::create_mock_driver;

const PS_SPFLAG: u16 = 0x4000;
const ALS_IF_L: u16 = 0x2000;
const ALS_IF_H: u16 = 0x1000;
const PS_IF_CLOSE: u16 = 0x0200;
const PS_IF_AWAY: u16 = 0x0100;

#[test]
fn test_no_reasons_before_first_capture() {
    let (driver, _transport) = create_mock_driver();

    assert!(!driver.was_ps_protection_mode());
    assert!(!driver.was_als_low());
    assert!(!driver.was_als_high());
    assert!(!driver.was_ps_close());
    assert!(!driver.was_ps_away());
    assert!(!driver.interrupt_flags().any_set());
}

#[test]
fn test_predicates_are_independent() {
    let (mut driver, transport) = create_mock_driver();

    transport.set_interrupt_flags(ALS_IF_H);
    driver.reset_interrupt().unwrap();

    assert!(driver.was_als_high());
    assert!(!driver.was_als_low());
    assert!(!driver.was_ps_protection_mode());
    assert!(!driver.was_ps_close());
    assert!(!driver.was_ps_away());
}

#[test]
fn test_multiple_reasons_in_one_capture() {
    let (mut driver, transport) = create_mock_driver();

    transport.set_interrupt_flags(PS_IF_CLOSE | ALS_IF_L | PS_SPFLAG);
    driver.reset_interrupt().unwrap();

    assert!(driver.was_ps_close());
    assert!(driver.was_als_low());
    assert!(driver.was_ps_protection_mode());
    assert!(!driver.was_als_high());
    assert!(!driver.was_ps_away());
}

#[test]
fn test_rearm_discards_previous_capture() {
    let (mut driver, transport) = create_mock_driver();

    transport.set_interrupt_flags(ALS_IF_H);
    driver.reset_interrupt().unwrap();
    assert!(driver.was_als_high());

    transport.set_interrupt_flags(PS_IF_AWAY);
    driver.reset_interrupt().unwrap();

    // only the second capture's reasons remain
    assert!(driver.was_ps_away());
    assert!(!driver.was_als_high());
}

#[test]
fn test_capture_clears_the_hardware_latch() {
    let (mut driver, transport) = create_mock_driver();

    transport.set_interrupt_flags(PS_IF_CLOSE);
    driver.reset_interrupt().unwrap();
    assert!(driver.was_ps_close());
    assert_eq!(transport.get_register(0x0B), 0, "INT_FLAG clears on read");

    // no new event since the capture: re-arming finds nothing
    driver.reset_interrupt().unwrap();
    assert!(!driver.was_ps_close());
    assert!(!driver.interrupt_flags().any_set());
}

#[test]
fn test_predicates_do_not_touch_the_bus() {
    let (mut driver, transport) = create_mock_driver();

    transport.set_interrupt_flags(ALS_IF_L);
    driver.reset_interrupt().unwrap();
    transport.clear_operations();

    let _ = driver.was_als_low();
    let _ = driver.was_ps_close();
    let _ = driver.interrupt_flags();

    assert!(
        transport.operations().is_empty(),
        "predicates must read the cached capture only"
    );
}
