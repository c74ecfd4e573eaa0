//! Unit tests for the masked read-modify-write engine

use crate::common::create_mock_driver;

#[test]
fn test_field_update_preserves_other_bits() {
    let (mut driver, transport) = create_mock_driver();

    // Fill PS_CONF3/MS (0x04) with a busy pattern outside the LED_I field
    transport.set_register(0x04, 0b1010_1000_0101_1001);

    // LED_I occupies bits 10:8; 75 mA encodes as index 1
    driver.set_ps_led_current(75).unwrap();

    let after = transport.get_register(0x04);
    assert_eq!(after & !0x0700, 0b1010_1000_0101_1001 & !0x0700);
    assert_eq!(after & 0x0700, 1 << 8);
}

#[test]
fn test_low_byte_update_preserves_high_byte() {
    let (mut driver, transport) = create_mock_driver();

    // PS_CONF2 (high byte of 0x03): 16-bit resolution, interrupt on both
    transport.set_register(0x03, 0x0B01);

    // PS_SD is bit 0 in the low byte
    driver.set_ps_power(true).unwrap();

    assert_eq!(transport.get_register(0x03), 0x0B00);
}

#[test]
fn test_high_byte_update_preserves_low_byte() {
    let (mut driver, transport) = create_mock_driver();

    // PS_CONF1 (low byte of 0x03): duty 1/320, persistence 4, powered
    transport.set_register(0x03, 0x00F0);

    driver.set_ps_resolution(16).unwrap();

    assert_eq!(transport.get_register(0x03), 0x08F0);
}

#[test]
fn test_adjacent_fields_in_one_byte_stay_independent() {
    let (mut driver, transport) = create_mock_driver();

    driver.set_als_integration_time(640).unwrap();
    driver.set_als_persistence(8).unwrap();
    driver.set_als_interrupt(true).unwrap();
    driver.set_als_power(true).unwrap();

    // IT=3 (bits 7:6), PERS=3 (bits 3:2), INT_EN=1 (bit 1), SD=0 (bit 0)
    assert_eq!(transport.get_register(0x00), 0x00C0 | 0x000C | 0x0002);

    // rewriting one field leaves the others alone
    driver.set_als_integration_time(80).unwrap();
    assert_eq!(transport.get_register(0x00), 0x000C | 0x0002);
    assert_eq!(driver.get_als_persistence().unwrap(), 8);
    assert!(driver.get_als_interrupt().unwrap());
}

#[test]
fn test_rejected_value_performs_no_write() {
    let (mut driver, transport) = create_mock_driver();
    transport.clear_operations();

    let before = transport.get_register(0x03);
    let result = driver.set_ps_resolution(10);

    assert!(result.is_err(), "resolution 10 must be rejected");
    assert_eq!(transport.write_count(), 0, "no hardware write may occur");
    assert_eq!(transport.get_register(0x03), before);
}

#[test]
fn test_full_register_writes_pass_through() {
    let (mut driver, transport) = create_mock_driver();

    driver.set_als_high_threshold(0xABCD).unwrap();
    driver.set_als_low_threshold(0x1234).unwrap();
    driver.set_ps_cancellation(0xFFFF).unwrap();
    driver.set_ps_low_threshold(0x0100).unwrap();
    driver.set_ps_high_threshold(0xFEDC).unwrap();

    assert_eq!(transport.get_register(0x01), 0xABCD);
    assert_eq!(transport.get_register(0x02), 0x1234);
    assert_eq!(transport.get_register(0x05), 0xFFFF);
    assert_eq!(transport.get_register(0x06), 0x0100);
    assert_eq!(transport.get_register(0x07), 0xFEDC);

    assert_eq!(driver.get_als_high_threshold().unwrap(), 0xABCD);
    assert_eq!(driver.get_ps_high_threshold().unwrap(), 0xFEDC);
}

#[test]
fn test_update_is_one_read_one_write() {
    let (mut driver, transport) = create_mock_driver();
    transport.clear_operations();

    driver.set_ps_duty(160).unwrap();

    let ops = transport.operations();
    assert_eq!(ops.len(), 2);
    assert!(matches!(
        ops[0],
        crate::common::Operation::ReadRegister { address: 0x03, .. }
    ));
    assert!(matches!(
        ops[1],
        crate::common::Operation::WriteRegister { address: 0x03, .. }
    ));
}
