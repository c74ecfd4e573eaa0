//! Unit tests for the physical-value / encoding translation tables

use crate::common::create_mock_driver;
use vcnl4040::{Error, PsIntegrationTime, PsInterruptTrigger, PsMode};

#[test]
fn test_als_integration_time_round_trip() {
    let (mut driver, _transport) = create_mock_driver();

    for ms in [80, 160, 320, 640] {
        driver.set_als_integration_time(ms).unwrap();
        assert_eq!(driver.get_als_integration_time().unwrap(), ms);
    }
}

#[test]
fn test_ps_duty_round_trip() {
    let (mut driver, _transport) = create_mock_driver();

    for ratio in [40, 80, 160, 320] {
        driver.set_ps_duty(ratio).unwrap();
        assert_eq!(driver.get_ps_duty().unwrap(), ratio);
    }
}

#[test]
fn test_led_current_round_trip() {
    let (mut driver, _transport) = create_mock_driver();

    for ma in [50, 75, 100, 120, 140, 160, 180, 200] {
        driver.set_ps_led_current(ma).unwrap();
        assert_eq!(driver.get_ps_led_current().unwrap(), ma);
    }
}

#[test]
fn test_led_current_200_encodes_as_index_7() {
    let (mut driver, transport) = create_mock_driver();

    driver.set_ps_led_current(200).unwrap();

    // table index 7 shifted into bits 10:8 of PS_CONF3/MS
    assert_eq!(transport.get_register(0x04) & 0b0000_0111_0000_0000, 7 << 8);
    assert_eq!(driver.get_ps_led_current().unwrap(), 200);
}

#[test]
fn test_unsupported_values_are_rejected_exactly() {
    let (mut driver, transport) = create_mock_driver();
    transport.clear_operations();

    // no rounding: 100 sits between 80 and 160 but is not encodable
    assert_eq!(
        driver.set_als_integration_time(100),
        Err(Error::UnsupportedValue(100))
    );
    // no clamping: 250 is above the highest LED current
    assert_eq!(
        driver.set_ps_led_current(250),
        Err(Error::UnsupportedValue(250))
    );
    assert_eq!(driver.set_ps_duty(0), Err(Error::UnsupportedValue(0)));
    assert_eq!(
        driver.set_als_persistence(3),
        Err(Error::UnsupportedValue(3))
    );

    assert_eq!(transport.write_count(), 0, "rejected values must not write");
}

#[test]
fn test_ps_persistence_offset_encoding() {
    let (mut driver, transport) = create_mock_driver();

    for hits in 1..=4 {
        driver.set_ps_persistence(hits).unwrap();
        // stored as hits - 1 in bits 5:4
        assert_eq!(
            (transport.get_register(0x03) & 0x0030) >> 4,
            hits - 1,
            "hits {hits}"
        );
        assert_eq!(driver.get_ps_persistence().unwrap(), hits);
    }
}

#[test]
fn test_ps_persistence_domain_is_checked() {
    let (mut driver, transport) = create_mock_driver();
    transport.clear_operations();

    assert_eq!(driver.set_ps_persistence(0), Err(Error::UnsupportedValue(0)));
    assert_eq!(driver.set_ps_persistence(5), Err(Error::UnsupportedValue(5)));
    assert_eq!(transport.write_count(), 0);
}

#[test]
fn test_ps_resolution_mapping() {
    let (mut driver, transport) = create_mock_driver();

    driver.set_ps_resolution(16).unwrap();
    assert_ne!(transport.get_register(0x03) & 0x0800, 0);
    assert_eq!(driver.get_ps_resolution().unwrap(), 16);

    driver.set_ps_resolution(12).unwrap();
    assert_eq!(transport.get_register(0x03) & 0x0800, 0);
    assert_eq!(driver.get_ps_resolution().unwrap(), 12);
}

#[test]
fn test_ps_integration_time_round_trip() {
    let (mut driver, _transport) = create_mock_driver();

    for time in [
        PsIntegrationTime::T1,
        PsIntegrationTime::T1_5,
        PsIntegrationTime::T2,
        PsIntegrationTime::T2_5,
        PsIntegrationTime::T3,
        PsIntegrationTime::T3_5,
        PsIntegrationTime::T4,
        PsIntegrationTime::T8,
    ] {
        driver.set_ps_integration_time(time).unwrap();
        assert_eq!(driver.get_ps_integration_time().unwrap(), time);
    }
}

#[test]
fn test_ps_interrupt_trigger_round_trip() {
    let (mut driver, _transport) = create_mock_driver();

    for trigger in [
        PsInterruptTrigger::Disabled,
        PsInterruptTrigger::Close,
        PsInterruptTrigger::Away,
        PsInterruptTrigger::CloseOrAway,
    ] {
        driver.set_ps_interrupt(trigger).unwrap();
        assert_eq!(driver.get_ps_interrupt().unwrap(), trigger);
    }
}

#[test]
fn test_ps_mode_round_trip() {
    let (mut driver, _transport) = create_mock_driver();

    driver.set_ps_mode(PsMode::LogicOutput).unwrap();
    assert_eq!(driver.get_ps_mode().unwrap(), PsMode::LogicOutput);

    driver.set_ps_mode(PsMode::Interrupt).unwrap();
    assert_eq!(driver.get_ps_mode().unwrap(), PsMode::Interrupt);
}

#[test]
fn test_ps_multi_pulse_round_trip() {
    let (mut driver, transport) = create_mock_driver();

    for pulses in [1, 2, 4, 8] {
        driver.set_ps_multi_pulse(pulses).unwrap();
        assert_eq!(driver.get_ps_multi_pulse().unwrap(), pulses);
    }

    transport.clear_operations();
    assert_eq!(
        driver.set_ps_multi_pulse(3),
        Err(Error::UnsupportedValue(3))
    );
    assert_eq!(transport.write_count(), 0);
}

#[test]
fn test_decode_ignores_foreign_bits_in_the_register() {
    let (mut driver, transport) = create_mock_driver();

    // every other bit of PS_CONF3/MS set; LED_I = index 2 (100 mA)
    transport.set_register(0x04, !0x0700 | (2 << 8));

    assert_eq!(driver.get_ps_led_current().unwrap(), 100);
}
