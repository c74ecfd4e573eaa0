//! Unit tests for device identity

use crate::common::mock_interface::MockTransport;
use crate::common::create_mock_driver;
use vcnl4040::interface::Transport;
use vcnl4040::{Error, Vcnl4040, DEVICE_ID};

#[test]
fn test_id_is_assembled_little_endian() {
    // the mock serves the ID register as the byte sequence [0x86, 0x01]
    let mut transport = MockTransport::new();
    let mut buf = [0u8; 2];
    transport.read_register(0x0C, &mut buf).unwrap();
    assert_eq!(buf, [0x86, 0x01]);

    let (mut driver, _transport) = create_mock_driver();
    assert_eq!(driver.get_id().unwrap(), 0x0186);
    assert_eq!(driver.get_id().unwrap(), DEVICE_ID);
}

#[test]
fn test_new_rejects_wrong_device() {
    let transport = MockTransport::new();
    transport.set_device_id(0x0188);

    match Vcnl4040::new(transport) {
        Err(Error::InvalidDevice(actual)) => assert_eq!(actual, 0x0188),
        Err(other) => panic!("expected InvalidDevice, got {other:?}"),
        Ok(_) => panic!("expected InvalidDevice, got a driver"),
    }
}

#[test]
fn test_new_propagates_bus_errors() {
    let transport = MockTransport::new();
    transport.fail_next_read();

    assert!(matches!(Vcnl4040::new(transport), Err(Error::Bus(_))));
}
