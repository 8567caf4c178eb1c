//! Boot sequence ordering against a recording mock board.

use board_supervisor::config::{BootSequenceConfig, LinePresence, SupervisorConfig};
use board_supervisor::pins::Line;
use board_supervisor::Supervisor;
use embedded_hal::digital::PinState;

use crate::mock_hw::{Call, MockBoard, MockPeripherals};

fn full_config() -> SupervisorConfig {
    SupervisorConfig {
        boot: BootSequenceConfig {
            host_storage_bridge: true,
            lines: LinePresence::all(),
            ..BootSequenceConfig::default()
        },
        ..SupervisorConfig::default()
    }
}

#[test]
fn full_boot_hardware_order() {
    let sup = Supervisor::init(full_config(), MockBoard::new(1), MockPeripherals::default());
    let (board, peripherals) = sup.into_parts();

    assert_eq!(
        board.calls,
        vec![
            Call::Grouping(0x3),
            Call::Write(Line::BusSelect, PinState::High),
            Call::Write(Line::StatusLed, PinState::Low),
            Call::Write(Line::AuxControl, PinState::High),
            Call::DelayMs(10),
            Call::Write(Line::AuxControl, PinState::Low),
            Call::DelayMs(300),
            Call::Write(Line::AuxControl, PinState::High),
            Call::Write(Line::UsbConnect, PinState::High),
            Call::DelayMs(1_000),
            Call::Write(Line::UsbConnect, PinState::Low),
        ]
    );
    assert_eq!(
        peripherals.calls,
        vec!["usb_hook", "fault_logger", "host_storage"]
    );
}

#[test]
fn boot_never_arms_watchdog_or_resets() {
    let sup = Supervisor::init(full_config(), MockBoard::new(1), MockPeripherals::default());
    let board = sup.board();
    assert!(!board.calls.iter().any(|c| matches!(c, Call::Arm(_) | Call::Feed | Call::SystemReset)));
    assert!(!sup.watchdog_armed());
}

#[test]
fn minimal_boot_only_sets_priority_grouping() {
    let config = SupervisorConfig {
        boot: BootSequenceConfig::minimal(),
        ..SupervisorConfig::default()
    };
    let sup = Supervisor::init(config, MockBoard::new(1), MockPeripherals::default());
    let (board, peripherals) = sup.into_parts();
    assert_eq!(board.calls, vec![Call::Grouping(0x3)]);
    assert!(peripherals.calls.is_empty());
}

#[test]
fn sdio_leaves_bus_select_alone() {
    let mut config = full_config();
    config.boot.sdio_bus = true;
    let sup = Supervisor::init(config, MockBoard::new(1), MockPeripherals::default());
    assert!(sup.board().writes(Line::BusSelect).is_empty());
}

#[test]
fn inverted_usb_connect_pulses_low_then_high() {
    let mut config = full_config();
    config.boot.usb_connect_inverting = true;
    let sup = Supervisor::init(config, MockBoard::new(1), MockPeripherals::default());
    assert_eq!(
        sup.board().writes(Line::UsbConnect),
        vec![PinState::Low, PinState::High]
    );
}

#[test]
fn usb_hook_needs_both_parser_and_cdc() {
    let mut config = full_config();
    config.boot.usb_cdc = false;
    let sup = Supervisor::init(config, MockBoard::new(1), MockPeripherals::default());
    assert!(!sup.peripherals().calls.contains(&"usb_hook"));
}

#[test]
fn idle_hook_pumps_cdc_only_with_shared_media() {
    let mut config = full_config();
    config.boot.shared_media = true;
    let mut sup = Supervisor::init(config, MockBoard::new(1), MockPeripherals::default());
    let boot_calls = sup.board().calls.len();

    sup.idletask();
    sup.idletask();
    assert_eq!(sup.board().calls.len(), boot_calls);
    assert_eq!(
        &sup.peripherals().calls[3..],
        &[
            "resume_receive",
            "continue_transmit",
            "resume_receive",
            "continue_transmit"
        ]
    );

    let mut plain = Supervisor::init(full_config(), MockBoard::new(1), MockPeripherals::default());
    plain.idletask();
    assert_eq!(plain.peripherals().calls.len(), 3);
}
