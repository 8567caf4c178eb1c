//! Reboot, firmware-flash and reset-cause behaviour.

use board_supervisor::adapters::hooks::HookTable;
use board_supervisor::adapters::sim::{BoardOp, SimBoard};
use board_supervisor::config::SupervisorConfig;
use board_supervisor::{ResetCause, Supervisor};

use crate::mock_hw::{Call, MockBoard, MockPeripherals};

fn booted(cause: u8) -> Supervisor<MockBoard, MockPeripherals> {
    let mut sup = Supervisor::init(
        SupervisorConfig::default(),
        MockBoard::new(cause),
        MockPeripherals::default(),
    );
    sup.board_mut().calls.clear();
    sup
}

#[test]
fn reboot_issues_exactly_one_reset() {
    let mut sup = booted(ResetCause::POWER_ON);
    sup.reboot();
    assert_eq!(sup.board().calls, vec![Call::SystemReset]);
}

#[test]
fn flash_firmware_issues_exactly_one_reset_for_any_cause() {
    for cause in [-32_768i16, -1, 0, 1, 42, 32_767] {
        let mut sup = booted(ResetCause::POWER_ON);
        sup.flash_firmware(cause);
        assert_eq!(sup.board().calls, vec![Call::SystemReset]);
    }
}

#[test]
fn reboot_on_sim_latches_software_cause() {
    let mut sup = Supervisor::init(
        SupervisorConfig::default(),
        SimBoard::new(ResetCause::CLEARED),
        HookTable::new(),
    );
    sup.reboot();
    assert_eq!(sup.board().resets(), 1);
    assert_eq!(sup.board().trace().last(), Some(&BoardOp::SystemReset));
    assert_eq!(sup.get_reset_source().to_string(), "software");
}

#[test]
fn reset_source_is_stable_until_cleared() {
    let mut sup = booted(ResetCause::EXTERNAL | ResetCause::BROWN_OUT);
    let first = sup.get_reset_source();
    assert_eq!(sup.get_reset_source(), first);
    assert_eq!(first.to_string(), "external|brown-out");

    sup.clear_reset_source();
    assert_eq!(sup.get_reset_source(), ResetCause::CLEARED);
    assert_eq!(sup.get_reset_source().to_string(), "unknown");
    assert_eq!(sup.board().calls, vec![Call::ClearCause]);
}

#[test]
fn reading_reset_source_has_no_side_effects() {
    let sup = booted(ResetCause::WATCHDOG);
    for _ in 0..10 {
        let _ = sup.get_reset_source();
    }
    assert!(sup.board().calls.is_empty());
}
