//! One-shot boot sequence.
//!
//! Brings every optional peripheral line into a known state in a fixed,
//! hardware-mandated order.  Called once from
//! [`Supervisor::init`](crate::app::service::Supervisor::init) before any
//! other component is used; it is not re-entrant (running it twice re-pulses
//! the handshake lines and can corrupt bus state).
//!
//! Order (MUST be respected):
//!   1. Interrupt priority grouping, before anything registers interrupts.
//!   2. Bus-select inactive, before any other SPI user starts.
//!   3. Status LED off.
//!   4. Auxiliary control handshake pulse (hard real-time delays).
//!   5. USB emergency-parser hook, before USB traffic can arrive.
//!   6. Fault logger, as early as possible.
//!   7. Host storage bridge.
//!   8. USB disconnect pulse for a clean re-enumeration; always last.
//!
//! No step can fail.  Absent hardware is skipped per
//! [`BootSequenceConfig`], never probed.

use embedded_hal::digital::PinState;
use log::{debug, info};

use crate::app::ports::{LinePort, PeripheralPort};
use crate::config::BootSequenceConfig;
use crate::pins::Line;

/// Priority grouping written first: every implemented priority bit selects
/// preemption priority, none select sub-priority.
pub const PRIORITY_GROUPING: u8 = 0x3;

/// Auxiliary handshake: HIGH hold before the LOW pulse.
pub const AUX_PULSE_HIGH_MS: u32 = 10;
/// Auxiliary handshake: LOW hold before the final HIGH.
pub const AUX_PULSE_LOW_MS: u32 = 300;
/// USB disconnect hold, long enough for an attached host to notice.
pub const USB_DISCONNECT_MS: u32 = 1_000;

/// Run the boot sequence against `board` and `peripherals`.
pub fn run(
    cfg: &BootSequenceConfig,
    board: &mut impl LinePort,
    peripherals: &mut impl PeripheralPort,
) {
    // 1. Priority grouping
    board.set_priority_grouping(PRIORITY_GROUPING);

    // 2. Shared bus: deselect storage before other SPI users start up
    if cfg.drives_bus_select() {
        board.write_line(Line::BusSelect, PinState::High);
        debug!("boot: bus-select driven inactive");
    }

    // 3. Status indicator off
    if cfg.lines.status_led {
        board.write_line(Line::StatusLed, PinState::Low);
    }

    // 4. Auxiliary handshake
    if cfg.lines.aux_control {
        board.write_line(Line::AuxControl, PinState::High);
        board.delay_ms(AUX_PULSE_HIGH_MS);
        board.write_line(Line::AuxControl, PinState::Low);
        board.delay_ms(AUX_PULSE_LOW_MS);
        board.write_line(Line::AuxControl, PinState::High);
        debug!("boot: aux-control handshake pulsed");
    }

    // 5. Emergency parser hook
    if cfg.installs_usb_hook() {
        peripherals.install_usb_hook();
    }

    // 6. Fault logger
    if cfg.fault_logger {
        peripherals.install_fault_logger();
    }

    // 7. Host storage bridge
    if cfg.host_storage_bridge {
        peripherals.init_host_storage();
    }

    // 8. USB re-enumeration
    if cfg.lines.usb_connect {
        let connect = PinState::from(cfg.usb_connect_inverting);
        board.write_line(Line::UsbConnect, !connect);
        board.delay_ms(USB_DISCONNECT_MS);
        board.write_line(Line::UsbConnect, connect);
        debug!("boot: usb-connect pulsed for re-enumeration");
    }

    info!("boot: sequence complete");
}
