//! Named control lines and their pin assignments on the main board.
//!
//! Single source of truth: the boot sequencer and every board backend refer
//! to lines by [`Line`] rather than hard-coding pin numbers.  Whether a line
//! exists on a given build is decided by
//! [`LinePresence`](crate::config::LinePresence), not here.

/// Every optional output line the supervisor drives during boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// Chip-select of the storage device on the shared SPI bus (active LOW).
    BusSelect,
    /// Status indicator LED (active HIGH).
    StatusLed,
    /// Auxiliary control line to external hardware (handshake pulse at boot).
    AuxControl,
    /// USB D+ pull-up / connect control.
    UsbConnect,
}

impl Line {
    /// All lines, in boot-sequence order.
    pub const ALL: [Line; 4] = [
        Line::BusSelect,
        Line::StatusLed,
        Line::AuxControl,
        Line::UsbConnect,
    ];

    /// Dense index for per-line tables.
    pub const fn index(self) -> usize {
        match self {
            Line::BusSelect => 0,
            Line::StatusLed => 1,
            Line::AuxControl => 2,
            Line::UsbConnect => 3,
        }
    }

    /// Short name used in log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Line::BusSelect => "bus-select",
            Line::StatusLed => "status-led",
            Line::AuxControl => "aux-control",
            Line::UsbConnect => "usb-connect",
        }
    }
}

impl core::fmt::Display for Line {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// GPIO assignments (ESP32-S3 main board)
// ---------------------------------------------------------------------------

/// SD card chip-select on SPI2.
pub const BUS_SELECT_GPIO: i32 = 10;
/// Green status LED.
pub const STATUS_LED_GPIO: i32 = 38;
/// Auxiliary control line (probe / expansion handshake).
pub const AUX_CONTROL_GPIO: i32 = 4;
/// External USB D+ pull-up enable.
pub const USB_CONNECT_GPIO: i32 = 5;

/// GPIO number for `line` on the main board.
pub const fn gpio(line: Line) -> i32 {
    match line {
        Line::BusSelect => BUS_SELECT_GPIO,
        Line::StatusLed => STATUS_LED_GPIO,
        Line::AuxControl => AUX_CONTROL_GPIO,
        Line::UsbConnect => USB_CONNECT_GPIO,
    }
}
