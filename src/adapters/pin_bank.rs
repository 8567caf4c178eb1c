//! Named output lines backed by `embedded-hal` pins.
//!
//! A [`PinBank`] maps each [`Line`] to an optional [`OutputPin`].  Board
//! backends wire in the pins their hardware actually has; writes to a line
//! with no pin are ignored, and [`PinBank::presence`] reports the fitted set
//! so the boot configuration can be derived from the wiring instead of being
//! kept in sync by hand.

use embedded_hal::digital::{Error as _, OutputPin, PinState};
use log::warn;

use crate::config::LinePresence;
use crate::pins::Line;

pub struct PinBank<P> {
    pins: [Option<P>; 4],
}

impl<P: OutputPin> Default for PinBank<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin> PinBank<P> {
    /// Empty bank: no line fitted.
    pub fn new() -> Self {
        Self {
            pins: core::array::from_fn(|_| None),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, line: Line, pin: P) -> Self {
        self.insert(line, pin);
        self
    }

    /// Attach `pin` to `line`, returning any pin it replaces.
    pub fn insert(&mut self, line: Line, pin: P) -> Option<P> {
        self.pins[line.index()].replace(pin)
    }

    pub fn is_present(&self, line: Line) -> bool {
        self.pins[line.index()].is_some()
    }

    pub fn pin(&self, line: Line) -> Option<&P> {
        self.pins[line.index()].as_ref()
    }

    /// Drive `line`.  Absent lines are ignored; pin errors are logged and
    /// dropped since boot has no error path.
    pub fn write(&mut self, line: Line, state: PinState) {
        if let Some(pin) = self.pins[line.index()].as_mut() {
            if let Err(e) = pin.set_state(state) {
                warn!("{}: pin write failed ({:?})", line, e.kind());
            }
        }
    }

    /// Which lines have a pin attached.
    pub fn presence(&self) -> LinePresence {
        LinePresence {
            bus_select: self.is_present(Line::BusSelect),
            status_led: self.is_present(Line::StatusLed),
            aux_control: self.is_present(Line::AuxControl),
            usb_connect: self.is_present(Line::UsbConnect),
        }
    }
}
