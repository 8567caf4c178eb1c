//! Independent watchdog arbitration.
//!
//! Wraps the board's hardware countdown with an `armed` flag.  Until
//! [`Watchdog::init`] has armed the timer, [`Watchdog::refresh`] is a safe
//! no-op that never touches hardware, so call sites may refresh
//! unconditionally.
//!
//! Once armed, the main loop must call `refresh()` more often than the
//! configured timeout.  If it stops (infinite loop, deadlock, stuck ISR) the
//! hardware forces a full system reset; there is no logging or
//! escalation step before that reset.

use log::{info, warn};

use crate::app::ports::WatchdogPort;
use crate::config::WatchdogConfig;

pub struct Watchdog {
    config: WatchdogConfig,
    armed: bool,
}

impl Watchdog {
    /// Disarmed watchdog; no hardware is touched until [`init`](Self::init).
    pub const fn new(config: WatchdogConfig) -> Self {
        Self {
            config,
            armed: false,
        }
    }

    /// Arm the hardware countdown with the configured timeout.
    ///
    /// Does nothing when the watchdog is disabled in configuration.  A second
    /// call while armed is ignored: the hardware is armed exactly once.
    pub fn init(&mut self, port: &mut impl WatchdogPort) {
        if !self.config.enabled {
            info!("Watchdog: disabled by configuration");
            return;
        }
        if self.armed {
            warn!("Watchdog: already armed, ignoring repeated init");
            return;
        }

        port.arm(self.config.timeout.as_micros());
        self.armed = true;
        info!(
            "Watchdog: armed ({}ms timeout)",
            self.config.timeout.as_millis()
        );
    }

    /// Feed the watchdog.  No-op until armed.
    pub fn refresh(&self, port: &mut impl WatchdogPort) {
        if !self.armed {
            return;
        }
        port.feed();
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
