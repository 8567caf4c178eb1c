//! Supervisor — the single owned lifecycle controller.
//!
//! [`Supervisor`] owns the board, the external-collaborator port, the
//! configuration and the watchdog state.  It is constructed exactly once by
//! [`Supervisor::init`], which runs the boot sequence; since `init` consumes
//! its inputs and no method re-runs the sequence, the boot-once contract is
//! enforced by ownership.  Code that needs to feed the watchdog or query the
//! reset cause is handed `&mut Supervisor`.
//!
//! ```text
//!  LinePort ────▶ ┌──────────────────────────────┐
//!  WatchdogPort ─▶│          Supervisor          │◀── PeripheralPort
//!  ResetPort ────▶│ boot · watchdog · reset · idle│
//!                 └──────────────────────────────┘
//! ```

use log::info;

use crate::config::SupervisorConfig;
use crate::drivers::reset::ResetCause;
use crate::drivers::watchdog::Watchdog;
use crate::drivers::{boot, idle, reset};

use super::ports::{Board, PeripheralPort};

pub struct Supervisor<B, P> {
    board: B,
    peripherals: P,
    config: SupervisorConfig,
    watchdog: Watchdog,
}

impl<B: Board, P: PeripheralPort> Supervisor<B, P> {
    /// Run the boot sequence and hand back the controller.
    ///
    /// The watchdog is left disarmed; call
    /// [`watchdog_init`](Self::watchdog_init) once the application is ready
    /// to refresh it.
    pub fn init(config: SupervisorConfig, mut board: B, mut peripherals: P) -> Self {
        info!("Supervisor: booting");
        boot::run(&config.boot, &mut board, &mut peripherals);
        Self {
            board,
            peripherals,
            watchdog: Watchdog::new(config.watchdog),
            config,
        }
    }

    // ── Idle / lifecycle ──────────────────────────────────────

    /// Main-loop idle hook.  Never blocks.
    pub fn idletask(&mut self) {
        idle::idletask(&self.config.boot, &mut self.peripherals);
    }

    /// Force an immediate full system reset.
    pub fn reboot(&mut self) {
        reset::reboot(&mut self.board);
    }

    /// Force a system reset into the external flashing mechanism.
    pub fn flash_firmware(&mut self, cause: i16) {
        reset::flash_firmware(&mut self.board, cause);
    }

    // ── Reset cause ───────────────────────────────────────────

    /// Re-read the latched reset cause.
    pub fn get_reset_source(&self) -> ResetCause {
        ResetCause::read(&self.board)
    }

    pub fn clear_reset_source(&mut self) {
        ResetCause::clear(&mut self.board);
    }

    // ── Watchdog ──────────────────────────────────────────────

    /// Arm the hardware watchdog (once; disabled configs do nothing).
    pub fn watchdog_init(&mut self) {
        self.watchdog.init(&mut self.board);
    }

    /// Feed the watchdog.  Safe no-op before it is armed.
    pub fn watchdog_refresh(&mut self) {
        self.watchdog.refresh(&mut self.board);
    }

    pub fn watchdog_armed(&self) -> bool {
        self.watchdog.is_armed()
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn peripherals(&self) -> &P {
        &self.peripherals
    }

    /// Tear down into the owned board and collaborator port.
    pub fn into_parts(self) -> (B, P) {
        (self.board, self.peripherals)
    }
}
