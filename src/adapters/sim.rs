//! Host simulation board.
//!
//! Implements every board port against a virtual microsecond clock so the
//! supervisor's ordering and timing behaviour can be exercised without
//! hardware.  The clock only moves when the firmware busy-waits (through
//! [`DelayNs`]) or when a test calls [`SimBoard::advance_ms`].
//!
//! The simulated independent watchdog behaves like the real one: once armed
//! it counts down from the timeout, every feed reloads it, and reaching zero
//! forces a reset that latches [`ResetCause::WATCHDOG`].  After any reset the
//! board is back in its power-on state (lines undriven, watchdog stopped);
//! tests model the next boot by running
//! [`Supervisor::init`](crate::app::service::Supervisor::init) again over the
//! same board.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::{debug, warn};

use crate::app::ports::{LinePort, ResetPort, WatchdogPort};
use crate::drivers::reset::ResetCause;
use crate::pins::Line;

/// One observable hardware operation, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOp {
    PriorityGrouping(u8),
    Line(Line, PinState),
    Delay(Duration),
    WatchdogArm { timeout_us: u32 },
    WatchdogFeed,
    /// Software-requested reset.
    SystemReset,
    /// Reset forced by the watchdog countdown reaching zero.
    WatchdogReset,
}

#[derive(Debug, Clone, Copy)]
struct SimWatchdog {
    timeout_us: u32,
    deadline_us: u64,
}

pub struct SimBoard {
    now_us: u64,
    /// Sub-microsecond delay remainder.
    pending_ns: u32,
    latched_cause: u8,
    watchdog: Option<SimWatchdog>,
    lines: [Option<PinState>; 4],
    resets: u32,
    watchdog_resets: u32,
    trace: Vec<BoardOp>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new(ResetCause::from_raw(ResetCause::POWER_ON))
    }
}

impl SimBoard {
    /// Fresh board whose reset latch holds `cause`.
    pub fn new(cause: ResetCause) -> Self {
        Self {
            now_us: 0,
            pending_ns: 0,
            latched_cause: cause.raw(),
            watchdog: None,
            lines: [None; 4],
            resets: 0,
            watchdog_resets: 0,
            trace: Vec::new(),
        }
    }

    // ── Clock ─────────────────────────────────────────────────

    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    /// Let time pass without the firmware doing anything (a hang, or the
    /// gap between main-loop passes).
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance_us(ms * 1_000);
    }

    pub fn advance_us(&mut self, us: u64) {
        let target = self.now_us + us;
        if let Some(wdt) = self.watchdog {
            if target >= wdt.deadline_us {
                self.now_us = wdt.deadline_us;
                self.watchdog_expired();
            }
        }
        self.now_us = target;
    }

    // ── Observation ───────────────────────────────────────────

    /// Every hardware operation since construction or [`clear_trace`](Self::clear_trace).
    pub fn trace(&self) -> &[BoardOp] {
        &self.trace
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Operations on a single line, with the delays between them.
    pub fn line_trace(&self, line: Line) -> Vec<BoardOp> {
        let mut out = Vec::new();
        for op in &self.trace {
            match op {
                BoardOp::Line(l, _) if *l == line => out.push(*op),
                BoardOp::Delay(_) if !out.is_empty() => out.push(*op),
                _ => {}
            }
        }
        // Drop delays that followed the line's last write.
        while matches!(out.last(), Some(BoardOp::Delay(_))) {
            out.pop();
        }
        out
    }

    /// Last level driven on `line`; `None` if undriven since power-on.
    pub fn line_state(&self, line: Line) -> Option<PinState> {
        self.lines[line.index()]
    }

    /// Resets of any kind.
    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn watchdog_resets(&self) -> u32 {
        self.watchdog_resets
    }

    pub fn watchdog_running(&self) -> bool {
        self.watchdog.is_some()
    }

    /// Microseconds left before the watchdog fires.
    pub fn watchdog_remaining_us(&self) -> Option<u64> {
        self.watchdog
            .map(|w| w.deadline_us.saturating_sub(self.now_us))
    }

    // ── Internal ──────────────────────────────────────────────

    fn watchdog_expired(&mut self) {
        warn!("sim: watchdog expired at t={}us, resetting", self.now_us);
        self.trace.push(BoardOp::WatchdogReset);
        self.watchdog_resets += 1;
        self.hardware_reset(ResetCause::WATCHDOG);
    }

    fn hardware_reset(&mut self, flag: u8) {
        self.resets += 1;
        self.latched_cause |= flag;
        self.watchdog = None;
        self.lines = [None; 4];
    }
}

impl DelayNs for SimBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.trace
            .push(BoardOp::Delay(Duration::from_nanos(u64::from(ns))));
        let total = u64::from(self.pending_ns) + u64::from(ns);
        self.pending_ns = (total % 1_000) as u32;
        self.advance_us(total / 1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.trace
            .push(BoardOp::Delay(Duration::from_micros(u64::from(us))));
        self.advance_us(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.trace
            .push(BoardOp::Delay(Duration::from_millis(u64::from(ms))));
        self.advance_ms(u64::from(ms));
    }
}

impl LinePort for SimBoard {
    fn set_priority_grouping(&mut self, grouping: u8) {
        self.trace.push(BoardOp::PriorityGrouping(grouping));
    }

    fn write_line(&mut self, line: Line, state: PinState) {
        self.trace.push(BoardOp::Line(line, state));
        self.lines[line.index()] = Some(state);
    }
}

impl WatchdogPort for SimBoard {
    fn arm(&mut self, timeout_us: u32) {
        self.trace.push(BoardOp::WatchdogArm { timeout_us });
        self.watchdog = Some(SimWatchdog {
            timeout_us,
            deadline_us: self.now_us + u64::from(timeout_us),
        });
        debug!("sim: watchdog armed ({}us)", timeout_us);
    }

    fn feed(&mut self) {
        self.trace.push(BoardOp::WatchdogFeed);
        if let Some(wdt) = self.watchdog.as_mut() {
            wdt.deadline_us = self.now_us + u64::from(wdt.timeout_us);
        }
    }
}

impl ResetPort for SimBoard {
    fn reset_cause(&self) -> u8 {
        self.latched_cause
    }

    fn clear_reset_cause(&mut self) {
        self.latched_cause = 0;
    }

    fn system_reset(&mut self) {
        self.trace.push(BoardOp::SystemReset);
        self.hardware_reset(ResetCause::SOFTWARE);
    }
}
