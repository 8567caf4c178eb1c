//! Mock board for integration tests.
//!
//! Records every hardware and collaborator call in one ordered log so tests
//! can assert on the complete sequence without touching real registers.

use std::collections::HashMap;

use board_supervisor::app::ports::{
    LinePort, PeripheralPort, ResetPort, StorageError, StoragePort, WatchdogPort,
};
use board_supervisor::pins::Line;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Grouping(u8),
    Write(Line, PinState),
    DelayMs(u32),
    Arm(u32),
    Feed,
    ClearCause,
    SystemReset,
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub calls: Vec<Call>,
    pub cause: u8,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new(cause: u8) -> Self {
        Self {
            calls: Vec::new(),
            cause,
        }
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn writes(&self, line: Line) -> Vec<PinState> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Write(l, s) if *l == line => Some(*s),
                _ => None,
            })
            .collect()
    }
}

impl DelayNs for MockBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(Call::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(Call::DelayMs(ms));
    }
}

impl LinePort for MockBoard {
    fn set_priority_grouping(&mut self, grouping: u8) {
        self.calls.push(Call::Grouping(grouping));
    }

    fn write_line(&mut self, line: Line, state: PinState) {
        self.calls.push(Call::Write(line, state));
    }
}

impl WatchdogPort for MockBoard {
    fn arm(&mut self, timeout_us: u32) {
        self.calls.push(Call::Arm(timeout_us));
    }

    fn feed(&mut self) {
        self.calls.push(Call::Feed);
    }
}

impl ResetPort for MockBoard {
    fn reset_cause(&self) -> u8 {
        self.cause
    }

    fn clear_reset_cause(&mut self) {
        self.calls.push(Call::ClearCause);
        self.cause = 0;
    }

    fn system_reset(&mut self) {
        self.calls.push(Call::SystemReset);
    }
}

// ── MockPeripherals ───────────────────────────────────────────

#[derive(Default)]
pub struct MockPeripherals {
    pub calls: Vec<&'static str>,
}

impl PeripheralPort for MockPeripherals {
    fn install_usb_hook(&mut self) {
        self.calls.push("usb_hook");
    }

    fn install_fault_logger(&mut self) {
        self.calls.push("fault_logger");
    }

    fn init_host_storage(&mut self) {
        self.calls.push("host_storage");
    }

    fn resume_receive(&mut self) {
        self.calls.push("resume_receive");
    }

    fn continue_transmit(&mut self) {
        self.calls.push("continue_transmit");
    }
}

// ── MockStorage ───────────────────────────────────────────────

/// In-memory store.  Writes and deletes of keys marked with
/// [`fail_key`](MockStorage::fail_key) return the given error.
#[derive(Default)]
pub struct MockStorage {
    data: HashMap<String, Vec<u8>>,
    failing: HashMap<&'static str, StorageError>,
}

#[allow(dead_code)]
impl MockStorage {
    pub fn fail_key(&mut self, key: &'static str, err: StorageError) {
        self.failing.insert(key, err);
    }

    pub fn heal(&mut self) {
        self.failing.clear();
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        match self.failing.get(key) {
            Some(err) => Err(*err),
            None => Ok(()),
        }
    }
}

impl StoragePort for MockStorage {
    fn read(&self, ns: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        match self.data.get(&format!("{ns}::{key}")) {
            Some(v) => {
                let len = v.len().min(buf.len());
                buf[..len].copy_from_slice(&v[..len]);
                Ok(len)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, ns: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.check(key)?;
        self.data.insert(format!("{ns}::{key}"), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, ns: &str, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.data.remove(&format!("{ns}::{key}"));
        Ok(())
    }

    fn exists(&self, ns: &str, key: &str) -> bool {
        self.data.contains_key(&format!("{ns}::{key}"))
    }
}
