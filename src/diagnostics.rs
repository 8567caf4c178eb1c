//! Reset diagnostics and fault logging.
//!
//! The watchdog reset is the supervisor's only failure signal: a hung
//! firmware image is reset without any logging, and the *next* boot reads the
//! latched cause to find out.  This module turns that code into log lines
//! and keeps the last 8 causes in a [`StoragePort`] ring buffer under the
//! "reset" namespace so repeated hangs are visible across reboots.
//!
//! It also provides the default fault logger: a panic hook that reports the
//! panic reason before the runtime resets the device.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{StorageError, StoragePort};
use crate::drivers::reset::ResetCause;
use crate::error::Result;

/// Records kept before the oldest is overwritten.
pub const RESET_HISTORY_LEN: usize = 8;

const RESET_NAMESPACE: &str = "reset";
const SLOT_KEYS: [&str; RESET_HISTORY_LEN] = ["r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7"];
const NEXT_SLOT_KEY: &str = "reset_idx";
const BOOT_COUNT_KEY: &str = "boot_cnt";

/// One boot's reset cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRecord {
    /// Monotonic boot number, starting at 1.
    pub boot_count: u32,
    /// Raw latched cause code.
    pub cause: u8,
}

impl ResetRecord {
    pub fn cause(&self) -> ResetCause {
        ResetCause::from_raw(self.cause)
    }
}

// ───────────────────────────────────────────────────────────────
// Startup report
// ───────────────────────────────────────────────────────────────

/// Log the latched reset cause, one line per flag.
///
/// A watchdog reset is logged as a warning: it means the previous run hung.
pub fn report_reset_cause(cause: ResetCause) {
    if cause.is_cleared() {
        info!("Reset cause: unknown (latch cleared)");
        return;
    }
    if cause.is_power_on() {
        info!("Reset cause: power-up");
    }
    if cause.is_external() {
        info!("Reset cause: external reset");
    }
    if cause.is_brown_out() {
        warn!("Reset cause: brown-out reset");
    }
    if cause.is_watchdog() {
        warn!("Reset cause: watchdog reset (previous run hung)");
    }
    if cause.is_jtag() {
        info!("Reset cause: JTAG reset");
    }
    if cause.is_software() {
        info!("Reset cause: software reset");
    }
    if cause.is_backup() {
        info!("Reset cause: backup-domain reset");
    }
}

// ───────────────────────────────────────────────────────────────
// Reset history
// ───────────────────────────────────────────────────────────────

/// Reset history persisted through a [`StoragePort`].
///
/// Holds the ring position and boot counter loaded from storage.  A record
/// is committed in three writes: the slot, then the ring position, then the
/// boot counter.  If any write fails the in-memory state is left untouched,
/// so the next boot reuses the same slot and boot number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetLog {
    next_slot: usize,
    boot_count: u32,
}

impl ResetLog {
    /// Read the ring position and boot counter.  Missing or short values
    /// count as a fresh history.
    pub fn load(store: &dyn StoragePort) -> Self {
        let next_slot =
            read_u32(store, NEXT_SLOT_KEY).map_or(0, |v| v as usize % RESET_HISTORY_LEN);
        let boot_count = read_u32(store, BOOT_COUNT_KEY).unwrap_or(0);
        Self {
            next_slot,
            boot_count,
        }
    }

    /// Boots recorded so far (0 before the first record).
    pub fn boot_count(&self) -> u32 {
        self.boot_count
    }

    /// Store `cause` as the next boot's record and return its boot number.
    pub fn record(&mut self, store: &mut dyn StoragePort, cause: ResetCause) -> Result<u32> {
        let entry = ResetRecord {
            boot_count: self.boot_count.wrapping_add(1),
            cause: cause.raw(),
        };
        let bytes = postcard::to_allocvec(&entry).map_err(|_| StorageError::Corrupted)?;
        let next_slot = (self.next_slot + 1) % RESET_HISTORY_LEN;

        store.write(RESET_NAMESPACE, SLOT_KEYS[self.next_slot], &bytes)?;
        store.write(RESET_NAMESPACE, NEXT_SLOT_KEY, &(next_slot as u32).to_le_bytes())?;
        store.write(RESET_NAMESPACE, BOOT_COUNT_KEY, &entry.boot_count.to_le_bytes())?;

        self.next_slot = next_slot;
        self.boot_count = entry.boot_count;

        if cause.is_watchdog() {
            warn!(
                "ResetLog: boot #{} follows a watchdog reset ({} in history)",
                entry.boot_count,
                self.watchdog_resets(store)
            );
        }
        Ok(entry.boot_count)
    }

    /// Stored records, oldest first.  Slots that fail to decode are skipped.
    pub fn read_all(&self, store: &dyn StoragePort) -> heapless::Vec<ResetRecord, RESET_HISTORY_LEN> {
        let mut buf = [0u8; 16];
        SLOT_KEYS
            .iter()
            .cycle()
            .skip(self.next_slot)
            .take(RESET_HISTORY_LEN)
            .filter_map(|key| {
                let len = store.read(RESET_NAMESPACE, key, &mut buf).ok()?;
                postcard::from_bytes(&buf[..len]).ok()
            })
            .collect()
    }

    /// Number of occupied slots.
    pub fn count(&self, store: &dyn StoragePort) -> usize {
        SLOT_KEYS
            .iter()
            .filter(|key| store.exists(RESET_NAMESPACE, key))
            .count()
    }

    /// Stored records whose cause includes a watchdog reset.
    pub fn watchdog_resets(&self, store: &dyn StoragePort) -> usize {
        self.read_all(store)
            .iter()
            .filter(|r| r.cause().is_watchdog())
            .count()
    }

    /// Erase every record and the ring position.  The boot counter survives
    /// so boot numbers stay monotonic.
    pub fn clear(&mut self, store: &mut dyn StoragePort) -> Result<()> {
        for key in SLOT_KEYS.iter().chain(&[NEXT_SLOT_KEY]) {
            store.delete(RESET_NAMESPACE, key)?;
        }
        self.next_slot = 0;
        Ok(())
    }
}

fn read_u32(store: &dyn StoragePort, key: &str) -> Option<u32> {
    let mut buf = [0u8; 4];
    match store.read(RESET_NAMESPACE, key, &mut buf) {
        Ok(4) => Some(u32::from_le_bytes(buf)),
        _ => None,
    }
}

// ───────────────────────────────────────────────────────────────
// Fault logger
// ───────────────────────────────────────────────────────────────

/// Install a panic hook that reports the panic reason on the log output.
///
/// Installed by the boot sequence when the fault logger is enabled, as early
/// as possible so it covers everything that runs afterwards.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        match info.location() {
            Some(loc) => error!("PANIC at {}:{}: {}", loc.file(), loc.line(), reason),
            None => error!("PANIC: {}", reason),
        }
    }));
    info!("Fault logger: panic hook installed");
}
