//! Port traits — the boundary between the lifecycle controller and the outside world.
//!
//! ```text
//!   Board / collaborator adapter ──▶ Port trait ──▶ Supervisor (domain)
//! ```
//!
//! Board backends (ESP-IDF, host simulation, test recorders) implement the
//! hardware ports; the application wires its USB stack and fault logger in
//! through [`PeripheralPort`].  The [`Supervisor`](super::service::Supervisor)
//! consumes them via generics, so the controller never touches registers
//! directly and its ordering and timing logic can be checked against a
//! recording board.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use crate::pins::Line;

// ───────────────────────────────────────────────────────────────
// Line port (driven adapter: domain → GPIO / NVIC / busy delays)
// ───────────────────────────────────────────────────────────────

/// Output lines, interrupt priority grouping and busy delays.
///
/// Delays come from the [`DelayNs`] supertrait so the boot handshake timings
/// land in the same ordered stream as the line writes they separate.
pub trait LinePort: DelayNs {
    /// Program the interrupt controller's preemption/sub-priority split.
    fn set_priority_grouping(&mut self, grouping: u8);

    /// Drive a named output line.  Only called for lines the configuration
    /// marks present.
    fn write_line(&mut self, line: Line, state: PinState);
}

// ───────────────────────────────────────────────────────────────
// Watchdog port
// ───────────────────────────────────────────────────────────────

/// Hardware countdown timer that resets the system unless fed.
pub trait WatchdogPort {
    /// Start the countdown with the given timeout.
    fn arm(&mut self, timeout_us: u32);

    /// Reload the countdown.
    fn feed(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Reset port
// ───────────────────────────────────────────────────────────────

/// Reset/management-unit access: the latched cause register and the
/// system-reset request.
pub trait ResetPort {
    /// Raw latched cause code.  Reading has no side effects.
    fn reset_cause(&self) -> u8;

    /// Clear the latched cause; reads return `0` until the next reset.
    fn clear_reset_cause(&mut self);

    /// Request a full system reset.
    ///
    /// On hardware this never returns.  Recording and simulated boards
    /// return so tests can observe the request.
    fn system_reset(&mut self);
}

/// Everything the supervisor needs from the board itself.
pub trait Board: LinePort + WatchdogPort + ResetPort {}

impl<T: LinePort + WatchdogPort + ResetPort> Board for T {}

// ───────────────────────────────────────────────────────────────
// Peripheral port (external collaborators)
// ───────────────────────────────────────────────────────────────

/// Narrow entry points into collaborators the supervisor does not own:
/// the USB device stack, the mass-storage bridge and the fault logger.
pub trait PeripheralPort {
    /// Install the USB interrupt hook feeding the emergency command parser.
    fn install_usb_hook(&mut self);

    /// Install the minimal fault-reporting handler.
    fn install_fault_logger(&mut self);

    /// Bring up host-accessible storage over USB mass storage.
    fn init_host_storage(&mut self);

    /// Resume a paused USB CDC receive.
    fn resume_receive(&mut self);

    /// Push any pending USB CDC transmit data.
    fn continue_transmit(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage used for the reset history.
///
/// Keys are namespaced to prevent collisions between subsystems.  Write
/// operations MUST be atomic, with no partial writes on power loss.  The ESP-IDF
/// NVS API guarantees this natively; in-memory simulation achieves it
/// trivially.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Stored bytes failed to decode.
    Corrupted,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::Corrupted => write!(f, "stored value corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
