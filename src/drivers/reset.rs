//! Reset-cause latch and lifecycle resets.
//!
//! The reset/management unit latches why the last reset happened.  The
//! supervisor never caches it: [`ResetCause::read`] re-reads the latch on
//! every call, and clearing is a separate operation.  The code is carried as
//! an opaque byte; the flag helpers only interpret it for diagnostics.
//!
//! | Bit    | Flag        | Meaning                                  |
//! |--------|-------------|------------------------------------------|
//! | `0x01` | `POWER_ON`  | Power-on / power-up                      |
//! | `0x02` | `EXTERNAL`  | External reset pin                       |
//! | `0x04` | `BROWN_OUT` | Supply dropped below the brown-out level |
//! | `0x08` | `WATCHDOG`  | Watchdog expired (prior firmware hang)   |
//! | `0x10` | `JTAG`      | Debug probe                              |
//! | `0x20` | `SOFTWARE`  | Software-requested reset (reboot/flash)  |
//! | `0x40` | `BACKUP`    | Backup-domain / wake from deep sleep     |

use core::fmt;

use log::info;

use crate::app::ports::ResetPort;

/// Hardware-latched reset cause code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResetCause(u8);

impl ResetCause {
    pub const POWER_ON: u8 = 0x01;
    pub const EXTERNAL: u8 = 0x02;
    pub const BROWN_OUT: u8 = 0x04;
    pub const WATCHDOG: u8 = 0x08;
    pub const JTAG: u8 = 0x10;
    pub const SOFTWARE: u8 = 0x20;
    pub const BACKUP: u8 = 0x40;

    /// The latch's cleared / unknown encoding.
    pub const CLEARED: ResetCause = ResetCause(0);

    const NAMES: [(u8, &'static str); 7] = [
        (Self::POWER_ON, "power-on"),
        (Self::EXTERNAL, "external"),
        (Self::BROWN_OUT, "brown-out"),
        (Self::WATCHDOG, "watchdog"),
        (Self::JTAG, "jtag"),
        (Self::SOFTWARE, "software"),
        (Self::BACKUP, "backup"),
    ];

    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Read the latch.  No side effects; idempotent until cleared or reset.
    pub fn read(port: &impl ResetPort) -> Self {
        Self(port.reset_cause())
    }

    /// Clear the latch.
    pub fn clear(port: &mut impl ResetPort) {
        port.clear_reset_cause();
    }

    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub const fn is_cleared(self) -> bool {
        self.0 == 0
    }

    pub const fn is_power_on(self) -> bool {
        self.contains(Self::POWER_ON)
    }

    pub const fn is_external(self) -> bool {
        self.contains(Self::EXTERNAL)
    }

    pub const fn is_brown_out(self) -> bool {
        self.contains(Self::BROWN_OUT)
    }

    /// The previous run hung long enough for the watchdog to fire.
    pub const fn is_watchdog(self) -> bool {
        self.contains(Self::WATCHDOG)
    }

    pub const fn is_jtag(self) -> bool {
        self.contains(Self::JTAG)
    }

    pub const fn is_software(self) -> bool {
        self.contains(Self::SOFTWARE)
    }

    pub const fn is_backup(self) -> bool {
        self.contains(Self::BACKUP)
    }

    /// Names of the flags set in this code, lowest bit first.  Unknown bits
    /// are skipped.
    pub fn flag_names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(bit, _)| self.contains(*bit))
            .map(|(_, name)| name)
    }
}

impl From<u8> for ResetCause {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ResetCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.flag_names();
        match names.next() {
            None if self.is_cleared() => f.write_str("unknown"),
            None => write!(f, "0x{:02x}", self.0),
            Some(first) => {
                f.write_str(first)?;
                for name in names {
                    write!(f, "|{name}")?;
                }
                Ok(())
            }
        }
    }
}

// ── Lifecycle controls ────────────────────────────────────────

/// Force an immediate full system reset.  No graceful shutdown.
pub fn reboot(port: &mut impl ResetPort) {
    info!("Lifecycle: reboot requested");
    port.system_reset();
}

/// Force a system reset so the bootloader can take over and flash new
/// firmware.  `cause` is logged only; it never changes how the reset is
/// performed.
pub fn flash_firmware(port: &mut impl ResetPort, cause: i16) {
    info!("Lifecycle: firmware flash requested (cause={})", cause);
    port.system_reset();
}
