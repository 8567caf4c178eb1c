//! ESP-IDF reset reasons mapped onto the [`ResetCause`] flag encoding.
//!
//! The numeric values follow `esp_reset_reason_t`.  They are repeated here so
//! the mapping builds and is tested on the host; the ESP board checks them
//! against the IDF bindings at compile time.

use crate::drivers::reset::ResetCause;

pub const UNKNOWN: u32 = 0;
pub const POWERON: u32 = 1;
pub const EXT: u32 = 2;
pub const SW: u32 = 3;
pub const PANIC: u32 = 4;
pub const INT_WDT: u32 = 5;
pub const TASK_WDT: u32 = 6;
pub const WDT: u32 = 7;
pub const DEEPSLEEP: u32 = 8;
pub const BROWNOUT: u32 = 9;
pub const SDIO: u32 = 10;

/// Raw cause code for an `esp_reset_reason()` value.
///
/// Every watchdog flavour (interrupt, task, RTC/other) becomes `WATCHDOG`;
/// a panic restart counts as a software reset.  Reasons with no matching
/// flag map to the cleared encoding.
pub const fn cause_code(reason: u32) -> u8 {
    match reason {
        POWERON => ResetCause::POWER_ON,
        EXT => ResetCause::EXTERNAL,
        SW | PANIC => ResetCause::SOFTWARE,
        INT_WDT | TASK_WDT | WDT => ResetCause::WATCHDOG,
        DEEPSLEEP => ResetCause::BACKUP,
        BROWNOUT => ResetCause::BROWN_OUT,
        _ => 0,
    }
}
