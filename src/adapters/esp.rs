//! ESP32 board backend.
//!
//! Maps the board ports onto ESP-IDF:
//!
//! | Port           | ESP-IDF facility                                   |
//! |----------------|----------------------------------------------------|
//! | `LinePort`     | `PinDriver` outputs in a [`PinBank`], busy-wait delay |
//! | `WatchdogPort` | Task Watchdog Timer, panic (and reset) on trigger  |
//! | `ResetPort`    | `esp_reset_reason()` / `esp_restart()`             |
//!
//! The ESP reset reason is read-only, so clearing the cause is tracked in a
//! flag: after [`ResetPort::clear_reset_cause`] the board reports the
//! cleared encoding until the next reset.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use esp_idf_hal::delay::Delay;
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_svc::sys::*;
use log::{debug, info, warn};

use crate::adapters::pin_bank::PinBank;
use crate::adapters::reset_reason;
use crate::app::ports::{LinePort, ResetPort, WatchdogPort};
use crate::pins::Line;

// The host-side reason table must agree with the IDF bindings.
const _: () = {
    assert!(esp_reset_reason_t_ESP_RST_UNKNOWN == reset_reason::UNKNOWN);
    assert!(esp_reset_reason_t_ESP_RST_POWERON == reset_reason::POWERON);
    assert!(esp_reset_reason_t_ESP_RST_EXT == reset_reason::EXT);
    assert!(esp_reset_reason_t_ESP_RST_SW == reset_reason::SW);
    assert!(esp_reset_reason_t_ESP_RST_PANIC == reset_reason::PANIC);
    assert!(esp_reset_reason_t_ESP_RST_INT_WDT == reset_reason::INT_WDT);
    assert!(esp_reset_reason_t_ESP_RST_TASK_WDT == reset_reason::TASK_WDT);
    assert!(esp_reset_reason_t_ESP_RST_WDT == reset_reason::WDT);
    assert!(esp_reset_reason_t_ESP_RST_DEEPSLEEP == reset_reason::DEEPSLEEP);
    assert!(esp_reset_reason_t_ESP_RST_BROWNOUT == reset_reason::BROWNOUT);
    assert!(esp_reset_reason_t_ESP_RST_SDIO == reset_reason::SDIO);
};

pub type EspPin = PinDriver<'static, AnyOutputPin, Output>;

pub struct EspBoard {
    lines: PinBank<EspPin>,
    delay: Delay,
    wdt_subscribed: bool,
    cause_cleared: bool,
}

impl EspBoard {
    pub fn new(lines: PinBank<EspPin>) -> Self {
        Self {
            lines,
            delay: Delay::new_default(),
            wdt_subscribed: false,
            cause_cleared: false,
        }
    }
}

impl DelayNs for EspBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

impl LinePort for EspBoard {
    fn set_priority_grouping(&mut self, grouping: u8) {
        // Xtensa/RISC-V interrupt levels are fixed by ESP-IDF.
        debug!("EspBoard: priority grouping {} (fixed by IDF)", grouping);
    }

    fn write_line(&mut self, line: Line, state: PinState) {
        self.lines.write(line, state);
    }
}

impl WatchdogPort for EspBoard {
    fn arm(&mut self, timeout_us: u32) {
        let cfg = esp_task_wdt_config_t {
            timeout_ms: timeout_us / 1_000,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: TWDT API called from the main task.
        unsafe {
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK {
                warn!("TWDT reconfigure returned {} (may already be configured)", ret);
            }

            let ret = esp_task_wdt_add(core::ptr::null_mut());
            self.wdt_subscribed = ret == ESP_OK;
            if self.wdt_subscribed {
                info!("EspBoard: TWDT subscribed ({}ms)", cfg.timeout_ms);
            } else {
                warn!("EspBoard: TWDT subscribe failed ({})", ret);
            }
        }
    }

    fn feed(&mut self) {
        if self.wdt_subscribed {
            // SAFETY: the current task is subscribed.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}

impl ResetPort for EspBoard {
    fn reset_cause(&self) -> u8 {
        if self.cause_cleared {
            return 0;
        }
        // SAFETY: pure read of the reason latched by the ROM bootloader.
        reset_reason::cause_code(unsafe { esp_reset_reason() } as u32)
    }

    fn clear_reset_cause(&mut self) {
        self.cause_cleared = true;
    }

    fn system_reset(&mut self) {
        // SAFETY: does not return.
        unsafe { esp_restart() }
    }
}
