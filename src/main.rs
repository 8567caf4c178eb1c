//! Board supervisor firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  EspBoard (GPIO · TWDT · reset)   HookTable   NvsStore   │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │        Supervisor (boot · watchdog · reset)        │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                                                          │
//! │  Main loop: idle hook · watchdog refresh                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{OutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use board_supervisor::adapters::esp::EspBoard;
use board_supervisor::adapters::hooks::HookTable;
use board_supervisor::adapters::nvs::NvsStore;
use board_supervisor::adapters::pin_bank::PinBank;
use board_supervisor::diagnostics::{self, ResetLog};
use board_supervisor::pins::{self, Line};
use board_supervisor::{Supervisor, SupervisorConfig};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Board Supervisor v{}             ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Control lines ──────────────────────────────────────
    let p = Peripherals::take()?;
    let lines = PinBank::new()
        .with(Line::BusSelect, PinDriver::output(p.pins.gpio10.downgrade_output())?)
        .with(Line::StatusLed, PinDriver::output(p.pins.gpio38.downgrade_output())?);
    for line in Line::ALL.into_iter().filter(|l| lines.is_present(*l)) {
        info!("Line {} on GPIO{}", line, pins::gpio(line));
    }

    // ── 3. Configuration ──────────────────────────────────────
    let mut config = SupervisorConfig::default();
    config.boot.lines = lines.presence();
    config.validate()?;
    info!("Config: {}", config.to_json()?);

    // ── 4. Boot sequence ──────────────────────────────────────
    let hooks = HookTable::new().with_panic_fault_logger();
    let mut supervisor = Supervisor::init(config, EspBoard::new(lines), hooks);

    // ── 5. Reset cause ────────────────────────────────────────
    let cause = supervisor.get_reset_source();
    diagnostics::report_reset_cause(cause);
    match NvsStore::new() {
        Ok(mut nvs) => {
            let mut history = ResetLog::load(&nvs);
            match history.record(&mut nvs, cause) {
                Ok(boot) => info!("Boot #{} ({})", boot, cause),
                Err(e) => warn!("Reset history not recorded: {}", e),
            }
        }
        Err(e) => warn!("NVS init failed ({}), reset history disabled", e),
    }
    supervisor.clear_reset_source();

    // ── 6. Watchdog ───────────────────────────────────────────
    supervisor.watchdog_init();

    // ── 7. Main loop ──────────────────────────────────────────
    let interval = supervisor.config().idle_interval_ms;
    info!("Entering main loop ({}ms period)", interval);
    loop {
        supervisor.idletask();
        supervisor.watchdog_refresh();
        FreeRtos::delay_ms(interval);
    }
}
