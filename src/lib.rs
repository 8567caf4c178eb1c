//! Board supervisor library.
//!
//! Boot sequencing, watchdog arbitration, reset-cause tracking and the idle
//! hook for a single board, behind port traits so the same logic runs on
//! ESP32 and on the host simulation.  All ESP-IDF-specific code is guarded
//! by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod pins;

pub use app::service::Supervisor;
pub use config::SupervisorConfig;
pub use drivers::reset::ResetCause;
pub use error::{Error, Result};
