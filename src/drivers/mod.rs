//! Lifecycle drivers: boot sequencing, watchdog, reset cause and idle hook.

pub mod boot;
pub mod idle;
pub mod reset;
pub mod watchdog;
