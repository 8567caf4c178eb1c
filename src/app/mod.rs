//! Application core — the lifecycle controller, zero direct I/O.
//!
//! All interaction with hardware and external collaborators happens through
//! the **port traits** defined in [`ports`], keeping the controller fully
//! testable without real peripherals.

pub mod ports;
pub mod service;
