//! Unified error type for the supervisor's ambient concerns.
//!
//! The lifecycle core itself never returns errors: hangs surface as a
//! watchdog reset and absent hardware is resolved by configuration.  What is
//! left (configuration validation and persistent storage) funnels into
//! [`Error`].  All variants are `Copy` so they can be logged and passed
//! around without allocation.

use core::fmt;

use crate::app::ports::StorageError;

/// Every fallible ambient operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
    /// The persistent key-value store failed.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
