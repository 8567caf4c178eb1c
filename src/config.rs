//! Supervisor configuration
//!
//! Every optional boot step and the watchdog timeout are selected here, once,
//! at startup.  Absent hardware is expressed as a `false` presence flag and
//! the corresponding step is skipped entirely; nothing probes for hardware at
//! runtime.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Watchdog countdown duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchdogTimeout {
    /// 4 second countdown.
    Short,
    /// 8 second countdown.
    Long,
}

impl WatchdogTimeout {
    /// Countdown in microseconds, as handed to the hardware.
    pub const fn as_micros(self) -> u32 {
        match self {
            Self::Short => 4_000_000,
            Self::Long => 8_000_000,
        }
    }

    pub const fn as_millis(self) -> u32 {
        self.as_micros() / 1_000
    }
}

/// Watchdog enable switch and timeout selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchdogConfig {
    pub enabled: bool,
    pub timeout: WatchdogTimeout,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: WatchdogTimeout::Short,
        }
    }
}

/// Which of the named control lines are fitted on this board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePresence {
    /// Storage chip-select on the shared SPI bus.
    pub bus_select: bool,
    /// Status indicator LED.
    pub status_led: bool,
    /// Auxiliary control line needing the boot handshake pulse.
    pub aux_control: bool,
    /// USB connect (D+ pull-up) control.
    pub usb_connect: bool,
}

impl LinePresence {
    /// Every line fitted.
    pub const fn all() -> Self {
        Self {
            bus_select: true,
            status_led: true,
            aux_control: true,
            usb_connect: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            bus_select: false,
            status_led: false,
            aux_control: false,
            usb_connect: false,
        }
    }
}

/// Optional boot steps and the features they depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootSequenceConfig {
    // --- Features ---
    /// Interrupt-driven emergency command parser.
    pub emergency_parser: bool,
    /// USB device exposes a CDC (serial) interface, alone or with MSC.
    pub usb_cdc: bool,
    /// Minimal serial fault logger installed at boot.
    pub fault_logger: bool,
    /// Host-accessible storage bridge (USB mass storage of the SD card).
    pub host_storage_bridge: bool,
    /// Storage media shared with the host; the idle hook pumps USB CDC.
    pub shared_media: bool,
    /// Storage is on SDIO, so the SPI bus-select line is managed by the
    /// SDIO driver and must not be touched at boot.
    pub sdio_bus: bool,
    /// USB connect line polarity: `true` when the connect level is HIGH.
    pub usb_connect_inverting: bool,

    // --- Lines ---
    pub lines: LinePresence,
}

impl Default for BootSequenceConfig {
    fn default() -> Self {
        Self {
            emergency_parser: true,
            usb_cdc: true,
            fault_logger: true,
            host_storage_bridge: false,
            shared_media: false,
            sdio_bus: false,
            usb_connect_inverting: false,
            lines: LinePresence {
                bus_select: true,
                status_led: true,
                aux_control: false,
                usb_connect: false,
            },
        }
    }
}

impl BootSequenceConfig {
    /// Every optional step disabled and no optional line fitted.
    pub const fn minimal() -> Self {
        Self {
            emergency_parser: false,
            usb_cdc: false,
            fault_logger: false,
            host_storage_bridge: false,
            shared_media: false,
            sdio_bus: false,
            usb_connect_inverting: false,
            lines: LinePresence::none(),
        }
    }

    /// Whether boot drives the bus-select line inactive.
    pub const fn drives_bus_select(&self) -> bool {
        self.lines.bus_select && !self.sdio_bus
    }

    /// Whether boot installs the USB emergency-parser interrupt hook.
    pub const fn installs_usb_hook(&self) -> bool {
        self.emergency_parser && self.usb_cdc
    }
}

/// Complete supervisor configuration, assembled once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorConfig {
    pub watchdog: WatchdogConfig,
    pub boot: BootSequenceConfig,
    /// Main-loop period between idle-hook / watchdog-refresh passes.
    pub idle_interval_ms: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            watchdog: WatchdogConfig::default(),
            boot: BootSequenceConfig::default(),
            idle_interval_ms: 10,
        }
    }
}

impl SupervisorConfig {
    /// Reject configurations the main loop could not honour.
    pub fn validate(&self) -> Result<()> {
        if self.idle_interval_ms == 0 {
            return Err(Error::Config("idle_interval_ms must be non-zero"));
        }
        if self.watchdog.enabled && self.idle_interval_ms >= self.watchdog.timeout.as_millis() {
            return Err(Error::Config(
                "idle_interval_ms must be shorter than the watchdog timeout",
            ));
        }
        if self.boot.shared_media && !self.boot.usb_cdc {
            return Err(Error::Config("shared_media requires usb_cdc"));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON configuration"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|_| Error::Config("configuration not serialisable"))
    }
}
