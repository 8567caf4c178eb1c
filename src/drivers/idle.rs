//! Main-loop idle hook.
//!
//! The USB device stack has no loop/idle entry of its own, so when storage
//! media is shared with the host the main loop pumps the CDC receive and
//! transmit paths from here.  Runs on every pass of the main loop and must
//! never block.

use crate::app::ports::PeripheralPort;
use crate::config::BootSequenceConfig;

pub fn idletask(cfg: &BootSequenceConfig, peripherals: &mut impl PeripheralPort) {
    if cfg.shared_media {
        peripherals.resume_receive();
        peripherals.continue_transmit();
    }
}
