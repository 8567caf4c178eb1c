//! Hook table — wires external collaborators into [`PeripheralPort`].
//!
//! The USB device stack, the mass-storage bridge and the fault logger belong
//! to the application, not to the supervisor.  The application registers
//! plain function pointers for the entry points it provides; unregistered
//! entry points are skipped with a debug line.

use log::debug;

use crate::app::ports::PeripheralPort;
use crate::diagnostics;

/// Entry point into an external collaborator.
pub type Hook = fn();

#[derive(Debug, Clone, Copy, Default)]
pub struct HookTable {
    usb_hook: Option<Hook>,
    fault_logger: Option<Hook>,
    host_storage: Option<Hook>,
    resume_receive: Option<Hook>,
    continue_transmit: Option<Hook>,
}

impl HookTable {
    pub const fn new() -> Self {
        Self {
            usb_hook: None,
            fault_logger: None,
            host_storage: None,
            resume_receive: None,
            continue_transmit: None,
        }
    }

    #[must_use]
    pub const fn with_usb_hook(mut self, hook: Hook) -> Self {
        self.usb_hook = Some(hook);
        self
    }

    #[must_use]
    pub const fn with_fault_logger(mut self, hook: Hook) -> Self {
        self.fault_logger = Some(hook);
        self
    }

    /// Use the built-in panic-hook fault logger.
    #[must_use]
    pub const fn with_panic_fault_logger(self) -> Self {
        self.with_fault_logger(diagnostics::install_panic_handler)
    }

    #[must_use]
    pub const fn with_host_storage(mut self, hook: Hook) -> Self {
        self.host_storage = Some(hook);
        self
    }

    /// USB CDC receive-resume and transmit-continue pump for the idle hook.
    #[must_use]
    pub const fn with_cdc_pump(mut self, resume_receive: Hook, continue_transmit: Hook) -> Self {
        self.resume_receive = Some(resume_receive);
        self.continue_transmit = Some(continue_transmit);
        self
    }

    fn call(hook: Option<Hook>, what: &str) {
        match hook {
            Some(f) => f(),
            None => debug!("hooks: no {} registered", what),
        }
    }
}

impl PeripheralPort for HookTable {
    fn install_usb_hook(&mut self) {
        Self::call(self.usb_hook, "USB hook");
    }

    fn install_fault_logger(&mut self) {
        Self::call(self.fault_logger, "fault logger");
    }

    fn init_host_storage(&mut self) {
        Self::call(self.host_storage, "host storage bridge");
    }

    fn resume_receive(&mut self) {
        Self::call(self.resume_receive, "CDC receive pump");
    }

    fn continue_transmit(&mut self) {
        Self::call(self.continue_transmit, "CDC transmit pump");
    }
}
