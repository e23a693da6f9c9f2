// Xautocfg Action Dispatcher
// Maps a keyboard transition to repeat-rate application and hook scripts

use std::process::ExitStatus;

use super::{HookRunner, RepeatControl, CORE_KEYBOARD};
use crate::config::Config;
use crate::event::{DeviceId, DeviceTransition, TransitionHandler};

/// What happened to the hook of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// No command configured for this direction
    NotConfigured,
    /// The command ran; non-zero exits are logged but not acted on
    Exited(ExitStatus),
    /// The command could not be spawned or waited for
    Failed,
}

/// Summary of one dispatched transition.
///
/// The event loop ignores it; failures never travel back into the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// `None` for disable transitions, otherwise whether the request went through
    pub repeat_applied: Option<bool>,
    pub hook: HookOutcome,
}

/// Owns the config for the lifetime of the process and carries out the
/// side effects of each transition.
///
/// Side effects are isolated from each other: a failed repeat request does
/// not prevent the hook from running, and neither stops the loop.
pub struct Dispatcher<R, H> {
    config: Config,
    repeat: R,
    hooks: H,
}

impl<R: RepeatControl, H: HookRunner> Dispatcher<R, H> {
    pub fn new(config: Config, repeat: R, hooks: H) -> Self {
        Self {
            config,
            repeat,
            hooks,
        }
    }

    /// Apply the configured repeat delay and interval to `device_id`
    pub fn apply_repeat(&self, device_id: DeviceId) -> bool {
        log::info!("setting repeat rate on device={}", device_id);
        match self.repeat.set_auto_repeat_rate(
            device_id,
            self.config.repeat_delay_ms,
            self.config.repeat_interval_ms,
        ) {
            Ok(()) => true,
            Err(e) => {
                log::error!("failed to set repeat rate on device={}: {}", device_id, e);
                false
            }
        }
    }

    fn run_hook(&self, device_id: DeviceId, became_enabled: bool) -> HookOutcome {
        let Some(command) = self.config.hook_for(became_enabled) else {
            return HookOutcome::NotConfigured;
        };

        log::info!("running hook for device={}: {}", device_id, command);
        match self.hooks.run_hook(command, device_id) {
            Ok(status) => {
                if !status.success() {
                    log::error!("hook '{}' for device={} {}", command, device_id, status);
                }
                HookOutcome::Exited(status)
            }
            Err(e) => {
                log::error!("hook for device={}: {}", device_id, e);
                HookOutcome::Failed
            }
        }
    }

    /// Handle one transition: repeat rate on enable, then the matching hook
    pub fn dispatch(&self, transition: DeviceTransition) -> DispatchOutcome {
        let DeviceTransition {
            device_id,
            became_enabled,
        } = transition;

        let repeat_applied = became_enabled.then(|| self.apply_repeat(device_id));
        let hook = self.run_hook(device_id, became_enabled);

        DispatchOutcome {
            repeat_applied,
            hook,
        }
    }
}

impl<R: RepeatControl, H: HookRunner> TransitionHandler for Dispatcher<R, H> {
    /// Normalize the core keyboard once, before any device shows up
    fn on_start(&mut self) {
        log::info!("setting rate to core keyboard");
        self.apply_repeat(CORE_KEYBOARD);
    }

    fn on_transition(&mut self, transition: DeviceTransition) {
        self.dispatch(transition);
    }
}
