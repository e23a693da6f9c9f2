// Xautocfg Actions
// Side effects of a keyboard transition: repeat rate and hook scripts

pub mod dispatcher;
pub mod hook;

use std::process::ExitStatus;

use crate::event::DeviceId;

pub use dispatcher::{DispatchOutcome, Dispatcher, HookOutcome};
pub use hook::{ShellHookRunner, DEVICE_ID_ENV};

/// XKB device spec addressing the core keyboard (`XkbUseCoreKbd`)
pub const CORE_KEYBOARD: DeviceId = 0x0100;

/// Errors from applying the repeat rate
#[derive(Debug, thiserror::Error)]
pub enum RepeatError {
    #[error("repeat delay {delay_ms}ms / interval {interval_ms}ms out of range")]
    OutOfRange { delay_ms: u32, interval_ms: u32 },

    #[cfg(feature = "x11-backend")]
    #[error("X connection error: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    #[cfg(feature = "x11-backend")]
    #[error("XKB request failed: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),
}

/// Errors from running a hook command
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("failed to wait for '{command}': {source}")]
    Wait {
        command: String,
        source: std::io::Error,
    },
}

/// Something that can set the auto-repeat of a keyboard
pub trait RepeatControl {
    fn set_auto_repeat_rate(
        &self,
        device_id: DeviceId,
        delay_ms: u32,
        interval_ms: u32,
    ) -> Result<(), RepeatError>;
}

impl<T: RepeatControl + ?Sized> RepeatControl for &T {
    fn set_auto_repeat_rate(
        &self,
        device_id: DeviceId,
        delay_ms: u32,
        interval_ms: u32,
    ) -> Result<(), RepeatError> {
        (**self).set_auto_repeat_rate(device_id, delay_ms, interval_ms)
    }
}

/// Something that can run a hook command to completion
pub trait HookRunner {
    fn run_hook(&self, command: &str, device_id: DeviceId) -> Result<ExitStatus, HookError>;
}

impl<T: HookRunner + ?Sized> HookRunner for &T {
    fn run_hook(&self, command: &str, device_id: DeviceId) -> Result<ExitStatus, HookError> {
        (**self).run_hook(command, device_id)
    }
}
