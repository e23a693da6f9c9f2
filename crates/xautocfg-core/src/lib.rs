// Xautocfg Core Library
// Apply keyboard repeat settings whenever an X keyboard becomes active

pub mod action;
pub mod config;
pub mod event;
pub mod paths;

#[cfg(feature = "x11-backend")]
pub mod x11;

pub use action::{
    DispatchOutcome, Dispatcher, HookError, HookOutcome, HookRunner, RepeatControl, RepeatError,
    ShellHookRunner, CORE_KEYBOARD, DEVICE_ID_ENV,
};
pub use config::{interval_from_rate, Config, ConfigError, Section};
pub use event::{
    DeviceId, DeviceTransition, EventLoop, EventLoopError, EventLoopResult, HierarchyChange,
    HierarchySource, TransitionHandler,
};
pub use paths::{ConfigLocation, PathError};

#[cfg(feature = "x11-backend")]
pub use x11::X11Session;
