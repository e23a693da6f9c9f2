// Xautocfg End-to-End Scenarios
//
// Config text -> event loop -> dispatcher -> repeat control and hook scripts,
// with a scripted event source instead of an X server.
//
// Run with: cargo test -p xautocfg-core --test e2e_scenarios

use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::ExitStatus;

use xautocfg_core::config::parse_config;
use xautocfg_core::event::hierarchy::{DEVICE_DISABLED, DEVICE_ENABLED};
use xautocfg_core::event::{DeviceUse, HierarchyInfo};
use xautocfg_core::{
    DeviceId, DeviceTransition, Dispatcher, EventLoop, EventLoopError, EventLoopResult,
    HierarchyChange, HierarchySource, HookError, HookOutcome, HookRunner, RepeatControl,
    RepeatError, ShellHookRunner, CORE_KEYBOARD,
};

// =========================================================================
// Test Helpers
// =========================================================================

#[derive(Default)]
struct RecordingRepeat {
    calls: RefCell<Vec<(DeviceId, u32, u32)>>,
}

impl RepeatControl for RecordingRepeat {
    fn set_auto_repeat_rate(
        &self,
        device_id: DeviceId,
        delay_ms: u32,
        interval_ms: u32,
    ) -> Result<(), RepeatError> {
        self.calls.borrow_mut().push((device_id, delay_ms, interval_ms));
        Ok(())
    }
}

/// Delegates to the real shell runner and records every call
#[derive(Default)]
struct RecordingHooks {
    runner: ShellHookRunner,
    calls: RefCell<Vec<(String, DeviceId)>>,
}

impl HookRunner for RecordingHooks {
    fn run_hook(&self, command: &str, device_id: DeviceId) -> Result<ExitStatus, HookError> {
        self.calls.borrow_mut().push((command.to_string(), device_id));
        self.runner.run_hook(command, device_id)
    }
}

/// Replays a fixed list of events, then reports the source as closed
struct ScriptedSource {
    events: RefCell<VecDeque<Option<HierarchyChange>>>,
}

impl ScriptedSource {
    fn new(events: Vec<Option<HierarchyChange>>) -> Self {
        Self {
            events: RefCell::new(events.into()),
        }
    }
}

impl HierarchySource for ScriptedSource {
    fn next_change(&self) -> EventLoopResult<Option<HierarchyChange>> {
        self.events
            .borrow_mut()
            .pop_front()
            .ok_or(EventLoopError::Closed)
    }
}

fn record(device_id: DeviceId, device_use: DeviceUse, flags: u32) -> HierarchyInfo {
    HierarchyInfo {
        device_id,
        device_use,
        flags,
    }
}

fn change(infos: Vec<HierarchyInfo>) -> HierarchyChange {
    let flags = infos.iter().fold(0, |acc, info| acc | info.flags);
    HierarchyChange { flags, infos }
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_enable_applies_rate_and_runs_hook_with_device_id() {
    let config = parse_config("[keyboard]\nrate=50\non_enable=/bin/true\n", None).unwrap();
    let dispatcher = Dispatcher::new(config, RecordingRepeat::default(), ShellHookRunner::new());

    let outcome = dispatcher.dispatch(DeviceTransition::enabled(7));

    assert_eq!(outcome.repeat_applied, Some(true));
    assert!(matches!(outcome.hook, HookOutcome::Exited(status) if status.code() == Some(0)));
}

#[test]
fn test_hook_sees_xinputid() {
    let config = parse_config(
        "[keyboard]\nrate=50\non_enable=test \"$XINPUTID\" = 7\n",
        None,
    )
    .unwrap();
    let repeat = RecordingRepeat::default();
    let dispatcher = Dispatcher::new(config, &repeat, ShellHookRunner::new());

    let outcome = dispatcher.dispatch(DeviceTransition::enabled(7));

    assert!(matches!(outcome.hook, HookOutcome::Exited(status) if status.success()));
    assert_eq!(*repeat.calls.borrow(), vec![(7, 200, 20)]);
}

#[test]
fn test_loop_normalizes_core_keyboard_then_follows_hotplug() {
    let config = parse_config(
        "[keyboard]\ndelay = 250\nrate = 40\n[scripts]\non_enable = true\non_disable = true\n",
        None,
    )
    .unwrap();
    let repeat = RecordingRepeat::default();
    let hooks = RecordingHooks::default();
    let mut dispatcher = Dispatcher::new(config, &repeat, &hooks);

    let source = ScriptedSource::new(vec![
        // mouse plugged in
        Some(change(vec![record(9, DeviceUse::SlavePointer, DEVICE_ENABLED)])),
        // undecodable event
        None,
        // keyboard plugged in, its master is reported alongside
        Some(change(vec![
            record(3, DeviceUse::MasterKeyboard, DEVICE_ENABLED),
            record(12, DeviceUse::SlaveKeyboard, DEVICE_ENABLED),
        ])),
        // keyboard unplugged
        Some(change(vec![record(12, DeviceUse::SlaveKeyboard, DEVICE_DISABLED)])),
    ]);

    let err = EventLoop::new(source).run(&mut dispatcher).unwrap_err();
    assert!(matches!(err, EventLoopError::Closed));

    assert_eq!(
        *repeat.calls.borrow(),
        vec![(CORE_KEYBOARD, 250, 25), (12, 250, 25)]
    );
    assert_eq!(
        *hooks.calls.borrow(),
        vec![("true".to_string(), 12), ("true".to_string(), 12)]
    );
}

#[test]
fn test_both_flags_run_enable_hook_before_disable_hook() {
    let config = parse_config(
        "[scripts]\non_connect = echo up\non_disconnect = echo down\n",
        None,
    )
    .unwrap();
    let repeat = RecordingRepeat::default();
    let hooks = RecordingHooks::default();
    let mut dispatcher = Dispatcher::new(config, &repeat, &hooks);

    let source = ScriptedSource::new(vec![Some(change(vec![record(
        5,
        DeviceUse::SlaveKeyboard,
        DEVICE_ENABLED | DEVICE_DISABLED,
    )]))]);
    let _ = EventLoop::new(source).run(&mut dispatcher);

    // core keyboard at startup, then the enable half of the record
    assert_eq!(*repeat.calls.borrow(), vec![(CORE_KEYBOARD, 200, 20), (5, 200, 20)]);
    assert_eq!(
        *hooks.calls.borrow(),
        vec![("echo up".to_string(), 5), ("echo down".to_string(), 5)]
    );
}

#[test]
fn test_failing_hook_does_not_stop_the_loop() {
    let config = parse_config("[keyboard]\non_enable = exit 3\n", None).unwrap();
    let repeat = RecordingRepeat::default();
    let hooks = RecordingHooks::default();
    let mut dispatcher = Dispatcher::new(config, &repeat, &hooks);

    let source = ScriptedSource::new(vec![
        Some(change(vec![record(20, DeviceUse::SlaveKeyboard, DEVICE_ENABLED)])),
        Some(change(vec![record(21, DeviceUse::SlaveKeyboard, DEVICE_ENABLED)])),
    ]);
    let err = EventLoop::new(source).run(&mut dispatcher).unwrap_err();

    assert!(matches!(err, EventLoopError::Closed));
    assert_eq!(hooks.calls.borrow().len(), 2);
    assert_eq!(repeat.calls.borrow().len(), 3);
}
