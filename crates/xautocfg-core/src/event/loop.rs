// Xautocfg Event Loop
// Blocking loop over hierarchy-change notifications

use std::convert::Infallible;

use super::hierarchy::{DeviceTransition, HierarchyChange};

/// Result type for event loop operations
pub type EventLoopResult<T> = Result<T, EventLoopError>;

/// Errors that end the event loop or prevent it from starting
#[derive(Debug, thiserror::Error)]
pub enum EventLoopError {
    #[cfg(feature = "x11-backend")]
    #[error("failed to connect to X display: {0}")]
    Connect(#[from] x11rb::errors::ConnectError),

    #[cfg(feature = "x11-backend")]
    #[error("X connection error: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    #[cfg(feature = "x11-backend")]
    #[error("X request failed: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),

    #[error("no {0} extension")]
    MissingExtension(&'static str),

    #[error("{extension} version {major}.{minor} is too old")]
    UnsupportedVersion {
        extension: &'static str,
        major: u16,
        minor: u16,
    },

    #[error("event source closed")]
    Closed,
}

/// Blocking producer of hierarchy changes.
pub trait HierarchySource {
    /// Wait for the next event.
    ///
    /// `Ok(None)` means an event arrived but carried no usable hierarchy
    /// change; the loop discards it. Errors are fatal.
    fn next_change(&self) -> EventLoopResult<Option<HierarchyChange>>;
}

impl<T: HierarchySource + ?Sized> HierarchySource for &T {
    fn next_change(&self) -> EventLoopResult<Option<HierarchyChange>> {
        (**self).next_change()
    }
}

/// Consumer of keyboard transitions
pub trait TransitionHandler {
    /// Called once before the first event is awaited
    fn on_start(&mut self) {}

    fn on_transition(&mut self, transition: DeviceTransition);
}

/// Single-threaded loop feeding transitions to a handler.
///
/// Transitions are handled one at a time in payload order; the next event
/// is not read until the handler returned.
pub struct EventLoop<S> {
    source: S,
}

impl<S: HierarchySource> EventLoop<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Process a single hierarchy change, returning how many transitions
    /// were dispatched
    pub fn dispatch_change<H: TransitionHandler>(
        &self,
        change: &HierarchyChange,
        handler: &mut H,
    ) -> usize {
        if !change.touches_enabled_state() {
            log::trace!("hierarchy change without enable/disable flags, skipping");
            return 0;
        }

        let transitions = change.transitions();
        for transition in &transitions {
            log::debug!(
                "device={} {}",
                transition.device_id,
                if transition.became_enabled { "enabled" } else { "disabled" }
            );
            handler.on_transition(*transition);
        }
        transitions.len()
    }

    /// Run until the source fails.
    ///
    /// There is no normal termination; the only way out is an error from
    /// the event source.
    pub fn run<H: TransitionHandler>(&self, handler: &mut H) -> EventLoopResult<Infallible> {
        handler.on_start();

        log::info!("processing events...");
        loop {
            if let Some(change) = self.source.next_change()? {
                self.dispatch_change(&change, handler);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::hierarchy::{DeviceUse, HierarchyInfo, DEVICE_DISABLED, DEVICE_ENABLED};
    use std::cell::RefCell;
    use std::collections::VecDeque;

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

    #[derive(Default)]
    struct Recorder {
        started: usize,
        seen: Vec<DeviceTransition>,
    }

    impl TransitionHandler for Recorder {
        fn on_start(&mut self) {
            self.started += 1;
        }

        fn on_transition(&mut self, transition: DeviceTransition) {
            self.seen.push(transition);
        }
    }

    fn keyboard(device_id: u16, flags: u32) -> HierarchyChange {
        HierarchyChange {
            flags,
            infos: vec![HierarchyInfo {
                device_id,
                device_use: DeviceUse::SlaveKeyboard,
                flags,
            }],
        }
    }

    #[test]
    fn test_run_dispatches_in_order_until_source_closes() {
        let source = ScriptedSource::new(vec![
            Some(keyboard(10, DEVICE_ENABLED)),
            None,
            Some(keyboard(11, DEVICE_DISABLED)),
            Some(keyboard(12, DEVICE_ENABLED)),
        ]);
        let event_loop = EventLoop::new(source);
        let mut recorder = Recorder::default();

        let err = event_loop.run(&mut recorder).unwrap_err();
        assert!(matches!(err, EventLoopError::Closed));
        assert_eq!(recorder.started, 1);
        assert_eq!(
            recorder.seen,
            vec![
                DeviceTransition::enabled(10),
                DeviceTransition::disabled(11),
                DeviceTransition::enabled(12),
            ]
        );
    }

    #[test]
    fn test_start_hook_runs_before_first_event() {
        let event_loop = EventLoop::new(ScriptedSource::new(vec![]));
        let mut recorder = Recorder::default();

        assert!(event_loop.run(&mut recorder).is_err());
        assert_eq!(recorder.started, 1);
        assert!(recorder.seen.is_empty());
    }

    #[test]
    fn test_dispatch_change_skips_unflagged_changes() {
        let event_loop = EventLoop::new(ScriptedSource::new(vec![]));
        let mut recorder = Recorder::default();

        let mut change = keyboard(10, DEVICE_ENABLED);
        change.flags = 0;
        assert_eq!(event_loop.dispatch_change(&change, &mut recorder), 0);
        assert!(recorder.seen.is_empty());
    }
}
