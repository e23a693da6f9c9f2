// Xautocfg Event Handling
// Device hierarchy changes and the blocking event loop

pub mod hierarchy;
pub mod r#loop;

pub use hierarchy::{DeviceId, DeviceTransition, DeviceUse, HierarchyChange, HierarchyInfo};
pub use r#loop::{EventLoop, EventLoopError, EventLoopResult, HierarchySource, TransitionHandler};
