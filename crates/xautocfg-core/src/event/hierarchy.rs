// Xautocfg Hierarchy Decoding
// Turns XI2 hierarchy-change payloads into keyboard enable/disable transitions

use smallvec::SmallVec;

/// XInput device id, also used as XKB device spec
pub type DeviceId = u16;

/// `XIDeviceEnabled` hierarchy flag
pub const DEVICE_ENABLED: u32 = 1 << 6;

/// `XIDeviceDisabled` hierarchy flag
pub const DEVICE_DISABLED: u32 = 1 << 7;

/// A keyboard that was just enabled or disabled.
///
/// Produced per hierarchy record and handed to the dispatcher right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceTransition {
    pub device_id: DeviceId,
    pub became_enabled: bool,
}

impl DeviceTransition {
    pub fn enabled(device_id: DeviceId) -> Self {
        Self {
            device_id,
            became_enabled: true,
        }
    }

    pub fn disabled(device_id: DeviceId) -> Self {
        Self {
            device_id,
            became_enabled: false,
        }
    }
}

/// Role of a device in the XI2 hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceUse {
    MasterPointer,
    MasterKeyboard,
    SlavePointer,
    SlaveKeyboard,
    FloatingSlave,
    Other(u32),
}

impl From<u32> for DeviceUse {
    fn from(raw: u32) -> Self {
        match raw {
            1 => DeviceUse::MasterPointer,
            2 => DeviceUse::MasterKeyboard,
            3 => DeviceUse::SlavePointer,
            4 => DeviceUse::SlaveKeyboard,
            5 => DeviceUse::FloatingSlave,
            other => DeviceUse::Other(other),
        }
    }
}

/// One per-device record of a hierarchy change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyInfo {
    pub device_id: DeviceId,
    pub device_use: DeviceUse,
    pub flags: u32,
}

/// Payload of a hierarchy-change event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HierarchyChange {
    /// Union of the flags of all records
    pub flags: u32,
    pub infos: Vec<HierarchyInfo>,
}

impl HierarchyChange {
    /// Whether any device was enabled or disabled by this change
    pub fn touches_enabled_state(&self) -> bool {
        self.flags & (DEVICE_ENABLED | DEVICE_DISABLED) != 0
    }

    /// Keyboard transitions in payload order.
    ///
    /// Only slave keyboards count. A record carrying both flags yields the
    /// enable transition first, then the disable transition.
    pub fn transitions(&self) -> SmallVec<[DeviceTransition; 4]> {
        let mut transitions = SmallVec::new();
        if !self.touches_enabled_state() {
            return transitions;
        }

        for info in &self.infos {
            if info.device_use != DeviceUse::SlaveKeyboard {
                continue;
            }
            if info.flags & DEVICE_ENABLED != 0 {
                transitions.push(DeviceTransition::enabled(info.device_id));
            }
            if info.flags & DEVICE_DISABLED != 0 {
                transitions.push(DeviceTransition::disabled(info.device_id));
            }
        }

        transitions
    }
}

#[cfg(feature = "x11-backend")]
impl From<&x11rb::protocol::xinput::HierarchyEvent> for HierarchyChange {
    fn from(event: &x11rb::protocol::xinput::HierarchyEvent) -> Self {
        let infos = event
            .infos
            .iter()
            .map(|info| HierarchyInfo {
                device_id: info.deviceid,
                device_use: DeviceUse::from(u32::from(info.type_)),
                flags: u32::from(info.flags),
            })
            .collect();

        Self {
            flags: u32::from(event.flags),
            infos,
        }
    }
}
