//! X11 backend using x11rb
//!
//! Owns the display connection. Provides hierarchy-change events from the
//! XInput2 extension and sets keyboard auto-repeat through XKB.

#![cfg(feature = "x11-backend")]

use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xinput::{self, ConnectionExt as _};
use x11rb::protocol::xkb::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{self, Window};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

use crate::action::{RepeatControl, RepeatError};
use crate::event::{DeviceId, EventLoopError, EventLoopResult, HierarchyChange, HierarchySource};

/// Live connection to the X server with hierarchy events selected
pub struct X11Session {
    conn: RustConnection,
    root: Window,
    xinput_opcode: u8,
}

impl X11Session {
    /// Connect to `display` (or `$DISPLAY`), check the XInput and XKB
    /// extensions and subscribe to hierarchy changes of all devices on
    /// the root window.
    pub fn open(display: Option<&str>) -> EventLoopResult<Self> {
        log::info!("connecting to x...");
        let (conn, screen_num) = x11rb::connect(display)?;
        let root = conn.setup().roots[screen_num].root;

        let xinput_opcode = conn
            .extension_information(xinput::X11_EXTENSION_NAME)?
            .ok_or(EventLoopError::MissingExtension(xinput::X11_EXTENSION_NAME))?
            .major_opcode;

        let version = conn.xinput_xi_query_version(2, 0)?.reply()?;
        if version.major_version < 2 {
            return Err(EventLoopError::UnsupportedVersion {
                extension: xinput::X11_EXTENSION_NAME,
                major: version.major_version,
                minor: version.minor_version,
            });
        }

        conn.extension_information(xkb::X11_EXTENSION_NAME)?
            .ok_or(EventLoopError::MissingExtension(xkb::X11_EXTENSION_NAME))?;
        let xkb = conn.xkb_use_extension(1, 0)?.reply()?;
        if !xkb.supported {
            return Err(EventLoopError::UnsupportedVersion {
                extension: xkb::X11_EXTENSION_NAME,
                major: xkb.server_major,
                minor: xkb.server_minor,
            });
        }

        let session = Self {
            conn,
            root,
            xinput_opcode,
        };
        session.select_hierarchy_events()?;
        Ok(session)
    }

    fn select_hierarchy_events(&self) -> EventLoopResult<()> {
        let mask = xinput::EventMask {
            deviceid: xinput::Device::ALL.into(),
            mask: vec![xinput::XIEventMask::HIERARCHY],
        };
        self.conn
            .xinput_xi_select_events(self.root, &[mask])?
            .check()?;
        self.conn.flush()?;
        Ok(())
    }

    pub fn xinput_opcode(&self) -> u8 {
        self.xinput_opcode
    }
}

impl HierarchySource for X11Session {
    fn next_change(&self) -> EventLoopResult<Option<HierarchyChange>> {
        let raw = self.conn.wait_for_raw_event()?;

        let event = match self.conn.parse_event(&raw) {
            Ok(event) => event,
            Err(e) => {
                log::debug!("failed to decode event payload: {}", e);
                return Ok(None);
            }
        };

        match event {
            Event::XinputHierarchy(hierarchy) if hierarchy.extension == self.xinput_opcode => {
                Ok(Some(HierarchyChange::from(&hierarchy)))
            }
            Event::Error(error) => {
                log::warn!("X error: {:?}", error);
                Ok(None)
            }
            other => {
                log::trace!("ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }
}

/// `XkbRepeatKeysMask`, the RepeatKeys bit of a SetControls change mask.
///
/// x11rb's `Control` only names the high bits; the boolean control bits are
/// shared with `BoolCtrl`.
fn repeat_keys_change_mask() -> xkb::Control {
    xkb::Control::from(u32::from(xkb::BoolCtrl::REPEAT_KEYS))
}

impl RepeatControl for X11Session {
    /// Equivalent of `XkbSetAutoRepeatRate`: only the RepeatKeys control
    /// is changed, everything else in the request is left at zero.
    fn set_auto_repeat_rate(
        &self,
        device_id: DeviceId,
        delay_ms: u32,
        interval_ms: u32,
    ) -> Result<(), RepeatError> {
        let out_of_range = || RepeatError::OutOfRange {
            delay_ms,
            interval_ms,
        };
        let delay = u16::try_from(delay_ms).map_err(|_| out_of_range())?;
        let interval = u16::try_from(interval_ms).map_err(|_| out_of_range())?;

        let no_mods = xproto::ModMask::from(0u8);
        let no_vmods = xkb::VMod::from(0u8);
        let no_ax = xkb::AXOption::from(0u8);
        let no_ctrls = xkb::BoolCtrl::from(0u8);

        self.conn
            .xkb_set_controls(
                device_id,
                no_mods,
                no_mods,
                no_mods,
                no_mods,
                no_vmods,
                no_vmods,
                no_vmods,
                no_vmods,
                0,
                0,
                no_ax,
                no_ctrls,
                no_ctrls,
                repeat_keys_change_mask(),
                delay,
                interval,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                no_ctrls,
                no_ctrls,
                no_ax,
                no_ax,
                &[0; 32],
            )?
            .check()?;
        Ok(())
    }
}
