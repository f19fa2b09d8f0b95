use super::accessibility::{self, AXWindow};
use crate::action::ModifierKey;
use crate::screen::ScreenDescriptor;
use crate::window_system::{InputSource, ScreenOverlay, WindowError, WindowSystem};
use crate::{Point, Rect, Result};
use core_graphics::display::CGDisplay;
use core_graphics::event::{CGEvent, CGEventFlags};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use log::{debug, warn};
use std::cell::Cell;
use std::collections::BTreeSet;

/// Height of the system menu bar on the main display. CoreGraphics exposes
/// no Dock or menu-bar insets, so visible frames use this estimate and leave
/// the Dock out.
const MENU_BAR_HEIGHT: f64 = 25.0;

const COMBINED_SESSION_STATE: i32 = 0;

const KEY_ESCAPE: u16 = 0x35;

/// Virtual keycodes polled for chords, by the names keybinds use.
const KEYCODES: [(&str, u16); 34] = [
    ("a", 0x00),
    ("b", 0x0B),
    ("c", 0x08),
    ("d", 0x02),
    ("e", 0x0E),
    ("f", 0x03),
    ("g", 0x05),
    ("h", 0x04),
    ("i", 0x22),
    ("j", 0x26),
    ("k", 0x28),
    ("l", 0x25),
    ("m", 0x2E),
    ("n", 0x2D),
    ("o", 0x1F),
    ("p", 0x23),
    ("q", 0x0C),
    ("r", 0x0F),
    ("s", 0x01),
    ("t", 0x11),
    ("u", 0x20),
    ("v", 0x09),
    ("w", 0x0D),
    ("x", 0x07),
    ("y", 0x10),
    ("z", 0x06),
    ("return", 0x24),
    ("space", 0x31),
    ("tab", 0x30),
    ("left", 0x7B),
    ("right", 0x7C),
    ("down", 0x7D),
    ("up", 0x7E),
    ("delete", 0x33),
];

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventSourceFlagsState(state: i32) -> u64;
    fn CGEventSourceKeyState(state: i32, key: u16) -> bool;

    fn SLSMainConnectionID() -> i32;
    fn SLSDisableUpdate(cid: i32) -> i32;
    fn SLSReenableUpdate(cid: i32) -> i32;
}

pub struct MacOSWindowSystem {
    connection: i32,
    updates_disabled: Cell<bool>,
}

impl MacOSWindowSystem {
    pub fn new() -> Result<Self> {
        if !accessibility::is_trusted() {
            anyhow::bail!("accessibility permissions are required to move windows");
        }
        let connection = unsafe { SLSMainConnectionID() };
        debug!("Connected to window server as {}", connection);
        Ok(Self {
            connection,
            updates_disabled: Cell::new(false),
        })
    }

    fn flags(&self) -> CGEventFlags {
        CGEventFlags::from_bits_truncate(unsafe { CGEventSourceFlagsState(COMBINED_SESSION_STATE) })
    }

    fn key_down(&self, keycode: u16) -> bool {
        unsafe { CGEventSourceKeyState(COMBINED_SESSION_STATE, keycode) }
    }
}

fn to_rect(bounds: core_graphics::geometry::CGRect) -> Rect {
    Rect::new(
        bounds.origin.x,
        bounds.origin.y,
        bounds.size.width,
        bounds.size.height,
    )
}

impl WindowSystem for MacOSWindowSystem {
    type Window = AXWindow;

    fn frontmost_window(&self) -> std::result::Result<Option<AXWindow>, WindowError> {
        accessibility::focused_window()
    }

    /// Active displays, main display first. Frames use the global top-left
    /// space of the main display.
    fn screens(&self) -> std::result::Result<Vec<ScreenDescriptor>, WindowError> {
        let ids = CGDisplay::active_displays()
            .map_err(|e| WindowError::Backend(format!("CGGetActiveDisplayList failed: {}", e)))?;
        let main = CGDisplay::main().id;

        let mut screens: Vec<ScreenDescriptor> = ids
            .into_iter()
            .map(|id| {
                let frame = to_rect(CGDisplay::new(id).bounds());
                let visible = if id == main {
                    frame.inset(MENU_BAR_HEIGHT, 0.0, 0.0, 0.0)
                } else {
                    frame
                };
                ScreenDescriptor::new(id, frame, visible)
            })
            .collect();
        screens.sort_by_key(|s| s.id != main);
        Ok(screens)
    }

    fn cursor_location(&self) -> std::result::Result<Point, WindowError> {
        let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState)
            .map_err(|_| WindowError::Backend("failed to create event source".into()))?;
        let event = CGEvent::new(source)
            .map_err(|_| WindowError::Backend("failed to create event".into()))?;
        let location = event.location();
        Ok(Point::new(location.x, location.y))
    }
}

impl InputSource for MacOSWindowSystem {
    fn modifier_held(&self, modifier: ModifierKey) -> bool {
        let flag = match modifier {
            ModifierKey::Fn => CGEventFlags::CGEventFlagSecondaryFn,
            ModifierKey::Ctrl => CGEventFlags::CGEventFlagControl,
            ModifierKey::Alt => CGEventFlags::CGEventFlagAlternate,
            ModifierKey::Shift => CGEventFlags::CGEventFlagShift,
            ModifierKey::Cmd => CGEventFlags::CGEventFlagCommand,
        };
        self.flags().contains(flag)
    }

    fn escape_pressed(&self) -> bool {
        self.key_down(KEY_ESCAPE)
    }

    fn pressed_keys(&self) -> BTreeSet<String> {
        KEYCODES
            .iter()
            .filter(|(_, code)| self.key_down(*code))
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

/// Freezes the whole display rather than covering `region`; the window
/// server offers no cheaper way to hide a single frame.
impl ScreenOverlay for MacOSWindowSystem {
    fn suppress(&self, region: Rect) -> std::result::Result<(), WindowError> {
        if self.updates_disabled.get() {
            return Ok(());
        }
        let result = unsafe { SLSDisableUpdate(self.connection) };
        if result != 0 {
            return Err(WindowError::Backend(format!("SLSDisableUpdate failed: {}", result)));
        }
        debug!("Screen updates disabled around {:?}", region);
        self.updates_disabled.set(true);
        Ok(())
    }

    fn reveal(&self) {
        if !self.updates_disabled.replace(false) {
            return;
        }
        let result = unsafe { SLSReenableUpdate(self.connection) };
        if result != 0 {
            warn!("SLSReenableUpdate failed: {}", result);
        }
    }
}

impl Drop for MacOSWindowSystem {
    fn drop(&mut self) {
        self.reveal();
    }
}
