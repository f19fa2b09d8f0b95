//! Traits that decouple the core from the platform window system.
//!
//! The macOS backend implements them on top of the Accessibility and
//! CoreGraphics APIs; tests implement them with in-memory mocks.

use crate::action::ModifierKey;
use crate::screen::ScreenDescriptor;
use crate::{Point, Rect, Size, WindowId};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WindowError {
    /// The window was closed or its handle went stale.
    #[error("window is no longer valid")]
    Invalid,
    #[error("no frontmost window")]
    NoWindow,
    #[error("window system error: {0}")]
    Backend(String),
}

/// A live window owned by another application.
///
/// Frames use global coordinates with a top-left origin, matching screen
/// frames reported by [`WindowSystem::screens`].
pub trait WindowHandle {
    fn id(&self) -> WindowId;

    fn frame(&self) -> Result<Rect, WindowError>;

    fn set_origin(&self, origin: Point) -> Result<(), WindowError>;

    fn set_size(&self, size: Size) -> Result<(), WindowError>;
}

pub trait WindowSystem {
    type Window: WindowHandle;

    fn frontmost_window(&self) -> Result<Option<Self::Window>, WindowError>;

    fn screens(&self) -> Result<Vec<ScreenDescriptor>, WindowError>;

    /// Cursor position in the same space as screen frames.
    fn cursor_location(&self) -> Result<Point, WindowError>;
}

/// Hides on-screen changes while a window is being manipulated out of sight.
pub trait ScreenOverlay {
    fn suppress(&self, region: Rect) -> Result<(), WindowError>;

    fn reveal(&self);
}

/// Polled keyboard state driving the interaction lifecycle.
pub trait InputSource {
    fn modifier_held(&self, modifier: ModifierKey) -> bool;

    fn escape_pressed(&self) -> bool;

    /// Non-modifier keys currently held, lowercased names.
    fn pressed_keys(&self) -> BTreeSet<String>;
}

impl<T: WindowSystem + ?Sized> WindowSystem for &T {
    type Window = T::Window;

    fn frontmost_window(&self) -> Result<Option<Self::Window>, WindowError> {
        (**self).frontmost_window()
    }

    fn screens(&self) -> Result<Vec<ScreenDescriptor>, WindowError> {
        (**self).screens()
    }

    fn cursor_location(&self) -> Result<Point, WindowError> {
        (**self).cursor_location()
    }
}

impl<T: ScreenOverlay + ?Sized> ScreenOverlay for &T {
    fn suppress(&self, region: Rect) -> Result<(), WindowError> {
        (**self).suppress(region)
    }

    fn reveal(&self) {
        (**self).reveal()
    }
}

impl<T: InputSource + ?Sized> InputSource for &T {
    fn modifier_held(&self, modifier: ModifierKey) -> bool {
        (**self).modifier_held(modifier)
    }

    fn escape_pressed(&self) -> bool {
        (**self).escape_pressed()
    }

    fn pressed_keys(&self) -> BTreeSet<String> {
        (**self).pressed_keys()
    }
}
