//! Accessibility and CoreGraphics backend.

mod accessibility;
mod window_system;

pub use accessibility::AXWindow;
pub use window_system::MacOSWindowSystem;
