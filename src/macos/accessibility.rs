#![allow(non_upper_case_globals)]

use crate::window_system::{WindowError, WindowHandle};
use crate::{Point, Rect, Size, WindowId};
use core_foundation::base::{CFRelease, CFTypeRef, TCFType};
use core_foundation::string::{CFString, CFStringRef};
use log::{debug, info, warn};
use std::os::raw::{c_double, c_void};

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXUIElementCreateSystemWide() -> AXUIElementRef;
    fn AXUIElementCopyAttributeValue(
        element: AXUIElementRef,
        attribute: CFStringRef,
        value: *mut CFTypeRef,
    ) -> AXError;
    fn AXUIElementSetAttributeValue(
        element: AXUIElementRef,
        attribute: CFStringRef,
        value: CFTypeRef,
    ) -> AXError;
    fn AXIsProcessTrusted() -> bool;
    fn AXValueCreate(value_type: AXValueType, value_ptr: *const c_void) -> CFTypeRef;
    fn AXValueGetValue(value: CFTypeRef, value_type: AXValueType, value_ptr: *mut c_void) -> bool;
    fn _AXUIElementGetWindow(element: AXUIElementRef, window_id: *mut u32) -> AXError;
}

type AXUIElementRef = CFTypeRef;
type AXError = i32;
type AXValueType = u32;

const kAXValueCGPointType: AXValueType = 1;
const kAXValueCGSizeType: AXValueType = 2;

const kAXErrorSuccess: AXError = 0;
const kAXErrorInvalidUIElement: AXError = -25202;
const kAXErrorCannotComplete: AXError = -25204;

const kAXFocusedApplicationAttribute: &str = "AXFocusedApplication";
const kAXFocusedWindowAttribute: &str = "AXFocusedWindow";
const kAXPositionAttribute: &str = "AXPosition";
const kAXSizeAttribute: &str = "AXSize";

#[repr(C)]
#[derive(Default)]
struct CGPoint {
    x: c_double,
    y: c_double,
}

#[repr(C)]
#[derive(Default)]
struct CGSize {
    width: c_double,
    height: c_double,
}

pub fn is_trusted() -> bool {
    let trusted = unsafe { AXIsProcessTrusted() };
    if trusted {
        info!("Accessibility permissions granted");
    } else {
        warn!("Accessibility permissions not granted!");
        warn!("Grant them in System Settings > Privacy & Security > Accessibility.");
    }
    trusted
}

fn ax_error(code: AXError) -> WindowError {
    match code {
        kAXErrorInvalidUIElement | kAXErrorCannotComplete => WindowError::Invalid,
        other => WindowError::Backend(format!("accessibility error {}", other)),
    }
}

/// Copies `attribute` of `element`. The caller owns the returned reference.
unsafe fn copy_attribute(element: AXUIElementRef, attribute: &str) -> Result<CFTypeRef, AXError> {
    let name = CFString::new(attribute);
    let mut value: CFTypeRef = std::ptr::null();
    let result = AXUIElementCopyAttributeValue(element, name.as_concrete_TypeRef(), &mut value);
    if result != kAXErrorSuccess || value.is_null() {
        return Err(result);
    }
    Ok(value)
}

/// The focused window of the focused application, as an owned AX element.
pub fn focused_window() -> Result<Option<AXWindow>, WindowError> {
    unsafe {
        let system = AXUIElementCreateSystemWide();
        let app = copy_attribute(system, kAXFocusedApplicationAttribute);
        CFRelease(system);

        let app = match app {
            Ok(app) => app,
            Err(code) => {
                debug!("No focused application: {}", code);
                return Ok(None);
            }
        };

        let window = copy_attribute(app, kAXFocusedWindowAttribute);
        CFRelease(app);

        match window {
            Ok(element) => {
                let mut id: u32 = 0;
                if _AXUIElementGetWindow(element, &mut id) != kAXErrorSuccess {
                    debug!("Focused window has no window server id");
                }
                Ok(Some(AXWindow {
                    element,
                    id: WindowId(id),
                }))
            }
            Err(code) => {
                debug!("Focused application has no focused window: {}", code);
                Ok(None)
            }
        }
    }
}

/// A window reached through the Accessibility API. Owns one retain on the
/// underlying element.
pub struct AXWindow {
    element: AXUIElementRef,
    id: WindowId,
}

impl AXWindow {
    fn set_value(
        &self,
        attribute: &str,
        kind: AXValueType,
        value: *const c_void,
    ) -> Result<(), WindowError> {
        unsafe {
            let boxed = AXValueCreate(kind, value);
            if boxed.is_null() {
                return Err(WindowError::Backend(format!("failed to create {} value", attribute)));
            }
            let name = CFString::new(attribute);
            let result =
                AXUIElementSetAttributeValue(self.element, name.as_concrete_TypeRef(), boxed);
            CFRelease(boxed);
            if result != kAXErrorSuccess {
                return Err(ax_error(result));
            }
        }
        Ok(())
    }

    fn get_value<T: Default>(&self, attribute: &str, kind: AXValueType) -> Result<T, WindowError> {
        unsafe {
            let value = copy_attribute(self.element, attribute).map_err(ax_error)?;
            let mut out = T::default();
            let ok = AXValueGetValue(value, kind, &mut out as *mut T as *mut c_void);
            CFRelease(value);
            if ok {
                Ok(out)
            } else {
                Err(WindowError::Backend(format!("unreadable {} value", attribute)))
            }
        }
    }
}

impl WindowHandle for AXWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn frame(&self) -> Result<Rect, WindowError> {
        let origin: CGPoint = self.get_value(kAXPositionAttribute, kAXValueCGPointType)?;
        let size: CGSize = self.get_value(kAXSizeAttribute, kAXValueCGSizeType)?;
        Ok(Rect::new(origin.x, origin.y, size.width, size.height))
    }

    fn set_origin(&self, origin: Point) -> Result<(), WindowError> {
        let point = CGPoint {
            x: origin.x,
            y: origin.y,
        };
        self.set_value(
            kAXPositionAttribute,
            kAXValueCGPointType,
            &point as *const CGPoint as *const c_void,
        )
    }

    fn set_size(&self, size: Size) -> Result<(), WindowError> {
        let size = CGSize {
            width: size.width,
            height: size.height,
        };
        self.set_value(
            kAXSizeAttribute,
            kAXValueCGSizeType,
            &size as *const CGSize as *const c_void,
        )
    }
}

impl Drop for AXWindow {
    fn drop(&mut self) {
        unsafe {
            CFRelease(self.element);
        }
    }
}
