//! Accessibility access to other applications' windows.

use std::ffi::c_void;
use std::ptr::{self, NonNull};

use objc2_application_services::{AXError, AXIsProcessTrusted, AXUIElement, AXValue, AXValueType};
use objc2_core_foundation::{CFArray, CFRetained, CFString, CFType, CGPoint, CGSize};
use tracing::trace;

use super::app;
use super::error::QueryError;
use super::geometry::frame_from;
use crate::layout_engine::Rect;
use crate::model::pid_t;
use crate::nav::Accessibility;

/// Whether this process may observe and control other applications.
pub fn is_process_trusted() -> bool { unsafe { AXIsProcessTrusted() } }

/// A retained `AXUIElement`.
#[derive(Clone)]
pub struct AxElement(CFRetained<AXUIElement>);

impl AxElement {
    pub fn system_wide() -> AxElement { AxElement(unsafe { AXUIElement::new_system_wide() }) }

    pub fn application(pid: pid_t) -> AxElement {
        AxElement(unsafe { AXUIElement::new_application(pid) })
    }

    fn copy(&self, attribute: &'static str) -> Result<CFRetained<CFType>, QueryError> {
        let name = CFString::from_static_str(attribute);
        let mut value: *const CFType = ptr::null();
        let code = unsafe { self.0.copy_attribute_value(&name, NonNull::from(&mut value)) };
        ax_result(attribute, code)?;
        let value = NonNull::new(value.cast_mut()).ok_or(QueryError::BadValue(attribute))?;
        // SAFETY: a successful copy hands over one retain count.
        Ok(unsafe { CFRetained::from_raw(value) })
    }

    fn element(&self, attribute: &'static str) -> Result<AxElement, QueryError> {
        self.copy(attribute)?
            .downcast::<AXUIElement>()
            .map(AxElement)
            .map_err(|_| QueryError::BadValue(attribute))
    }

    fn set(&self, attribute: &'static str, value: &CFType) -> Result<(), QueryError> {
        let name = CFString::from_static_str(attribute);
        let code = unsafe { self.0.set_attribute_value(&name, value) };
        ax_result(attribute, code)
    }

    fn perform(&self, action: &'static str) -> Result<(), QueryError> {
        let name = CFString::from_static_str(action);
        let code = unsafe { self.0.perform_action(&name) };
        ax_result(action, code)
    }

    fn value<T>(&self, attribute: &'static str, kind: AXValueType, mut out: T) -> Result<T, QueryError> {
        let value = self
            .copy(attribute)?
            .downcast::<AXValue>()
            .map_err(|_| QueryError::BadValue(attribute))?;
        let ok = unsafe { value.value(kind, NonNull::from(&mut out).cast::<c_void>()) };
        if ok { Ok(out) } else { Err(QueryError::BadValue(attribute)) }
    }

    /// Frame from `AXPosition` and `AXSize`, top-left origin.
    pub fn frame(&self) -> Result<Rect, QueryError> {
        let origin = self.value("AXPosition", AXValueType::CGPoint, CGPoint::new(0.0, 0.0))?;
        let size = self.value("AXSize", AXValueType::CGSize, CGSize::new(0.0, 0.0))?;
        Ok(frame_from(origin, size))
    }

    pub fn windows(&self) -> Result<Vec<AxElement>, QueryError> {
        let array = self
            .copy("AXWindows")?
            .downcast::<CFArray>()
            .map_err(|_| QueryError::BadValue("AXWindows"))?;
        // SAFETY: `AXWindows` is an array of `AXUIElement`.
        let array: &CFArray<AXUIElement> = unsafe { array.cast_unchecked() };
        Ok(array.iter().map(AxElement).collect())
    }

    pub fn raise(&self) -> Result<(), QueryError> { self.perform("AXRaise") }
}

fn ax_result(call: &'static str, code: AXError) -> Result<(), QueryError> {
    if code == AXError::Success { Ok(()) } else { Err(QueryError::Ax { call, code: code.0 }) }
}

/// Frame of the window that has keyboard focus, in raw space.
pub fn focused_window_frame() -> Result<Rect, QueryError> {
    let app = AxElement::system_wide()
        .element("AXFocusedApplication")
        .map_err(|_| QueryError::NoFocusedWindow)?;
    let window = app.element("AXFocusedWindow").map_err(|_| QueryError::NoFocusedWindow)?;
    window.frame()
}

/// Accessibility control of live applications.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAccessibility;

impl Accessibility for SystemAccessibility {
    type Handle = AxElement;

    fn live_windows(&self, pid: pid_t) -> Result<Vec<(AxElement, Rect)>, QueryError> {
        let windows = AxElement::application(pid).windows()?;
        let live: Vec<_> = windows
            .into_iter()
            .filter_map(|window| {
                let frame = window.frame().ok()?;
                Some((window, frame))
            })
            .collect();
        trace!(pid, count = live.len(), "live windows");
        Ok(live)
    }

    fn raise(&self, window: &AxElement) -> Result<(), QueryError> { window.raise() }

    fn set_focused_window(&self, pid: pid_t, window: &AxElement) -> Result<(), QueryError> {
        AxElement::application(pid).set("AXFocusedWindow", &window.0)
    }

    fn activate_process(&self, pid: pid_t) -> Result<(), QueryError> { app::activate(pid) }
}
