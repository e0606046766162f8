//! The on-screen window list as reported by the window server.

use objc2_core_foundation::{CFArray, CFDictionary, CFNumber, CFRetained, CFString, CFType};
use objc2_core_graphics::{CGWindowListCopyWindowInfo, CGWindowListOption, kCGNullWindowID};
use tracing::trace;

use super::axuielement;
use super::error::QueryError;
use crate::layout_engine::Rect;
use crate::model::RawWindow;
use crate::nav::WindowSource;

type WindowInfo = CFDictionary<CFString, CFType>;

struct Keys {
    owner_name: CFRetained<CFString>,
    owner_pid: CFRetained<CFString>,
    name: CFRetained<CFString>,
    layer: CFRetained<CFString>,
    alpha: CFRetained<CFString>,
    bounds: CFRetained<CFString>,
    x: CFRetained<CFString>,
    y: CFRetained<CFString>,
    width: CFRetained<CFString>,
    height: CFRetained<CFString>,
}

impl Keys {
    fn new() -> Keys {
        Keys {
            owner_name: CFString::from_static_str("kCGWindowOwnerName"),
            owner_pid: CFString::from_static_str("kCGWindowOwnerPID"),
            name: CFString::from_static_str("kCGWindowName"),
            layer: CFString::from_static_str("kCGWindowLayer"),
            alpha: CFString::from_static_str("kCGWindowAlpha"),
            bounds: CFString::from_static_str("kCGWindowBounds"),
            x: CFString::from_static_str("X"),
            y: CFString::from_static_str("Y"),
            width: CFString::from_static_str("Width"),
            height: CFString::from_static_str("Height"),
        }
    }
}

/// Every on-screen window, front to back, excluding desktop elements.
/// Entries without a readable pid or bounds are skipped.
pub fn on_screen_windows() -> Result<Vec<RawWindow>, QueryError> {
    let keys = Keys::new();
    let options =
        CGWindowListOption::OptionOnScreenOnly | CGWindowListOption::ExcludeDesktopElements;
    let list = unsafe { CGWindowListCopyWindowInfo(options, kCGNullWindowID) }
        .ok_or(QueryError::WindowListUnavailable)?;
    // SAFETY: every element of the window list is a dictionary keyed by
    // `CFString`.
    let list: &CFArray<WindowInfo> = unsafe { list.cast_unchecked() };

    let windows: Vec<RawWindow> = list.iter().filter_map(|info| read_entry(&info, &keys)).collect();
    trace!(count = windows.len(), "window list");
    Ok(windows)
}

fn number(info: &WindowInfo, key: &CFString) -> Option<CFRetained<CFNumber>> {
    info.get(key)?.downcast::<CFNumber>().ok()
}

fn string(info: &WindowInfo, key: &CFString) -> Option<String> {
    info.get(key)?.downcast::<CFString>().ok().map(|s| s.to_string())
}

fn read_entry(info: &WindowInfo, keys: &Keys) -> Option<RawWindow> {
    let owner_pid = number(info, &keys.owner_pid)?.as_i64()?;
    let bounds = read_bounds(info, keys)?;
    Some(RawWindow {
        owner_name: string(info, &keys.owner_name).unwrap_or_default(),
        owner_pid: i32::try_from(owner_pid).ok()?,
        title: string(info, &keys.name).unwrap_or_default(),
        layer: number(info, &keys.layer).and_then(|n| n.as_i64()).unwrap_or(0),
        alpha: number(info, &keys.alpha).and_then(|n| n.as_f64()).unwrap_or(1.0),
        bounds,
    })
}

fn read_bounds(info: &WindowInfo, keys: &Keys) -> Option<Rect> {
    let bounds = info.get(&keys.bounds)?.downcast::<CFDictionary>().ok()?;
    // SAFETY: `kCGWindowBounds` is a dictionary of `CFString` to `CFType`.
    let bounds: &WindowInfo = unsafe { bounds.cast_unchecked() };
    let value = |key: &CFString| number(bounds, key)?.as_f64();
    Some(Rect::new(
        value(&keys.x)?,
        value(&keys.y)?,
        value(&keys.width)?,
        value(&keys.height)?,
    ))
}

/// The window list for candidates and the accessibility layer for the
/// focused frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemWindows;

impl WindowSource for SystemWindows {
    fn visible_windows(&self, _include_untitled: bool) -> Result<Vec<RawWindow>, QueryError> {
        on_screen_windows()
    }

    fn focused_window_frame(&self) -> Result<Rect, QueryError> {
        axuielement::focused_window_frame()
    }
}
