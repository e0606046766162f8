use serde::{Deserialize, Serialize};

use crate::layout_engine::Rect;

#[allow(non_camel_case_types)]
pub type pid_t = i32;

/// One entry of the on-screen window list, as enumerated, before any
/// eligibility filtering. `bounds` is in raw space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWindow {
    pub owner_name: String,
    pub owner_pid: pid_t,
    pub title: String,
    pub layer: i64,
    pub alpha: f64,
    pub bounds: Rect,
}

impl RawWindow {
    /// Whether this entry may take part in navigation at all.
    pub fn is_candidate(&self, include_untitled: bool) -> bool {
        if self.layer != 0 || self.alpha <= 0.0 {
            return false;
        }
        if self.bounds.is_empty() {
            return false;
        }
        include_untitled || !self.title.trim().is_empty()
    }
}

/// A navigation candidate. Both rectangles describe the same window:
/// `raw_bounds` as enumerated, `global_bounds` after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub owner_pid: pid_t,
    pub owner_name: String,
    pub title: String,
    pub raw_bounds: Rect,
    pub global_bounds: Rect,
}

impl WindowRecord {
    pub fn new(raw: RawWindow, global_bounds: Rect) -> Self {
        Self {
            owner_pid: raw.owner_pid,
            owner_name: raw.owner_name,
            title: raw.title,
            raw_bounds: raw.bounds,
            global_bounds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusedContext {
    pub raw_bounds: Rect,
}
