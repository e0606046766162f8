//! Picks the window to focus next from a focused rectangle and a direction.
//!
//! Candidates are compared by their `global_bounds`. The focused rectangle
//! must already be in the same space.

use std::cmp::Ordering;

use tracing::trace;

use super::direction::{Direction, Orientation};
use super::geometry::{FRAME_TOLERANCE, Point, Rect, horizontal_overlap, vertical_overlap};
use crate::model::WindowRecord;

/// Returns the window to focus when moving from `focused` towards
/// `direction`, or `None` when there is nothing else to focus.
///
/// The nearest window lying strictly beyond the focused center and sharing
/// extent on the perpendicular axis wins; distance along the axis is
/// compared first, then the perpendicular center offset. When no such
/// window exists the selection wraps to the window at the opposite extreme
/// of the layout. Ties keep enumeration order.
pub fn select_target<'a>(
    focused: Rect,
    direction: Direction,
    windows: &'a [WindowRecord],
) -> Option<&'a WindowRecord> {
    // The window list runs front to back, so the first match is the focused
    // window. Later matches are other windows stacked on top of it.
    let own = windows.iter().position(|w| is_focused_window(&focused, w));
    let candidates: Vec<&WindowRecord> = windows
        .iter()
        .enumerate()
        .filter(|&(i, _)| Some(i) != own)
        .map(|(_, w)| w)
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let origin = focused.center();
    let mut primary: Vec<(f64, f64, &WindowRecord)> = candidates
        .iter()
        .filter(|w| perpendicular_overlap(direction, &focused, &w.global_bounds) > 0.0)
        .filter_map(|w| {
            let (along, across) = offsets(direction, origin, w.global_bounds.center());
            (along > 0.0).then_some((along, across.abs(), *w))
        })
        .collect();

    if !primary.is_empty() {
        // `sort_by` is stable, so equal keys keep enumeration order.
        primary.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
        let (along, across, target) = primary[0];
        trace!(?direction, along, across, title = %target.title, "directional neighbor");
        return Some(target);
    }

    let target = wrap_around(direction, &candidates);
    if let Some(target) = target {
        trace!(?direction, title = %target.title, "wrapped around");
    }
    target
}

/// Whether a record's bounds coincide with the focused rectangle.
fn is_focused_window(focused: &Rect, window: &WindowRecord) -> bool {
    window.global_bounds.approx_eq(focused, FRAME_TOLERANCE)
}

fn perpendicular_overlap(direction: Direction, a: &Rect, b: &Rect) -> f64 {
    match direction.orientation() {
        Orientation::Horizontal => vertical_overlap(a, b),
        Orientation::Vertical => horizontal_overlap(a, b),
    }
}

/// Signed distance travelled along the direction and the perpendicular
/// offset, from `origin` to `to`.
fn offsets(direction: Direction, origin: Point, to: Point) -> (f64, f64) {
    match direction.orientation() {
        Orientation::Horizontal => ((to.x - origin.x) * direction.sign(), to.y - origin.y),
        Orientation::Vertical => ((to.y - origin.y) * direction.sign(), to.x - origin.x),
    }
}

/// The candidate furthest back along the direction: moving right wraps to
/// the leftmost center, moving up wraps to the lowest.
fn wrap_around<'a>(
    direction: Direction,
    candidates: &[&'a WindowRecord],
) -> Option<&'a WindowRecord> {
    let key = |w: &WindowRecord| {
        let c = w.global_bounds.center();
        let along = match direction.orientation() {
            Orientation::Horizontal => c.x,
            Orientation::Vertical => c.y,
        };
        along * direction.sign()
    };

    let mut best: Option<(f64, &WindowRecord)> = None;
    for &w in candidates {
        let k = key(w);
        match best {
            Some((best_k, _)) if k.total_cmp(&best_k) != Ordering::Less => {}
            _ => best = Some((k, w)),
        }
    }
    best.map(|(_, w)| w)
}
