use objc2_core_foundation::{CGPoint, CGRect, CGSize};

use crate::layout_engine::Rect;

pub trait ToRect {
    fn to_rect(&self) -> Rect;
}

impl ToRect for CGRect {
    fn to_rect(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.size.width, self.size.height)
    }
}

/// Frame of an accessibility element from its `AXPosition` and `AXSize`.
pub fn frame_from(origin: CGPoint, size: CGSize) -> Rect { CGRect::new(origin, size).to_rect() }
