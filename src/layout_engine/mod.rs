mod direction;
pub mod geometry;
pub mod selector;

pub use direction::{Direction, Orientation};
pub use geometry::{FRAME_TOLERANCE, Point, Rect};
pub use selector::select_target;
