use tracing::{debug, trace};

use crate::common::config::FrameSpace;
use crate::layout_engine::Rect;

/// Converts raw (top-left origin, Y down) rectangles into a bottom-left
/// origin, Y up space.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateConverter {
    /// The y coordinate, in the target space, that raw `y = 0` maps to.
    /// For the single-screen rule this is the height of the main screen;
    /// for the global rule it is the highest top edge of any display.
    screen_height: f64,
}

/// Creates a `CoordinateConverter` that returns None for any conversion.
impl Default for CoordinateConverter {
    fn default() -> Self { Self { screen_height: f64::NAN } }
}

impl CoordinateConverter {
    pub fn from_height(height: f64) -> Self { Self { screen_height: height } }

    /// Single-screen rule: flip around the height of the main display.
    pub fn main_screen(frame: Rect) -> Self { Self::from_height(frame.height) }

    /// Multi-screen rule: flip around the highest top edge of the whole
    /// arrangement, so every display shares one space.
    pub fn global(frames: &[Rect]) -> Self {
        frames
            .iter()
            .map(|f| f.max_y())
            .reduce(f64::max)
            .map(Self::from_height)
            .unwrap_or_default()
    }

    pub fn screen_height(&self) -> Option<f64> {
        if self.screen_height.is_nan() {
            None
        } else {
            Some(self.screen_height)
        }
    }

    pub fn convert_rect(&self, rect: Rect) -> Option<Rect> {
        let height = self.screen_height()?;
        Some(Rect::new(rect.x, height - rect.max_y(), rect.width, rect.height))
    }
}

pub trait System {
    /// Frame of every active display, bottom-left origin.
    fn screen_frames(&self) -> Vec<Rect>;
    fn main_screen_frame(&self) -> Option<Rect>;
}

/// Display geometry, queried from the system on every call so that
/// arrangement changes between hotkey presses are picked up.
pub struct ScreenFrames<S: System> {
    system: S,
}

impl<S: System> ScreenFrames<S> {
    pub fn new_with(system: S) -> Self { Self { system } }

    pub fn global_converter(&self) -> CoordinateConverter {
        let frames = self.system.screen_frames();
        trace!(?frames, "screen frames");
        CoordinateConverter::global(&frames)
    }

    pub fn main_screen_converter(&self) -> CoordinateConverter {
        self.system.main_screen_frame().map(CoordinateConverter::main_screen).unwrap_or_default()
    }

    /// Normalizes the focused window's frame.
    ///
    /// This is best effort: when no display information is available the
    /// raw rectangle is returned unchanged, and navigation then compares it
    /// as-is rather than failing the whole request.
    pub fn focused_to_global(&self, raw: Rect, space: FrameSpace) -> Rect {
        let converted = match space {
            FrameSpace::Global => self
                .global_converter()
                .convert_rect(raw)
                .or_else(|| self.main_screen_converter().convert_rect(raw)),
            FrameSpace::MainScreen => self.main_screen_converter().convert_rect(raw),
        };
        converted.unwrap_or_else(|| {
            debug!(?raw, "no screen information; using raw focused frame");
            raw
        })
    }
}

#[cfg(target_os = "macos")]
pub use self::macos::Actual;

#[cfg(target_os = "macos")]
mod macos {
    use objc2_app_kit::NSScreen;
    use objc2_foundation::MainThreadMarker;

    use super::{ScreenFrames, System};
    use crate::layout_engine::Rect;
    use crate::sys::geometry::ToRect;

    pub struct Actual {
        mtm: MainThreadMarker,
    }

    impl ScreenFrames<Actual> {
        pub fn new(mtm: MainThreadMarker) -> Self { Self::new_with(Actual { mtm }) }
    }

    impl System for Actual {
        fn screen_frames(&self) -> Vec<Rect> {
            NSScreen::screens(self.mtm).iter().map(|s| s.frame().to_rect()).collect()
        }

        fn main_screen_frame(&self) -> Option<Rect> {
            NSScreen::mainScreen(self.mtm).map(|s| s.frame().to_rect())
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{CoordinateConverter, ScreenFrames, System};
    use crate::common::config::FrameSpace;
    use crate::layout_engine::Rect;

    struct Stub {
        frames: Vec<Rect>,
        main: Option<Rect>,
    }

    impl System for Stub {
        fn screen_frames(&self) -> Vec<Rect> { self.frames.clone() }

        fn main_screen_frame(&self) -> Option<Rect> { self.main }
    }

    fn laptop_with_monitor_above() -> Stub {
        let main = Rect::new(0.0, 0.0, 1512.0, 982.0);
        Stub {
            frames: vec![main, Rect::new(-200.0, 982.0, 2560.0, 1440.0)],
            main: Some(main),
        }
    }

    #[test]
    fn single_screen_rule_flips_around_main_height() {
        let converter = CoordinateConverter::main_screen(Rect::new(0.0, 0.0, 1440.0, 900.0));
        assert_eq!(
            converter.convert_rect(Rect::new(10.0, 25.0, 800.0, 600.0)),
            Some(Rect::new(10.0, 275.0, 800.0, 600.0))
        );
    }

    #[test]
    fn global_rule_uses_highest_top_edge() {
        let stub = laptop_with_monitor_above();
        let converter = CoordinateConverter::global(&stub.frames);
        assert_eq!(converter.screen_height(), Some(2422.0));
        assert_eq!(
            converter.convert_rect(Rect::new(100.0, -1440.0, 2560.0, 1440.0)),
            Some(Rect::new(100.0, 2422.0, 2560.0, 1440.0))
        );
    }

    #[test]
    fn conversion_preserves_size() {
        let stub = laptop_with_monitor_above();
        let raw = Rect::new(-50.0, 300.0, 640.0, 480.0);
        for converter in [
            CoordinateConverter::global(&stub.frames),
            CoordinateConverter::main_screen(stub.main.unwrap()),
        ] {
            let out = converter.convert_rect(raw).unwrap();
            assert_eq!((out.x, out.width, out.height), (raw.x, raw.width, raw.height));
        }
    }

    #[test]
    fn top_of_primary_display_is_highest_in_global_space() {
        let stub = laptop_with_monitor_above();
        let converter = CoordinateConverter::global(&stub.frames);
        let windows = [
            Rect::new(0.0, 0.0, 700.0, 400.0),
            Rect::new(0.0, 300.0, 700.0, 682.0),
            Rect::new(700.0, 120.0, 812.0, 500.0),
        ];
        let tops: Vec<f64> =
            windows.iter().map(|w| converter.convert_rect(*w).unwrap().max_y()).collect();
        assert_eq!(tops[0], converter.screen_height().unwrap());
        assert!(tops[1..].iter().all(|&t| t < tops[0]));
    }

    #[test]
    fn empty_arrangement_converts_nothing() {
        assert!(CoordinateConverter::global(&[]).convert_rect(Rect::default()).is_none());
        assert!(CoordinateConverter::default().screen_height().is_none());
    }

    #[test]
    fn focused_frame_falls_back_to_raw_without_screens() {
        let screens = ScreenFrames::new_with(Stub { frames: vec![], main: None });
        let raw = Rect::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(screens.focused_to_global(raw, FrameSpace::Global), raw);
        assert_eq!(screens.focused_to_global(raw, FrameSpace::MainScreen), raw);
    }

    #[test]
    fn focused_frame_follows_configured_space() {
        let screens = ScreenFrames::new_with(laptop_with_monitor_above());
        let raw = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert_eq!(screens.focused_to_global(raw, FrameSpace::Global).y, 1822.0);
        assert_eq!(screens.focused_to_global(raw, FrameSpace::MainScreen).y, 382.0);
    }

    #[test]
    fn global_space_falls_back_to_main_screen() {
        let main = Rect::new(0.0, 0.0, 1440.0, 900.0);
        let screens = ScreenFrames::new_with(Stub { frames: vec![], main: Some(main) });
        let raw = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert_eq!(screens.focused_to_global(raw, FrameSpace::Global).y, 300.0);
    }
}
