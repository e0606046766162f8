use std::time::{Duration, Instant};

use tracing::{debug, info, info_span, warn};

use super::dispatcher::Navigate;
use super::resolver::{Accessibility, FocusOutcome, FocusResolver};
use crate::common::config::Settings;
use crate::layout_engine::{Direction, Rect, select_target};
use crate::model::{FocusedContext, RawWindow, WindowRecord};
use crate::sys::error::QueryError;
use crate::sys::screen::{ScreenFrames, System};

/// Where windows come from. Both queries report raw space.
pub trait WindowSource {
    /// Every on-screen window, front to back. `include_untitled` is a hint;
    /// the navigator filters again with [`RawWindow::is_candidate`].
    fn visible_windows(&self, include_untitled: bool) -> Result<Vec<RawWindow>, QueryError>;
    fn focused_window_frame(&self) -> Result<Rect, QueryError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    NoFocusedWindow,
    NoTarget,
    Moved { target: WindowRecord, focus: FocusOutcome },
}

/// One navigation request end to end. Nothing is cached between requests.
pub struct Navigator<W, S: System, A> {
    windows: W,
    screens: ScreenFrames<S>,
    resolver: FocusResolver<A>,
    settings: Settings,
}

impl<W: WindowSource, S: System, A: Accessibility> Navigator<W, S, A> {
    pub fn new(windows: W, screens: ScreenFrames<S>, ax: A, settings: Settings) -> Self {
        Self {
            windows,
            screens,
            resolver: FocusResolver::new(ax),
            settings,
        }
    }

    pub fn focused(&self) -> Result<FocusedContext, QueryError> {
        let raw_bounds = self.windows.focused_window_frame()?;
        Ok(FocusedContext { raw_bounds })
    }

    /// The eligible on-screen windows with their normalized bounds.
    pub fn candidates(&self) -> Result<Vec<WindowRecord>, QueryError> {
        let include_untitled = self.settings.include_untitled;
        let raw = self.windows.visible_windows(include_untitled)?;
        let converter = self.screens.global_converter();
        if converter.screen_height().is_none() {
            debug!("no screen information; skipping candidates");
            return Ok(vec![]);
        }
        Ok(raw
            .into_iter()
            .filter(|w| w.is_candidate(include_untitled))
            .filter_map(|w| {
                let global = converter.convert_rect(w.bounds)?;
                Some(WindowRecord::new(w, global))
            })
            .collect())
    }

    pub fn navigate(&self, direction: Direction) -> NavigationOutcome {
        let _span = info_span!("navigate", ?direction).entered();
        let start = Instant::now();
        let outcome = self.navigate_inner(direction);
        let elapsed = start.elapsed();
        let budget = Duration::from_millis(self.settings.latency_budget_ms);
        if elapsed > budget {
            warn!(?elapsed, ?budget, "navigation request exceeded its latency budget");
        } else {
            debug!(?elapsed, "navigation finished");
        }
        outcome
    }

    fn navigate_inner(&self, direction: Direction) -> NavigationOutcome {
        let focused = match self.focused() {
            Ok(focused) => focused,
            Err(e) => {
                debug!("no focused window: {e}");
                return NavigationOutcome::NoFocusedWindow;
            }
        };
        let candidates = match self.candidates() {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!("window list unavailable: {e}");
                return NavigationOutcome::NoTarget;
            }
        };

        let origin =
            self.screens.focused_to_global(focused.raw_bounds, self.settings.focused_frame_space);
        let Some(target) = select_target(origin, direction, &candidates) else {
            debug!(?origin, count = candidates.len(), "no target");
            return NavigationOutcome::NoTarget;
        };
        info!(pid = target.owner_pid, app = %target.owner_name, title = %target.title, "focusing");
        let focus = self.resolver.resolve_and_focus(target);
        NavigationOutcome::Moved { target: target.clone(), focus }
    }
}

impl<W: WindowSource, S: System, A: Accessibility> Navigate for Navigator<W, S, A> {
    fn navigate(&mut self, direction: Direction) { Navigator::navigate(&*self, direction); }
}

impl<W: WindowSource, S: System, A: Accessibility> Navigate for &Navigator<W, S, A> {
    fn navigate(&mut self, direction: Direction) { Navigator::navigate(*self, direction); }
}
