use tracing::debug;

use crate::layout_engine::{FRAME_TOLERANCE, Rect};
use crate::model::{WindowRecord, pid_t};
use crate::sys::error::QueryError;

/// Per-application window control. `Handle` is an opaque reference to one
/// live window of a process.
pub trait Accessibility {
    type Handle;

    /// The process's windows with their frames in the space the window list
    /// reports them in.
    fn live_windows(&self, pid: pid_t) -> Result<Vec<(Self::Handle, Rect)>, QueryError>;
    fn raise(&self, window: &Self::Handle) -> Result<(), QueryError>;
    fn set_focused_window(&self, pid: pid_t, window: &Self::Handle) -> Result<(), QueryError>;
    fn activate_process(&self, pid: pid_t) -> Result<(), QueryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusStep {
    Raise,
    SetFocusedWindow,
    ActivateProcess,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FocusOutcome {
    Focused,
    /// Some steps failed. The ones that succeeded are not undone.
    Partial(Vec<(FocusStep, QueryError)>),
    Failed(Vec<(FocusStep, QueryError)>),
    /// The process could not be asked for its windows, or it has none.
    NoLiveWindow,
}

/// Picks the live window that corresponds to a window-list entry: the first
/// whose frame matches `target` within [`FRAME_TOLERANCE`] on every
/// component, else the one whose center is nearest.
pub fn resolve_handle<'a, H>(live: &'a [(H, Rect)], target: &Rect) -> Option<&'a H> {
    if let Some((handle, _)) = live.iter().find(|(_, frame)| frame.approx_eq(target, FRAME_TOLERANCE)) {
        return Some(handle);
    }
    let center = target.center();
    live.iter()
        .fold(None::<(&H, f64)>, |best, (handle, frame)| {
            let distance = frame.center().distance_squared(center);
            match best {
                Some((_, d)) if d <= distance => best,
                _ => Some((handle, distance)),
            }
        })
        .map(|(handle, _)| handle)
}

pub struct FocusResolver<A> {
    ax: A,
}

impl<A: Accessibility> FocusResolver<A> {
    pub fn new(ax: A) -> Self { Self { ax } }

    /// Raises the target window, makes it its application's focused window,
    /// then brings the application forward.
    pub fn resolve_and_focus(&self, target: &WindowRecord) -> FocusOutcome {
        let pid = target.owner_pid;
        let live = match self.ax.live_windows(pid) {
            Ok(live) => live,
            Err(e) => {
                debug!(pid, "could not enumerate windows: {e}");
                return FocusOutcome::NoLiveWindow;
            }
        };
        let Some(handle) = resolve_handle(&live, &target.raw_bounds) else {
            debug!(pid, "process has no live windows");
            return FocusOutcome::NoLiveWindow;
        };

        let steps = [
            (FocusStep::Raise, self.ax.raise(handle)),
            (FocusStep::SetFocusedWindow, self.ax.set_focused_window(pid, handle)),
            (FocusStep::ActivateProcess, self.ax.activate_process(pid)),
        ];
        let total = steps.len();
        let failed: Vec<_> = steps
            .into_iter()
            .filter_map(|(step, result)| result.err().map(|e| (step, e)))
            .collect();
        for (step, e) in &failed {
            debug!(pid, ?step, "focus step failed: {e}");
        }
        match failed.len() {
            0 => FocusOutcome::Focused,
            n if n == total => FocusOutcome::Failed(failed),
            _ => FocusOutcome::Partial(failed),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Raise(u32),
        SetFocused(pid_t, u32),
        Activate(pid_t),
    }

    /// Records every control call. Handles are plain window numbers.
    #[derive(Default)]
    pub struct FakeAx {
        pub windows: Vec<(u32, Rect)>,
        pub list_error: Option<QueryError>,
        pub refuse_activation: bool,
        pub fail_raise: bool,
        pub fail_focus: bool,
        pub calls: RefCell<Vec<Call>>,
    }

    impl Accessibility for &FakeAx {
        type Handle = u32;

        fn live_windows(&self, pid: pid_t) -> Result<Vec<(u32, Rect)>, QueryError> {
            match &self.list_error {
                Some(e) => Err(e.clone()),
                None if pid == 0 => Err(QueryError::NoSuchProcess(pid)),
                None => Ok(self.windows.clone()),
            }
        }

        fn raise(&self, window: &u32) -> Result<(), QueryError> {
            self.calls.borrow_mut().push(Call::Raise(*window));
            if self.fail_raise {
                return Err(QueryError::Ax { call: "AXRaise", code: -25200 });
            }
            Ok(())
        }

        fn set_focused_window(&self, pid: pid_t, window: &u32) -> Result<(), QueryError> {
            self.calls.borrow_mut().push(Call::SetFocused(pid, *window));
            if self.fail_focus {
                return Err(QueryError::Ax { call: "AXFocusedWindow", code: -25205 });
            }
            Ok(())
        }

        fn activate_process(&self, pid: pid_t) -> Result<(), QueryError> {
            self.calls.borrow_mut().push(Call::Activate(pid));
            if self.refuse_activation {
                return Err(QueryError::ActivationRefused(pid));
            }
            Ok(())
        }
    }

    fn target(pid: pid_t, bounds: Rect) -> WindowRecord {
        WindowRecord {
            owner_pid: pid,
            owner_name: "App".into(),
            title: "doc".into(),
            raw_bounds: bounds,
            global_bounds: bounds,
        }
    }

    #[test]
    fn matches_within_tolerance_inclusive() {
        let target = Rect::new(100., 100., 400., 300.);
        let live = [(1, Rect::new(108., 92., 408., 292.))];
        assert_eq!(resolve_handle(&live, &target), Some(&1));
    }

    #[test]
    fn just_outside_tolerance_uses_nearest_center() {
        let target = Rect::new(100., 100., 400., 300.);
        let live = [
            (1, Rect::new(900., 900., 400., 300.)),
            (2, Rect::new(108.01, 100., 400., 300.)),
        ];
        assert_eq!(resolve_handle(&live, &target), Some(&2));
    }

    #[test]
    fn first_matching_frame_wins() {
        let target = Rect::new(0., 0., 100., 100.);
        let live = [
            (7, Rect::new(1., 1., 100., 100.)),
            (8, Rect::new(0., 0., 100., 100.)),
        ];
        assert_eq!(resolve_handle(&live, &target), Some(&7));
    }

    #[test]
    fn nearest_fallback_keeps_first_on_ties() {
        let target = Rect::new(500., 500., 10., 10.);
        let live = [
            (1, Rect::new(0., 500., 10., 10.)),
            (2, Rect::new(1000., 500., 10., 10.)),
        ];
        assert_eq!(resolve_handle(&live, &target), Some(&1));
        assert_eq!(resolve_handle::<u32>(&[], &target), None);
    }

    #[test]
    fn focuses_resolved_window_in_order() {
        let ax = FakeAx {
            windows: vec![(3, Rect::new(0., 0., 50., 50.)), (4, Rect::new(600., 0., 400., 400.))],
            ..Default::default()
        };
        let resolver = FocusResolver::new(&ax);
        let outcome = resolver.resolve_and_focus(&target(42, Rect::new(602., 3., 400., 400.)));
        assert_eq!(outcome, FocusOutcome::Focused);
        assert_eq!(
            ax.calls.take(),
            vec![Call::Raise(4), Call::SetFocused(42, 4), Call::Activate(42)]
        );
    }

    #[test]
    fn no_windows_or_unreachable_process_does_nothing() {
        let ax = FakeAx::default();
        let resolver = FocusResolver::new(&ax);
        let bounds = Rect::new(0., 0., 10., 10.);
        assert_eq!(resolver.resolve_and_focus(&target(42, bounds)), FocusOutcome::NoLiveWindow);
        assert_eq!(resolver.resolve_and_focus(&target(0, bounds)), FocusOutcome::NoLiveWindow);
        assert!(ax.calls.borrow().is_empty());
    }

    #[test]
    fn refused_activation_keeps_raise() {
        let ax = FakeAx {
            windows: vec![(9, Rect::new(0., 0., 10., 10.))],
            refuse_activation: true,
            ..Default::default()
        };
        let resolver = FocusResolver::new(&ax);
        let outcome = resolver.resolve_and_focus(&target(5, Rect::new(0., 0., 10., 10.)));
        assert_eq!(
            outcome,
            FocusOutcome::Partial(vec![(
                FocusStep::ActivateProcess,
                QueryError::ActivationRefused(5)
            )])
        );
        // Nothing is rolled back.
        assert_eq!(ax.calls.take(), vec![Call::Raise(9), Call::SetFocused(5, 9), Call::Activate(5)]);
    }

    #[test]
    fn failures_are_collected_per_step() {
        let ax = FakeAx {
            windows: vec![(9, Rect::new(0., 0., 10., 10.))],
            refuse_activation: true,
            fail_raise: true,
            ..Default::default()
        };
        let outcome = FocusResolver::new(&ax).resolve_and_focus(&target(5, Rect::new(0., 0., 10., 10.)));
        assert!(matches!(outcome, FocusOutcome::Partial(ref failed) if failed.len() == 2));
    }

    #[test]
    fn every_step_failing_is_reported_as_failed() {
        let ax = FakeAx {
            windows: vec![(9, Rect::new(0., 0., 10., 10.))],
            refuse_activation: true,
            fail_raise: true,
            fail_focus: true,
            ..Default::default()
        };
        let outcome = FocusResolver::new(&ax).resolve_and_focus(&target(5, Rect::new(0., 0., 10., 10.)));
        assert_eq!(
            outcome,
            FocusOutcome::Failed(vec![
                (FocusStep::Raise, QueryError::Ax { call: "AXRaise", code: -25200 }),
                (FocusStep::SetFocusedWindow, QueryError::Ax { call: "AXFocusedWindow", code: -25205 }),
                (FocusStep::ActivateProcess, QueryError::ActivationRefused(5)),
            ])
        );
        // Every step is still attempted.
        assert_eq!(ax.calls.take(), vec![Call::Raise(9), Call::SetFocused(5, 9), Call::Activate(5)]);
    }
}
