use thiserror::Error;

use crate::model::pid_t;

/// A failed OS query made while serving one navigation request. These never
/// stop the listener; the request degrades to doing nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("no application or window has keyboard focus")]
    NoFocusedWindow,
    #[error("the on-screen window list is unavailable")]
    WindowListUnavailable,
    #[error("no running application with pid {0}")]
    NoSuchProcess(pid_t),
    #[error("accessibility call {call} failed with AXError {code}")]
    Ax { call: &'static str, code: i32 },
    #[error("accessibility value {0} is missing or has an unexpected type")]
    BadValue(&'static str),
    #[error("activating pid {0} was refused")]
    ActivationRefused(pid_t),
}

/// Startup failures. Nothing can run without the event tap.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "accessibility access is not granted; enable this program under System Settings > \
         Privacy & Security > Accessibility and start it again"
    )]
    NotTrusted,
    #[error("failed to create the keyboard event tap; accessibility permission is required")]
    EventTapUnavailable,
    #[error("must be started on the main thread")]
    NotMainThread,
    #[error("compass only runs on macOS")]
    Unsupported,
}
