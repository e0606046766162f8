use objc2_app_kit::{NSApplicationActivationOptions, NSRunningApplication};
use tracing::trace;

use super::error::QueryError;
use crate::model::pid_t;

/// Brings every window of the application forward, ahead of other apps.
pub fn activate(pid: pid_t) -> Result<(), QueryError> {
    let app = NSRunningApplication::runningApplicationWithProcessIdentifier(pid)
        .ok_or(QueryError::NoSuchProcess(pid))?;
    #[allow(deprecated)]
    let activated =
        app.activateWithOptions(NSApplicationActivationOptions::ActivateIgnoringOtherApps);
    trace!(pid, activated, "activate");
    if activated { Ok(()) } else { Err(QueryError::ActivationRefused(pid)) }
}
