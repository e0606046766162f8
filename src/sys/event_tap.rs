//! A session-level keyboard event tap attached to the current run loop.

use std::cell::RefCell;
use std::ffi::c_void;
use std::ptr::{self, NonNull};

use objc2_core_foundation::{CFMachPort, CFRetained, CFRunLoop, CFRunLoopSource, kCFRunLoopCommonModes};
use objc2_core_graphics::{
    CGEvent, CGEventField, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement,
    CGEventTapProxy, CGEventType,
};
use tracing::{debug, warn};

use super::error::Error;
use super::hotkey::{EventKind, KeyEvent, Modifiers};
use crate::nav::Disposition;

type Handler = Box<dyn FnMut(KeyEvent) -> Disposition>;

struct TapState {
    port: RefCell<Option<CFRetained<CFMachPort>>>,
    handler: RefCell<Handler>,
}

/// Owns the Mach port and run loop source of an active tap. Dropping it
/// disables the tap and detaches it from the run loop.
pub struct EventTap {
    port: CFRetained<CFMachPort>,
    source: CFRetained<CFRunLoopSource>,
    run_loop: CFRetained<CFRunLoop>,
    // Referenced by the callback until the port is invalidated.
    state: *mut TapState,
}

impl EventTap {
    /// Installs a tap for key-down events on the current thread's run loop.
    /// Returning [`Disposition::Consume`] from `handler` swallows the event.
    pub fn new<F>(handler: F) -> Result<EventTap, Error>
    where
        F: FnMut(KeyEvent) -> Disposition + 'static,
    {
        let mask = 1u64 << CGEventType::KeyDown.0 as u64;
        let state = Box::into_raw(Box::new(TapState {
            port: RefCell::new(None),
            handler: RefCell::new(Box::new(handler)),
        }));

        let port = unsafe {
            CGEvent::tap_create(
                CGEventTapLocation::SessionEventTap,
                CGEventTapPlacement::HeadInsertEventTap,
                CGEventTapOptions::Default,
                mask,
                Some(tap_callback),
                state as *mut c_void,
            )
        };
        let Some(port) = port else {
            drop(unsafe { Box::from_raw(state) });
            return Err(Error::EventTapUnavailable);
        };
        let source = unsafe { CFMachPort::new_run_loop_source(None, Some(&port), 0) };
        let (Some(source), Some(run_loop)) = (source, CFRunLoop::current()) else {
            port.invalidate();
            drop(unsafe { Box::from_raw(state) });
            return Err(Error::EventTapUnavailable);
        };

        unsafe { *(*state).port.borrow_mut() = Some(port.clone()) };
        run_loop.add_source(Some(&source), unsafe { kCFRunLoopCommonModes });
        CGEvent::tap_enable(&port, true);
        debug!("event tap installed");
        Ok(EventTap { port, source, run_loop, state })
    }
}

impl Drop for EventTap {
    fn drop(&mut self) {
        CGEvent::tap_enable(&self.port, false);
        self.run_loop.remove_source(Some(&self.source), unsafe { kCFRunLoopCommonModes });
        self.port.invalidate();
        drop(unsafe { Box::from_raw(self.state) });
        debug!("event tap removed");
    }
}

fn event_kind(etype: CGEventType) -> EventKind {
    match etype {
        CGEventType::KeyDown => EventKind::KeyDown,
        CGEventType::TapDisabledByTimeout => EventKind::TapDisabledByTimeout,
        CGEventType::TapDisabledByUserInput => EventKind::TapDisabledByUserInput,
        _ => EventKind::Other,
    }
}

unsafe extern "C-unwind" fn tap_callback(
    _proxy: CGEventTapProxy,
    etype: CGEventType,
    event: NonNull<CGEvent>,
    user_info: *mut c_void,
) -> *mut CGEvent {
    let state = unsafe { &*(user_info as *const TapState) };
    let kind = event_kind(etype);
    let key_event = match kind {
        EventKind::KeyDown => unsafe {
            let flags = CGEvent::flags(Some(event.as_ref()));
            let keycode = CGEvent::integer_value_field(
                Some(event.as_ref()),
                CGEventField::KeyboardEventKeycode,
            );
            KeyEvent {
                kind,
                modifiers: Modifiers::from_bits_truncate(flags.0),
                keycode: keycode as u16,
            }
        },
        _ => KeyEvent { kind, modifiers: Modifiers::empty(), keycode: 0 },
    };

    // A nested run loop inside a navigation request can deliver events
    // while the handler is already borrowed.
    let Ok(mut handler) = state.handler.try_borrow_mut() else {
        return event.as_ptr();
    };
    match (*handler)(key_event) {
        Disposition::Consume => ptr::null_mut(),
        Disposition::PassThrough => event.as_ptr(),
        Disposition::Reenable => {
            if let Some(port) = state.port.borrow().as_ref() {
                warn!(?kind, "re-enabling event tap");
                CGEvent::tap_enable(port, true);
            }
            event.as_ptr()
        }
    }
}
