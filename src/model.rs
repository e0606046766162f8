pub mod window;

pub use window::{FocusedContext, RawWindow, WindowRecord, pid_t};
