pub mod error;
pub mod hotkey;
pub mod screen;

#[cfg(target_os = "macos")]
pub mod app;
#[cfg(target_os = "macos")]
pub mod axuielement;
#[cfg(target_os = "macos")]
pub mod event_tap;
#[cfg(target_os = "macos")]
pub mod geometry;
#[cfg(target_os = "macos")]
pub mod run_loop;
#[cfg(target_os = "macos")]
pub mod window_server;
