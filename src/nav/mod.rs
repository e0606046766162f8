pub mod dispatcher;
pub mod navigator;
pub mod resolver;

pub use dispatcher::{Disposition, HotkeyDispatcher, Navigate};
pub use navigator::{NavigationOutcome, Navigator, WindowSource};
pub use resolver::{Accessibility, FocusOutcome, FocusResolver, FocusStep};
