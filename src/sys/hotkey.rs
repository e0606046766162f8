//! Keyboard event primitives, independent of the event tap that produces
//! them.

use std::fmt;

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::layout_engine::Direction;

bitflags! {
    /// Modifier state of a keyboard event. Bit positions match
    /// `CGEventFlags`, so the raw flags word of an event converts with
    /// [`Modifiers::from_bits_truncate`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u64 {
        const CAPS_LOCK = 1 << 16;
        const SHIFT = 1 << 17;
        const CONTROL = 1 << 18;
        const OPTION = 1 << 19;
        const COMMAND = 1 << 20;
        const NUMERIC_PAD = 1 << 21;
        const FUNCTION = 1 << 23;
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Modifiers::CONTROL, "ctrl"),
            (Modifiers::OPTION, "opt"),
            (Modifiers::SHIFT, "shift"),
            (Modifiers::COMMAND, "cmd"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Virtual keycodes of the arrow keys on Apple keyboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum ArrowKey {
    Left = 123,
    Right = 124,
    Down = 125,
    Up = 126,
}

impl ArrowKey {
    pub fn direction(self) -> Direction {
        match self {
            ArrowKey::Left => Direction::Left,
            ArrowKey::Right => Direction::Right,
            ArrowKey::Down => Direction::Down,
            ArrowKey::Up => Direction::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    KeyDown,
    /// The OS turned the tap off because a callback ran too long.
    TapDisabledByTimeout,
    TapDisabledByUserInput,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: EventKind,
    pub modifiers: Modifiers,
    pub keycode: u16,
}

impl KeyEvent {
    pub fn key_down(modifiers: Modifiers, keycode: u16) -> Self {
        Self { kind: EventKind::KeyDown, modifiers, keycode }
    }
}

/// A required modifier set plus one key. Modifiers beyond the required set
/// do not prevent a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    pub key: ArrowKey,
}

impl Hotkey {
    pub fn new(modifiers: Modifiers, key: ArrowKey) -> Self { Self { modifiers, key } }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.kind == EventKind::KeyDown
            && event.modifiers.contains(self.modifiers)
            && event.keycode == u16::from(self.key)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{:?}", self.modifiers, self.key)
    }
}
