use tracing::{debug, trace};

use crate::layout_engine::Direction;
use crate::sys::hotkey::{ArrowKey, EventKind, Hotkey, KeyEvent, Modifiers};

/// What the event tap should do with the event it just delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Swallow the event; no other application sees it.
    Consume,
    PassThrough,
    /// The OS disabled the tap. Turn it back on and pass the event through.
    Reenable,
}

/// Receives the navigation requests of recognized chords.
pub trait Navigate {
    fn navigate(&mut self, direction: Direction);
}

impl<F: FnMut(Direction)> Navigate for F {
    fn navigate(&mut self, direction: Direction) { self(direction) }
}

/// Stateless filter over the keyboard event stream. Control+Option+Arrow
/// runs a navigation request synchronously and is consumed; everything else
/// passes through untouched.
pub struct HotkeyDispatcher<N> {
    hotkeys: [Hotkey; 4],
    navigator: N,
}

impl<N: Navigate> HotkeyDispatcher<N> {
    pub const REQUIRED_MODIFIERS: Modifiers = Modifiers::CONTROL.union(Modifiers::OPTION);

    pub fn new(navigator: N) -> Self {
        let hotkey = |key| Hotkey::new(Self::REQUIRED_MODIFIERS, key);
        Self {
            hotkeys: [
                hotkey(ArrowKey::Left),
                hotkey(ArrowKey::Right),
                hotkey(ArrowKey::Up),
                hotkey(ArrowKey::Down),
            ],
            navigator,
        }
    }

    pub fn hotkeys(&self) -> &[Hotkey] { &self.hotkeys }

    pub fn handle(&mut self, event: KeyEvent) -> Disposition {
        match event.kind {
            EventKind::KeyDown => {}
            EventKind::TapDisabledByTimeout | EventKind::TapDisabledByUserInput => {
                debug!(kind = ?event.kind, "event tap disabled by the system");
                return Disposition::Reenable;
            }
            EventKind::Other => return Disposition::PassThrough,
        }

        let Some(hotkey) = self.hotkeys.iter().find(|hk| hk.matches(&event)) else {
            return Disposition::PassThrough;
        };
        trace!(%hotkey, "hotkey pressed");
        self.navigator.navigate(hotkey.key.direction());
        Disposition::Consume
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ctrl_opt() -> Modifiers { Modifiers::CONTROL | Modifiers::OPTION }

    fn record(requests: &mut Vec<Direction>) -> impl FnMut(Direction) + '_ {
        move |dir| requests.push(dir)
    }

    #[test]
    fn each_arrow_maps_to_its_direction() {
        let mut requests = vec![];
        let mut dispatcher = HotkeyDispatcher::new(record(&mut requests));
        for code in [123, 124, 125, 126] {
            assert_eq!(dispatcher.handle(KeyEvent::key_down(ctrl_opt(), code)), Disposition::Consume);
        }
        drop(dispatcher);
        assert_eq!(
            requests,
            vec![Direction::Left, Direction::Right, Direction::Down, Direction::Up]
        );
    }

    #[test]
    fn extra_modifiers_still_match() {
        let mut requests = vec![];
        let mut dispatcher = HotkeyDispatcher::new(record(&mut requests));
        let mods = ctrl_opt() | Modifiers::SHIFT | Modifiers::COMMAND | Modifiers::FUNCTION;
        assert_eq!(dispatcher.handle(KeyEvent::key_down(mods, 124)), Disposition::Consume);
        drop(dispatcher);
        assert_eq!(requests, vec![Direction::Right]);
    }

    #[test]
    fn partial_chords_and_other_keys_pass_through() {
        let mut requests = vec![];
        let mut dispatcher = HotkeyDispatcher::new(record(&mut requests));
        let events = [
            KeyEvent::key_down(Modifiers::CONTROL, 123),
            KeyEvent::key_down(Modifiers::OPTION, 123),
            KeyEvent::key_down(Modifiers::empty(), 124),
            KeyEvent::key_down(ctrl_opt(), 0),
            KeyEvent { kind: EventKind::Other, modifiers: ctrl_opt(), keycode: 123 },
        ];
        for event in events {
            assert_eq!(dispatcher.handle(event), Disposition::PassThrough);
        }
        drop(dispatcher);
        assert!(requests.is_empty());
    }

    #[test]
    fn disabled_tap_asks_for_reenable_without_navigating() {
        let mut requests = vec![];
        let mut dispatcher = HotkeyDispatcher::new(record(&mut requests));
        for kind in [EventKind::TapDisabledByTimeout, EventKind::TapDisabledByUserInput] {
            let event = KeyEvent { kind, modifiers: ctrl_opt(), keycode: 123 };
            assert_eq!(dispatcher.handle(event), Disposition::Reenable);
        }
        drop(dispatcher);
        assert!(requests.is_empty());
    }

    #[test]
    fn exposes_the_fixed_bindings() {
        let dispatcher = HotkeyDispatcher::new(|_: Direction| {});
        let keys: Vec<String> = dispatcher.hotkeys().iter().map(|hk| hk.to_string()).collect();
        assert_eq!(keys, ["ctrl+opt+Left", "ctrl+opt+Right", "ctrl+opt+Up", "ctrl+opt+Down"]);
    }
}
