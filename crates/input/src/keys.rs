use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    A,
    D,
    E,
    Q,
    S,
    W,
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    Tab,
    Shift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// One physical input an action listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Key(Key),
    Mouse(MouseButton),
}

/// "Is it held right now" queries, implemented by the platform window.
pub trait KeyState {
    fn is_key_down(&self, key: Key) -> bool;

    fn is_mouse_down(&self, _button: MouseButton) -> bool {
        false
    }

    fn is_binding_down(&self, binding: Binding) -> bool {
        match binding {
            Binding::Key(k) => self.is_key_down(k),
            Binding::Mouse(b) => self.is_mouse_down(b),
        }
    }
}

/// Key state driven by hand, for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: BTreeSet<Key>,
    buttons: BTreeSet<MouseButton>,
}

impl ScriptedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.keys.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    pub fn press_mouse(&mut self, button: MouseButton) {
        self.buttons.insert(button);
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        self.buttons.remove(&button);
    }

    pub fn release_all(&mut self) {
        self.keys.clear();
        self.buttons.clear();
    }
}

impl KeyState for ScriptedKeys {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }
}
