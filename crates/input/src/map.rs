use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;

use crate::keys::{Binding, Key, KeyState, MouseButton};

/// A named input triggered by any of its bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputAction {
    pub name: String,
    pub bindings: Vec<Binding>,
}

impl InputAction {
    pub fn add_key(&mut self, key: Key) -> &mut Self {
        self.bindings.push(Binding::Key(key));
        self
    }

    pub fn add_mouse(&mut self, button: MouseButton) -> &mut Self {
        self.bindings.push(Binding::Mouse(button));
        self
    }

    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }
}

/// A value in `[-1, 1]` built from a negative and a positive key.
#[derive(Debug, Clone, PartialEq)]
pub struct InputAxis {
    pub name: String,
    pub negative: Option<Key>,
    pub positive: Option<Key>,
    pub dead_zone: f32,
    pub sensitivity: f32,
}

impl Default for InputAxis {
    fn default() -> Self {
        Self {
            name: String::new(),
            negative: None,
            positive: None,
            dead_zone: 0.1,
            sensitivity: 1.0,
        }
    }
}

impl InputAxis {
    pub fn set_keys(&mut self, negative: Key, positive: Key) -> &mut Self {
        self.negative = Some(negative);
        self.positive = Some(positive);
        self
    }

    fn sample(&self, keys: &dyn KeyState) -> f32 {
        let mut value = 0.0;
        if self.positive.is_some_and(|k| keys.is_key_down(k)) {
            value += 1.0;
        }
        if self.negative.is_some_and(|k| keys.is_key_down(k)) {
            value -= 1.0;
        }
        if f32::abs(value) < self.dead_zone {
            value = 0.0;
        }
        (value * self.sensitivity).clamp(-1.0, 1.0)
    }
}

type ActionCallback = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Edge {
    held: bool,
    was_held: bool,
}

/// Named actions and axes over a [`KeyState`].
#[derive(Default)]
pub struct InputMap {
    actions: BTreeMap<String, InputAction>,
    axes: BTreeMap<String, InputAxis>,
    state: BTreeMap<String, Edge>,
    axis_values: BTreeMap<String, f32>,
    on_pressed: BTreeMap<String, Vec<ActionCallback>>,
    on_released: BTreeMap<String, Vec<ActionCallback>>,
}

impl fmt::Debug for InputMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputMap")
            .field("actions", &self.actions)
            .field("axes", &self.axes)
            .finish_non_exhaustive()
    }
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name`, or return the existing action of that name.
    pub fn define_action(&mut self, name: &str) -> &mut InputAction {
        self.actions
            .entry(name.to_string())
            .or_insert_with(|| InputAction {
                name: name.to_string(),
                bindings: Vec::new(),
            })
    }

    pub fn action(&self, name: &str) -> Option<&InputAction> {
        self.actions.get(name)
    }

    pub fn action_mut(&mut self, name: &str) -> Option<&mut InputAction> {
        self.actions.get_mut(name)
    }

    pub fn remove_action(&mut self, name: &str) {
        self.actions.remove(name);
        self.state.remove(name);
        self.on_pressed.remove(name);
        self.on_released.remove(name);
    }

    /// Define `name`, or return the existing axis of that name.
    pub fn define_axis(&mut self, name: &str) -> &mut InputAxis {
        self.axes.entry(name.to_string()).or_insert_with(|| InputAxis {
            name: name.to_string(),
            ..InputAxis::default()
        })
    }

    pub fn axis(&self, name: &str) -> Option<&InputAxis> {
        self.axes.get(name)
    }

    pub fn axis_mut(&mut self, name: &str) -> Option<&mut InputAxis> {
        self.axes.get_mut(name)
    }

    pub fn remove_axis(&mut self, name: &str) {
        self.axes.remove(name);
        self.axis_values.remove(name);
    }

    pub fn on_action_pressed(&mut self, name: &str, callback: impl FnMut() + 'static) {
        self.on_pressed
            .entry(name.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    pub fn on_action_released(&mut self, name: &str, callback: impl FnMut() + 'static) {
        self.on_released
            .entry(name.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Sample `keys` for this frame and fire edge callbacks.
    pub fn update(&mut self, keys: &dyn KeyState) {
        for (name, action) in &self.actions {
            let held = action.bindings.iter().any(|b| keys.is_binding_down(*b));
            let edge = self.state.entry(name.clone()).or_default();
            edge.was_held = edge.held;
            edge.held = held;

            let callbacks = match (edge.was_held, edge.held) {
                (false, true) => self.on_pressed.get_mut(name),
                (true, false) => self.on_released.get_mut(name),
                _ => None,
            };
            if let Some(callbacks) = callbacks {
                tracing::trace!(action = %name, held, "input action edge");
                callbacks.iter_mut().for_each(|cb| cb());
            }
        }

        self.axis_values = self
            .axes
            .iter()
            .map(|(name, axis)| (name.clone(), axis.sample(keys)))
            .collect();
    }

    fn edge(&self, name: &str) -> Edge {
        self.state.get(name).copied().unwrap_or_default()
    }

    pub fn is_action_held(&self, name: &str) -> bool {
        self.edge(name).held
    }

    /// Held this frame, not held the frame before.
    pub fn is_action_pressed(&self, name: &str) -> bool {
        let e = self.edge(name);
        e.held && !e.was_held
    }

    pub fn is_action_released(&self, name: &str) -> bool {
        let e = self.edge(name);
        !e.held && e.was_held
    }

    /// Last sampled value of an axis; `0.0` for unknown axes.
    pub fn axis_value(&self, name: &str) -> f32 {
        self.axis_values.get(name).copied().unwrap_or(0.0)
    }

    /// Movement from the `move_x`/`move_y` axes.
    pub fn movement(&self) -> Vec2 {
        self.movement_from("move_x", "move_y")
    }

    /// Movement from two axes, normalized when longer than 1.
    pub fn movement_from(&self, x_axis: &str, y_axis: &str) -> Vec2 {
        let v = Vec2::new(self.axis_value(x_axis), self.axis_value(y_axis));
        if v.length_squared() > 1.0 {
            v.normalize()
        } else {
            v
        }
    }

    pub fn add_wasd_movement(&mut self) {
        self.define_axis("move_x").set_keys(Key::A, Key::D);
        self.define_axis("move_y").set_keys(Key::W, Key::S);
    }

    /// Arrow-key movement; existing movement axes are kept.
    pub fn add_arrow_movement(&mut self) {
        if !self.axes.contains_key("move_x") {
            self.define_axis("move_x").set_keys(Key::Left, Key::Right);
        }
        if !self.axes.contains_key("move_y") {
            self.define_axis("move_y").set_keys(Key::Up, Key::Down);
        }
    }

    /// WASD movement plus `confirm` and `cancel` actions.
    pub fn add_standard_movement(&mut self) {
        self.add_wasd_movement();
        self.define_action("confirm").add_key(Key::Enter).add_key(Key::Space);
        self.define_action("cancel").add_key(Key::Escape);
    }
}
