//! Held-key tracking and the per-frame control digest.

use std::collections::HashSet;

use crate::input::queue::{InputEvent, InputQueue};

// Browser-style key codes, the encoding hosts already speak.
pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;
pub const KEY_SPACE: u32 = 32;
pub const KEY_SHIFT: u32 = 16;

/// Which key drives which control. Hosts can rebind freely.
#[derive(Debug, Clone, Copy)]
pub struct KeyBindings {
    pub left: u32,
    pub right: u32,
    pub up: u32,
    pub down: u32,
    pub jump: u32,
    pub run: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: KEY_LEFT,
            right: KEY_RIGHT,
            up: KEY_UP,
            down: KEY_DOWN,
            jump: KEY_SPACE,
            run: KEY_SHIFT,
        }
    }
}

/// One frame's controls, already resolved against the bindings.
/// `jump` is level (held), `jump_pressed` is the down edge this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub jump_pressed: bool,
    pub run: bool,
}

/// Tracks which keys are currently held and which went down this frame.
pub struct InputState {
    held: HashSet<u32>,
    pressed: HashSet<u32>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
        }
    }

    /// Absorb everything the host queued since the last frame.
    /// Down edges are per-frame; holding a key yields exactly one edge.
    pub fn drain_queue(&mut self, queue: &mut InputQueue) {
        self.pressed.clear();
        for event in queue.drain() {
            self.apply(event);
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key_code } => {
                // Host auto-repeat is not an edge.
                if self.held.insert(key_code) {
                    self.pressed.insert(key_code);
                }
            }
            InputEvent::KeyUp { key_code } => {
                self.held.remove(&key_code);
            }
        }
    }

    pub fn is_held(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    pub fn was_pressed(&self, key_code: u32) -> bool {
        self.pressed.contains(&key_code)
    }

    /// Everything released, e.g. when the host window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    /// Resolve the frame's control digest against `keys`.
    pub fn digest(&self, keys: &KeyBindings) -> PlayerInput {
        PlayerInput {
            left: self.is_held(keys.left),
            right: self.is_held(keys.right),
            up: self.is_held(keys.up),
            down: self.is_held(keys.down),
            jump: self.is_held(keys.jump),
            jump_pressed: self.was_pressed(keys.jump),
            run: self.is_held(keys.run),
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_survive_across_frames() {
        let mut q = InputQueue::new();
        let mut state = InputState::new();
        let keys = KeyBindings::default();

        q.key_down(KEY_RIGHT);
        q.key_down(KEY_SPACE);
        state.drain_queue(&mut q);
        let input = state.digest(&keys);
        assert!(input.right);
        assert!(input.jump);
        assert!(input.jump_pressed);

        // Next frame, nothing new queued: still held, edge gone.
        state.drain_queue(&mut q);
        let input = state.digest(&keys);
        assert!(input.jump);
        assert!(!input.jump_pressed);
    }

    #[test]
    fn auto_repeat_is_not_an_edge() {
        let mut q = InputQueue::new();
        let mut state = InputState::new();
        let keys = KeyBindings::default();

        q.key_down(KEY_SPACE);
        state.drain_queue(&mut q);
        assert!(state.digest(&keys).jump_pressed);

        q.key_down(KEY_SPACE);
        state.drain_queue(&mut q);
        assert!(!state.digest(&keys).jump_pressed);

        q.key_up(KEY_SPACE);
        q.key_down(KEY_SPACE);
        state.drain_queue(&mut q);
        assert!(state.digest(&keys).jump_pressed);
    }

    #[test]
    fn clear_releases_everything() {
        let mut q = InputQueue::new();
        let mut state = InputState::new();
        q.key_down(KEY_LEFT);
        state.drain_queue(&mut q);
        state.clear();
        assert!(!state.digest(&KeyBindings::default()).left);
    }
}
