/// Raw input events the engine understands.
/// Hosts feed these in whatever order their event loop delivers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down. Repeats from the host are tolerated.
    KeyDown { key_code: u32 },
    /// A key came back up.
    KeyUp { key_code: u32 },
}

/// Event mailbox between the host and the engine. The host writes
/// events whenever they arrive; the digest empties it once per step.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn key_down(&mut self, key_code: u32) {
        self.push(InputEvent::KeyDown { key_code });
    }

    pub fn key_up(&mut self, key_code: u32) {
        self.push(InputEvent::KeyUp { key_code });
    }

    /// Hand over everything queued since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
