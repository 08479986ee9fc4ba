pub mod queue;
pub mod state;

// Re-export key types for convenient access
pub use queue::{InputEvent, InputQueue};
pub use state::{InputState, KeyBindings, PlayerInput};
