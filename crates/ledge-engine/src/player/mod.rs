pub mod character;
pub mod state;

// Re-export key types for convenient access
pub use character::Player;
pub use state::{MoveState, PowerState};
