pub mod context;
pub mod types;

// Re-export key types for convenient access
pub use context::LevelContext;
pub use types::{GameEvent, ImageId, SoundRequest, SpriteId};
