pub mod attributes;
pub mod loader;
pub mod save;

// Re-export key types for convenient access
pub use attributes::{AttributeError, Attributes};
pub use loader::{build_sprite, populate_registry, LevelDescriptor, SavedSprite};
pub use save::{save_level, save_sprite};
