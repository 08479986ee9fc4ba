pub mod animation;
pub mod behavior;
pub mod kind;
pub mod sprite;

// Re-export key types for convenient access
pub use animation::Animation;
pub use kind::{ArrayBucket, HorizDirection, ItemKind, Massivity, SpriteKind};
pub use sprite::Sprite;
