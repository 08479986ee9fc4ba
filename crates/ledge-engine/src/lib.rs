pub mod api;
pub mod assets;
pub mod collision;
pub mod core;
pub mod input;
pub mod level;
pub mod player;
pub mod render;
pub mod sprites;

// Re-export key types at crate root for convenience
pub use api::context::LevelContext;
pub use api::types::{GameEvent, ImageId, SoundRequest, SpriteId};
pub use assets::images::ImageSet;
pub use collision::protocol::{validate_collision, CollisionEvent, Validation};
pub use collision::query::{
    collide_move, find_ground, query_circle, query_rect, query_relative, Hit, MoveOutcome,
    QueryFilter, QueryMode,
};
pub use collision::rect::{ColCircle, ColRect, Direction};
pub use core::registry::Registry;
pub use core::time::FrameClock;
pub use core::uid::{UidAllocator, UidError};
pub use input::queue::{InputEvent, InputQueue};
pub use input::state::{InputState, KeyBindings, PlayerInput};
pub use level::attributes::{AttributeError, Attributes};
pub use level::loader::{LevelDescriptor, SavedSprite};
pub use player::character::Player;
pub use player::state::{MoveState, PowerState};
pub use render::camera::Camera;
pub use render::draw::{build_draw_buffer, DrawBuffer, DrawInstance};
pub use sprites::animation::Animation;
pub use sprites::kind::{ArrayBucket, HorizDirection, ItemKind, Massivity, SpriteKind};
pub use sprites::sprite::Sprite;
