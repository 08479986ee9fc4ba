pub mod protocol;
pub mod query;
pub mod rect;

// Re-export key types for convenient access
pub use protocol::{validate_collision, CollisionEvent, Validation};
pub use query::{
    collide_move, find_ground, query_circle, query_rect, query_relative, Hit, MoveOutcome,
    QueryFilter, QueryMode,
};
pub use rect::{resolve_direction, ColCircle, ColRect, Direction};
