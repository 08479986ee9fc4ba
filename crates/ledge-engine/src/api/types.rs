use bytemuck::{Pod, Zeroable};

/// Unique identifier for a sprite in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u32);

impl SpriteId {
    /// Uid 0 is reserved for the player and never handed out by the allocator.
    pub const PLAYER: SpriteId = SpriteId(0);
}

/// Handle into the image table (see `assets::images::ImageSet`).
/// Id 0 is the placeholder image used when a name cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

impl ImageId {
    pub const PLACEHOLDER: ImageId = ImageId(0);
}

/// A sound request emitted by game logic.
/// Fire-and-forget: the engine queues the name, the host plays it (or not).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundRequest(pub String);

impl SoundRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// A game event communicated from the engine to the host.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    // Event kinds understood by hosts.
    pub const KIND_PLAYER_HURT: f32 = 1.0;
    pub const KIND_PLAYER_DEAD: f32 = 2.0;
    pub const KIND_POINTS: f32 = 3.0;
    pub const KIND_ITEM_COLLECTED: f32 = 4.0;
    pub const KIND_PLAYER_UPGRADE: f32 = 5.0;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}
