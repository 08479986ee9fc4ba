use glam::Vec2;

use crate::api::types::{ImageId, SpriteId};
use crate::collision::rect::ColRect;
use crate::sprites::animation::Animation;
use crate::sprites::kind::{ArrayBucket, HorizDirection, Massivity, SpriteKind};

/// Fat sprite: one struct carrying identity, geometry, classification,
/// kinematics and presentation. Behaviors switch on `kind`; there is no
/// type hierarchy.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Assigned by the registry on add; `None` until then.
    pub uid: Option<SpriteId>,
    /// Diagnostic name, also shown by editors.
    pub name: String,
    /// Inactive sprites are skipped by every pass and every query.
    pub active: bool,

    /// Current top-left corner of the visual frame, pixels, +y down.
    pub pos: Vec2,
    /// Position the sprite was placed at (load or spawn). Editor lookups
    /// match against this.
    pub start_pos: Vec2,
    /// Visual frame size.
    pub size: Vec2,
    /// Collision rectangle offset inside the visual frame.
    pub col_offset: Vec2,
    /// Collision rectangle size. Kept inside the visual frame.
    pub col_size: Vec2,
    /// Draw order. Assigned by the registry from the requested value.
    pub pos_z: f32,
    /// Editor ordering axis; 0.0 = unset, falls back to `pos_z`.
    pub editor_pos_z: f32,
    /// Visual rotation in radians. Does not affect collision.
    pub rotation: f32,

    pub massivity: Massivity,
    pub array: ArrayBucket,
    pub kind: SpriteKind,

    pub vel: Vec2,
    /// Terminal falling speed.
    pub gravity_max: f32,
    /// Facing, for walkers and pushed objects.
    pub direction: HorizDirection,
    /// Whether other sprites can stand on this one.
    pub can_be_ground: bool,
    /// The sprite this one is standing on, if any.
    pub ground_object: Option<SpriteId>,

    /// Created at runtime; excluded from level saves.
    pub spawned: bool,
    /// Marked for removal at the end of the frame.
    pub auto_destroy: bool,

    pub image: Option<ImageId>,
    pub animation: Option<Animation>,
    pub alpha: f32,
}

impl Sprite {
    pub fn new(kind: SpriteKind) -> Self {
        Self {
            uid: None,
            name: String::new(),
            active: true,
            pos: Vec2::ZERO,
            start_pos: Vec2::ZERO,
            size: Vec2::ZERO,
            col_offset: Vec2::ZERO,
            col_size: Vec2::ZERO,
            pos_z: 0.0,
            editor_pos_z: 0.0,
            rotation: 0.0,
            massivity: Massivity::Passive,
            array: ArrayBucket::Passive,
            kind,
            vel: Vec2::ZERO,
            gravity_max: 0.0,
            direction: HorizDirection::Right,
            can_be_ground: false,
            ground_object: None,
            spawned: false,
            auto_destroy: false,
            image: None,
            animation: None,
            alpha: 1.0,
        }
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set both current and start position.
    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self.start_pos = pos;
        self
    }

    /// Set the visual frame size and make the collision rect cover it.
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self.col_offset = Vec2::ZERO;
        self.col_size = size;
        self
    }

    /// Shrink the collision rect inside the visual frame.
    /// Clamped so the rect never leaves the frame or goes negative.
    pub fn with_col_rect(mut self, offset: Vec2, size: Vec2) -> Self {
        let offset = offset.clamp(Vec2::ZERO, self.size);
        let size = size.clamp(Vec2::ZERO, self.size - offset);
        self.col_offset = offset;
        self.col_size = size;
        self
    }

    pub fn with_massivity(mut self, massivity: Massivity) -> Self {
        self.massivity = massivity;
        self
    }

    pub fn with_array(mut self, array: ArrayBucket) -> Self {
        self.array = array;
        self
    }

    pub fn with_pos_z(mut self, z: f32) -> Self {
        self.pos_z = z;
        self
    }

    pub fn with_editor_pos_z(mut self, z: f32) -> Self {
        self.editor_pos_z = z;
        self
    }

    pub fn with_gravity_max(mut self, max: f32) -> Self {
        self.gravity_max = max;
        self
    }

    pub fn with_direction(mut self, direction: HorizDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_can_be_ground(mut self, can: bool) -> Self {
        self.can_be_ground = can;
        self
    }

    pub fn with_image(mut self, image: ImageId) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_spawned(mut self, spawned: bool) -> Self {
        self.spawned = spawned;
        self
    }

    // -- Geometry --

    /// Collision rectangle at the current position.
    pub fn col_rect(&self) -> ColRect {
        ColRect::from_pos_size(self.pos + self.col_offset, self.col_size)
    }

    /// Collision rectangle at the start position.
    pub fn start_col_rect(&self) -> ColRect {
        ColRect::from_pos_size(self.start_pos + self.col_offset, self.col_size)
    }

    /// Visual frame rectangle at the current position.
    pub fn frame_rect(&self) -> ColRect {
        ColRect::from_pos_size(self.pos, self.size)
    }

    /// Effective z on the editor axis (falls back to draw z when unset).
    pub fn editor_z(&self) -> f32 {
        if self.editor_pos_z > 0.0 {
            self.editor_pos_z
        } else {
            self.pos_z
        }
    }

    /// Whether this sprite still takes part in the frame.
    pub fn is_live(&self) -> bool {
        self.uid.is_some() && self.active && !self.auto_destroy
    }

    /// The image to draw this frame.
    pub fn current_image(&self) -> Option<ImageId> {
        self.animation
            .as_ref()
            .and_then(|a| a.current())
            .or(self.image)
    }

    /// Mark for removal at the end of the frame.
    pub fn destroy(&mut self) {
        self.auto_destroy = true;
        self.active = false;
    }
}

/// Placeholder value for slots being moved; never a live sprite.
impl Default for Sprite {
    fn default() -> Self {
        let mut s = Sprite::new(SpriteKind::Placeholder);
        s.active = false;
        s
    }
}
