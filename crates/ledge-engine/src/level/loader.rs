//! Level loading: JSON descriptors turned into live registry sprites.
//!
//! A level file is a flat list of tagged sprites, each carrying its own
//! string attribute list. Tags map to `SpriteKind` constructors here;
//! anything unrecognized becomes a visible placeholder instead of
//! failing the whole load.

use glam::Vec2;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::api::types::{ImageId, SpriteId};
use crate::assets::images::ImageSet;
use crate::collision::rect::ColRect;
use crate::core::registry::Registry;
use crate::core::uid::UidError;
use crate::level::attributes::Attributes;
use crate::sprites::animation::Animation;
use crate::sprites::kind::{ArrayBucket, HorizDirection, ItemKind, Massivity, SpriteKind};
use crate::sprites::sprite::Sprite;

const DEFAULT_FRAME_TIME: f32 = 6.0;
const CRATE_GRAVITY_MAX: f32 = 22.0;
const WALKER_GRAVITY_MAX: f32 = 20.0;
const MUSHROOM_GRAVITY_MAX: f32 = 18.0;

/// One sprite as stored in a level file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSprite {
    pub tag: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// A whole level file: play area, player start and the sprite list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub name: String,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_player_start")]
    pub player_start: [f32; 2],
    #[serde(default)]
    pub sprites: Vec<SavedSprite>,
}

fn default_player_start() -> [f32; 2] {
    [64.0, 64.0]
}

impl LevelDescriptor {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Playable area, origin at the top-left corner.
    pub fn bounds(&self) -> ColRect {
        ColRect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn start(&self) -> Vec2 {
        Vec2::from(self.player_start)
    }
}

/// Build one sprite from its tag and attributes. Never fails: unknown
/// tags and missing images degrade to placeholders with a warning.
pub fn build_sprite(tag: &str, attrs: &Attributes, images: &ImageSet) -> Sprite {
    let pos = Vec2::new(attrs.fetch("posx", 0.0), attrs.fetch("posy", 0.0));

    let mut sprite = match tag {
        "terrain" => {
            let massivity = attrs
                .get("massivity")
                .and_then(Massivity::from_tag)
                .unwrap_or(Massivity::Massive);
            let bucket = if massivity == Massivity::Passive {
                ArrayBucket::Passive
            } else {
                ArrayBucket::Massive
            };
            Sprite::new(SpriteKind::Terrain)
                .with_name("terrain")
                .with_size(size_attr(attrs, 64.0, 64.0))
                .with_massivity(massivity)
                .with_array(bucket)
                .with_can_be_ground(massivity.can_block())
        }
        "platform" => {
            let target = Vec2::new(
                attrs.fetch("targetx", pos.x),
                attrs.fetch("targety", pos.y),
            );
            Sprite::new(SpriteKind::MovingPlatform {
                origin: pos,
                target,
                speed: attrs.fetch("speed", 2.0),
                heading: 1.0,
            })
            .with_name("platform")
            .with_size(size_attr(attrs, 96.0, 24.0))
            .with_massivity(Massivity::Massive)
            .with_array(ArrayBucket::Active)
            .with_can_be_ground(true)
        }
        "crate" => Sprite::new(SpriteKind::Crate)
            .with_name("crate")
            .with_size(size_attr(attrs, 48.0, 48.0))
            .with_massivity(Massivity::Massive)
            .with_array(ArrayBucket::Active)
            .with_can_be_ground(true)
            .with_gravity_max(CRATE_GRAVITY_MAX),
        "bonus_box" => {
            let item = attrs
                .get("item")
                .and_then(ItemKind::from_tag)
                .unwrap_or(ItemKind::Goldpiece);
            Sprite::new(SpriteKind::BonusBox { item, used: false })
                .with_name("bonus_box")
                .with_size(size_attr(attrs, 48.0, 48.0))
                .with_massivity(Massivity::Massive)
                .with_array(ArrayBucket::Active)
                .with_can_be_ground(true)
        }
        "lava" => Sprite::new(SpriteKind::Lava)
            .with_name("lava")
            .with_size(size_attr(attrs, 64.0, 64.0))
            .with_massivity(Massivity::Passive)
            .with_array(ArrayBucket::Lava),
        "item" => {
            let item = attrs
                .get("item")
                .and_then(ItemKind::from_tag)
                .unwrap_or(ItemKind::Goldpiece);
            let mut sprite = Sprite::new(SpriteKind::Item { item })
                .with_name(item.as_tag())
                .with_size(size_attr(attrs, 28.0, 28.0))
                .with_massivity(Massivity::Passive)
                .with_array(ArrayBucket::Active);
            if item == ItemKind::Mushroom {
                sprite = sprite.with_gravity_max(MUSHROOM_GRAVITY_MAX);
            }
            sprite
        }
        "walker" => Sprite::new(SpriteKind::Walker)
            .with_name("walker")
            .with_size(size_attr(attrs, 36.0, 36.0))
            .with_massivity(Massivity::Passive)
            .with_array(ArrayBucket::Enemy)
            .with_gravity_max(WALKER_GRAVITY_MAX),
        "enemy_stopper" => Sprite::new(SpriteKind::EnemyStopper)
            .with_name("enemy_stopper")
            .with_size(size_attr(attrs, 16.0, 64.0))
            .with_massivity(Massivity::Passive)
            .with_array(ArrayBucket::Passive),
        other => {
            warn!("unknown sprite tag {:?}, placing a placeholder", other);
            Sprite::new(SpriteKind::Placeholder)
                .with_name(other)
                .with_size(size_attr(attrs, 32.0, 32.0))
                .with_massivity(Massivity::Passive)
                .with_array(ArrayBucket::Passive)
        }
    };

    sprite = sprite.with_pos(pos);

    if attrs.contains("col_w") || attrs.contains("col_h") {
        let offset = Vec2::new(attrs.fetch("col_x", 0.0), attrs.fetch("col_y", 0.0));
        let size = Vec2::new(
            attrs.fetch("col_w", sprite.size.x),
            attrs.fetch("col_h", sprite.size.y),
        );
        sprite = sprite.with_col_rect(offset, size);
    }

    if let Some(direction) = attrs.get("direction").and_then(HorizDirection::from_tag) {
        sprite = sprite.with_direction(direction);
    }

    if let Some(name) = attrs.get("image") {
        sprite = sprite
            .with_name(name)
            .with_image(images.get_or_placeholder(name));
    }
    if let Some(frames) = attrs.get("frames") {
        let ids: Vec<ImageId> = frames
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| images.get_or_placeholder(n))
            .collect();
        if !ids.is_empty() {
            let frame_time = attrs.fetch("frame_time", DEFAULT_FRAME_TIME);
            sprite = sprite.with_animation(Animation::new(ids, frame_time, true));
        }
    }

    let z = attrs.fetch("z", 0.0);
    if z > 0.0 {
        sprite = sprite.with_pos_z(z);
    }
    let editor_z = attrs.fetch("editor_z", 0.0);
    if editor_z > 0.0 {
        sprite = sprite.with_editor_pos_z(editor_z);
    }
    if let Ok(uid) = attrs.retrieve::<u32>("uid") {
        sprite.uid = Some(SpriteId(uid));
    }
    sprite
}

/// Replace the registry contents with the descriptor's sprites.
///
/// Saved uids are claimed where possible so ground references stay
/// valid; references to uids that never load are dropped with a
/// warning.
pub fn populate_registry(
    desc: &LevelDescriptor,
    images: &ImageSet,
    reg: &mut Registry,
) -> Result<(), UidError> {
    reg.delete_all();
    let mut ground_links = Vec::new();
    for saved in &desc.sprites {
        let sprite = build_sprite(&saved.tag, &saved.attributes, images);
        let ground = saved.attributes.retrieve::<u32>("ground_uid").ok();
        let id = reg.add(sprite)?;
        if let Some(ground) = ground {
            ground_links.push((id, SpriteId(ground)));
        }
    }
    // Ground references can point at sprites that load later, so they
    // resolve only after the whole list is in.
    for (id, ground) in ground_links {
        if reg.uid_in_use(ground) {
            if let Some(sprite) = reg.get_mut(id) {
                sprite.ground_object = Some(ground);
            }
        } else {
            warn!(
                "sprite {} references missing ground uid {}",
                id.0, ground.0
            );
        }
    }
    Ok(())
}

fn size_attr(attrs: &Attributes, width: f32, height: f32) -> Vec2 {
    Vec2::new(attrs.fetch("width", width), attrs.fetch("height", height))
}
