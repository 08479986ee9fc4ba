//! Saving the live registry back into a level descriptor.
//!
//! The inverse of `loader`: every attribute written here is one the
//! loader reads. Positions come from `start_pos` so a level saved
//! mid-play still records the designed layout.

use glam::Vec2;

use crate::assets::images::ImageSet;
use crate::core::registry::Registry;
use crate::level::attributes::Attributes;
use crate::level::loader::{LevelDescriptor, SavedSprite};
use crate::sprites::kind::{HorizDirection, ItemKind, Massivity, SpriteKind};
use crate::sprites::sprite::Sprite;

/// The level-file tag for a sprite kind, or `None` for kinds that
/// never save (the player lives outside level files, placeholders
/// keep their original tag in the sprite name).
pub fn type_tag(kind: &SpriteKind) -> Option<&'static str> {
    match kind {
        SpriteKind::Terrain => Some("terrain"),
        SpriteKind::MovingPlatform { .. } => Some("platform"),
        SpriteKind::Crate => Some("crate"),
        SpriteKind::BonusBox { .. } => Some("bonus_box"),
        SpriteKind::Lava => Some("lava"),
        SpriteKind::Item { .. } => Some("item"),
        SpriteKind::Walker => Some("walker"),
        SpriteKind::EnemyStopper => Some("enemy_stopper"),
        SpriteKind::Player | SpriteKind::Placeholder => None,
    }
}

/// Serialize one sprite, or `None` for sprites that do not belong in a
/// level file (the player, runtime spawns).
pub fn save_sprite(sprite: &Sprite) -> Option<SavedSprite> {
    if sprite.spawned {
        return None;
    }
    let tag = match &sprite.kind {
        SpriteKind::Player => return None,
        // A placeholder stands in for a tag this build did not know;
        // writing that tag back keeps the level intact for one that does.
        SpriteKind::Placeholder => sprite.name.clone(),
        kind => type_tag(kind)?.to_string(),
    };
    Some(SavedSprite {
        tag,
        attributes: sprite_attributes(sprite),
    })
}

fn sprite_attributes(sprite: &Sprite) -> Attributes {
    let mut attrs = Attributes::new();
    if let Some(uid) = sprite.uid {
        attrs.set("uid", uid.0);
    }
    attrs.set("posx", sprite.start_pos.x);
    attrs.set("posy", sprite.start_pos.y);
    attrs.set("width", sprite.size.x);
    attrs.set("height", sprite.size.y);
    if sprite.col_offset != Vec2::ZERO || sprite.col_size != sprite.size {
        attrs.set("col_x", sprite.col_offset.x);
        attrs.set("col_y", sprite.col_offset.y);
        attrs.set("col_w", sprite.col_size.x);
        attrs.set("col_h", sprite.col_size.y);
    }
    match sprite.kind {
        SpriteKind::Terrain => {
            if sprite.massivity != Massivity::Massive {
                attrs.set("massivity", sprite.massivity.as_tag());
            }
        }
        SpriteKind::MovingPlatform { target, speed, .. } => {
            attrs.set("targetx", target.x);
            attrs.set("targety", target.y);
            attrs.set("speed", speed);
        }
        SpriteKind::BonusBox { item, .. } => {
            attrs.set("item", item.as_tag());
        }
        SpriteKind::Item { item } => {
            attrs.set("item", item.as_tag());
            if item == ItemKind::Mushroom {
                attrs.set("direction", sprite.direction.as_tag());
            }
        }
        SpriteKind::Walker => {
            attrs.set("direction", sprite.direction.as_tag());
        }
        _ => {}
    }
    if sprite.direction == HorizDirection::Left && !attrs.contains("direction") {
        attrs.set("direction", sprite.direction.as_tag());
    }
    if sprite.image.is_some() {
        attrs.set("image", &sprite.name);
    }
    if let Some(anim) = &sprite.animation {
        attrs.set("frame_time", anim.frame_time);
    }
    if let Some(ground) = sprite.ground_object {
        attrs.set("ground_uid", ground.0);
    }
    attrs
}

/// Capture the registry as a level descriptor.
///
/// Animation frame lists need image names, so the image set rewrites
/// the `frames` attribute after the per-sprite pass.
pub fn save_level(
    reg: &Registry,
    images: &ImageSet,
    name: &str,
    size: Vec2,
    player_start: Vec2,
) -> LevelDescriptor {
    let mut sprites = Vec::with_capacity(reg.len());
    for sprite in reg.iter() {
        let Some(mut saved) = save_sprite(sprite) else {
            continue;
        };
        if let Some(anim) = &sprite.animation {
            let names: Vec<&str> = anim
                .frames
                .iter()
                .filter_map(|id| images.file_name(*id))
                .collect();
            if !names.is_empty() {
                saved.attributes.set("frames", names.join(","));
            }
        }
        sprites.push(saved);
    }
    LevelDescriptor {
        name: name.to_string(),
        width: size.x,
        height: size.y,
        player_start: [player_start.x, player_start.y],
        sprites,
    }
}
