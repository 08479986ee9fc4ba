//! The per-level engine context: every live system in one place, run
//! one frame at a time.
//!
//! `step` is the whole simulation frame in its canonical order: clock,
//! input, sprite behavior, the player, movement with collision
//! dispatch, level bounds, deferred spawns, registry maintenance and
//! finally the camera. Hosts call it once per rendered frame with the
//! real elapsed time and read back `sounds` and `events`.

use std::collections::HashSet;

use glam::Vec2;
use log::{info, warn};

use crate::api::types::{GameEvent, SoundRequest, SpriteId};
use crate::assets::images::ImageSet;
use crate::collision::protocol::CollisionEvent;
use crate::collision::query::collide_move;
use crate::collision::rect::ColRect;
use crate::core::registry::Registry;
use crate::core::time::FrameClock;
use crate::core::uid::UidError;
use crate::input::queue::InputQueue;
use crate::input::state::{InputState, KeyBindings};
use crate::level::loader::{populate_registry, LevelDescriptor};
use crate::level::save::save_level;
use crate::player::character::Player;
use crate::render::camera::Camera;
use crate::render::draw::{build_draw_buffer, DrawBuffer};
use crate::sprites::behavior::{
    enforce_level_bounds, handle_sprite_collision, settle_after_move, update_items, EffectQueue,
};
use crate::sprites::kind::{ArrayBucket, Massivity, SpriteKind};
use crate::sprites::sprite::Sprite;

/// Owns one loaded level and everything that happens inside it.
pub struct LevelContext {
    pub registry: Registry,
    pub player: Player,
    pub camera: Camera,
    pub images: ImageSet,
    pub clock: FrameClock,
    pub input: InputState,
    pub bindings: KeyBindings,
    /// Sounds requested this frame, cleared by the next `step`.
    pub sounds: Vec<SoundRequest>,
    /// Game events emitted this frame, cleared by the next `step`.
    pub events: Vec<GameEvent>,
    spawns: Vec<Sprite>,
    /// The sprite the player is carrying, with the massivity to restore
    /// when it is put down. Carried sprites stop blocking their carrier.
    carried: Option<(SpriteId, Massivity)>,
    level_rect: ColRect,
    level_name: String,
}

impl LevelContext {
    pub fn new(view_width: f32, view_height: f32) -> Self {
        Self {
            registry: Registry::new(),
            player: Player::new(Vec2::new(64.0, 64.0)),
            camera: Camera::new(view_width, view_height),
            images: ImageSet::new(),
            clock: FrameClock::new(),
            input: InputState::new(),
            bindings: KeyBindings::default(),
            sounds: Vec::with_capacity(32),
            events: Vec::with_capacity(32),
            spawns: Vec::new(),
            carried: None,
            level_rect: ColRect::new(0.0, 0.0, view_width, view_height),
            level_name: String::new(),
        }
    }

    /// Replace the current level with the descriptor's contents and
    /// reset the player, clock and camera for it.
    pub fn load_level(&mut self, desc: &LevelDescriptor) -> Result<(), UidError> {
        populate_registry(desc, &self.images, &mut self.registry)?;
        self.player = Player::new(desc.start());
        self.level_rect = desc.bounds();
        self.level_name = desc.name.clone();
        self.camera.confine(self.level_rect);
        self.camera.snap_to(self.player.sprite.col_rect().center());
        self.clock.reset();
        self.input.clear();
        self.sounds.clear();
        self.events.clear();
        self.spawns.clear();
        self.carried = None;
        info!(
            "level {:?} loaded: {} sprites, {}x{}",
            desc.name,
            self.registry.len(),
            desc.width,
            desc.height
        );
        Ok(())
    }

    /// Capture the current level back into a descriptor, named after
    /// the one that was loaded.
    pub fn save_level(&self) -> LevelDescriptor {
        save_level(
            &self.registry,
            &self.images,
            &self.level_name,
            Vec2::new(self.level_rect.w, self.level_rect.h),
            self.player.sprite.start_pos,
        )
    }

    /// Advance the whole simulation by `dt` seconds, consuming the
    /// host's queued input.
    pub fn step(&mut self, dt: f32, input: &mut InputQueue) {
        self.sounds.clear();
        self.events.clear();

        let sf = self.clock.advance(dt);
        self.input.drain_queue(input);
        let controls = self.input.digest(&self.bindings);

        // Sprites only simulate near the camera; the rest of the level
        // stays frozen until it scrolls into range.
        let range = self.camera.update_range();
        update_items(&mut self.registry, &range, sf);

        {
            let mut fx = effects(&mut self.sounds, &mut self.events, &mut self.spawns);
            self.player
                .update(&controls, &self.registry, sf, &mut fx);
        }

        self.reconcile_hold();
        self.run_collision_pass(sf);
        self.player.carry_held(&mut self.registry);

        let bounds = self.level_rect;
        for sprite in self.registry.iter_mut() {
            if sprite.is_live() {
                enforce_level_bounds(sprite, &bounds);
            }
        }
        {
            let mut fx = effects(&mut self.sounds, &mut self.events, &mut self.spawns);
            self.player.enforce_level_bounds(&bounds, &mut fx);
        }
        self.player.post_move(&self.registry);

        self.flush_spawns();

        let removed = self.registry.end_of_frame();
        if !removed.is_empty() {
            if let Some(ground) = self.player.sprite.ground_object {
                if removed.contains(&ground) {
                    self.player.sprite.ground_object = None;
                }
            }
            if let Some(link) = self.player.linked_to() {
                if removed.contains(&link) {
                    self.player.release_link();
                }
            }
            if let Some(held) = self.player.held_object() {
                if removed.contains(&held) {
                    self.player.release_hold();
                }
            }
        }

        self.camera
            .follow(self.player.sprite.col_rect().center(), sf);
    }

    /// Fill `buf` with this frame's draw list.
    pub fn draw(&self, buf: &mut DrawBuffer, editor_order: bool) {
        build_draw_buffer(
            &self.registry,
            Some(&self.player.sprite),
            &self.camera,
            editor_order,
            buf,
        );
    }

    pub fn play_sound(&mut self, name: &str) {
        self.sounds.push(SoundRequest::new(name));
    }

    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Queue a sprite for insertion at the end of the current frame.
    pub fn spawn(&mut self, sprite: Sprite) {
        self.spawns.push(sprite);
    }

    pub fn level_rect(&self) -> ColRect {
        self.level_rect
    }

    /// Track pickup and putdown. A carried sprite must not block the
    /// carrier, so its massivity is parked until the hold ends.
    fn reconcile_hold(&mut self) {
        let held = self.player.held_object();
        if let Some((id, _)) = self.carried {
            if held == Some(id) {
                return;
            }
        }
        if let Some((id, massivity)) = self.carried.take() {
            if let Some(sprite) = self.registry.get_mut(id) {
                sprite.massivity = massivity;
            }
        }
        if let Some(id) = held {
            if let Some(sprite) = self.registry.get_mut(id) {
                self.carried = Some((id, sprite.massivity));
                sprite.massivity = Massivity::Passive;
            }
        }
    }

    /// Move every Active and Enemy sprite by its velocity, then the
    /// player, delivering collision events to both parties of every
    /// contact. A contact pair is dispatched at most once per frame no
    /// matter which party's movement produced it.
    fn run_collision_pass(&mut self, sf: f32) {
        let held = self.player.held_object();
        let mover_ids: Vec<SpriteId> = self
            .registry
            .iter()
            .filter(|s| {
                s.is_live()
                    && matches!(s.array, ArrayBucket::Active | ArrayBucket::Enemy)
                    // Platforms move themselves in update_items.
                    && !matches!(s.kind, SpriteKind::MovingPlatform { .. })
            })
            .filter_map(|s| s.uid)
            // A carried sprite is pinned to the player instead.
            .filter(|&sid| Some(sid) != held)
            .collect();

        let mut handled: HashSet<(u32, u32)> = HashSet::new();

        for id in mover_ids {
            let Some(idx) = self.registry.index_of(id) else {
                continue;
            };
            let mut mover = self.registry.take_slot(idx);
            if !mover.is_live() {
                self.registry.put_back(idx, mover);
                continue;
            }
            let delta = mover.vel * sf;
            let player = (!self.player.dead).then_some(&self.player.sprite);
            let outcome = collide_move(&mut mover, &self.registry, player, delta);
            settle_after_move(&mut mover, delta.y > 0.0, &outcome, &self.registry);

            for hit in &outcome.contacts {
                if !note_pair(&mut handled, id, hit.id) {
                    continue;
                }
                let mover_event = CollisionEvent {
                    other: hit.id,
                    other_array: hit.array,
                    direction: hit.direction.opposite(),
                    validation: hit.validation,
                };
                let counterpart = mover_event.mirrored(id, mover.array);
                let mut fx = effects(&mut self.sounds, &mut self.events, &mut self.spawns);
                handle_sprite_collision(&mut mover, &mover_event, &mut self.registry, &mut fx);
                if hit.id == SpriteId::PLAYER {
                    self.player.handle_collision(&counterpart, &mover, &mut fx);
                } else if let Some(target_idx) = self.registry.index_of(hit.id) {
                    let mut target = self.registry.take_slot(target_idx);
                    handle_sprite_collision(
                        &mut target,
                        &counterpart,
                        &mut self.registry,
                        &mut fx,
                    );
                    self.registry.put_back(target_idx, target);
                }
            }
            self.registry.put_back(idx, mover);
        }

        // The player moves last so pushes land on settled sprites. The
        // blocking itself happens inside collide_move; the handlers
        // only decide how both parties react.
        if self.player.dead {
            return;
        }
        let delta = self.player.sprite.vel * sf;
        let outcome = collide_move(&mut self.player.sprite, &self.registry, None, delta);
        for hit in &outcome.contacts {
            // Brushing against the carried sprite is not a contact.
            if Some(hit.id) == held {
                continue;
            }
            if !note_pair(&mut handled, SpriteId::PLAYER, hit.id) {
                continue;
            }
            let player_event = CollisionEvent {
                other: hit.id,
                other_array: hit.array,
                direction: hit.direction.opposite(),
                validation: hit.validation,
            };
            let Some(target_idx) = self.registry.index_of(hit.id) else {
                continue;
            };
            let mut target = self.registry.take_slot(target_idx);
            let mut fx = effects(&mut self.sounds, &mut self.events, &mut self.spawns);
            self.player.handle_collision(&player_event, &target, &mut fx);
            let counterpart = player_event.mirrored(SpriteId::PLAYER, ArrayBucket::Player);
            handle_sprite_collision(&mut target, &counterpart, &mut self.registry, &mut fx);
            self.registry.put_back(target_idx, target);
        }
    }

    /// Insert this frame's deferred spawns, resolving images by sprite
    /// name for spawns that came in without one.
    fn flush_spawns(&mut self) {
        for mut sprite in self.spawns.drain(..) {
            if sprite.image.is_none() && sprite.animation.is_none() {
                sprite.image = Some(self.images.get_or_placeholder(&sprite.name));
            }
            if let Err(err) = self.registry.add(sprite) {
                warn!("dropping spawned sprite: {}", err);
            }
        }
    }
}

fn effects<'a>(
    sounds: &'a mut Vec<SoundRequest>,
    events: &'a mut Vec<GameEvent>,
    spawns: &'a mut Vec<Sprite>,
) -> EffectQueue<'a> {
    EffectQueue {
        sounds,
        events,
        spawns,
    }
}

/// Record a contact pair, returning false when it was already
/// dispatched this frame.
fn note_pair(handled: &mut HashSet<(u32, u32)>, a: SpriteId, b: SpriteId) -> bool {
    let key = if a.0 <= b.0 { (a.0, b.0) } else { (b.0, a.0) };
    handled.insert(key)
}
