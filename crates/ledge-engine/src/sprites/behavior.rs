//! Per-kind sprite behavior: movement updates and contact responses.
//!
//! `update_items` runs once per frame before the collision pass and only
//! touches the sprite itself. Cross-sprite reactions happen in
//! `handle_sprite_collision`, driven by the events the collision pass
//! produces.

use glam::Vec2;

use crate::api::types::{GameEvent, SoundRequest, SpriteId};
use crate::collision::protocol::{CollisionEvent, Validation};
use crate::collision::query::MoveOutcome;
use crate::collision::rect::{ColRect, Direction};
use crate::core::registry::Registry;
use crate::sprites::kind::{ArrayBucket, HorizDirection, ItemKind, Massivity, SpriteKind};
use crate::sprites::sprite::Sprite;

pub const GRAVITY_ACCEL: f32 = 2.8;

const WALKER_SPEED: f32 = 3.0;
const MUSHROOM_SPEED: f32 = 3.0;
const MUSHROOM_GRAVITY_MAX: f32 = 18.0;
const CRATE_PUSH: f32 = 20.0;
const CRATE_SLOWDOWN: f32 = 0.2;
const CRATE_STOP_TOLERANCE: f32 = 0.3;
pub(crate) const CRATE_CRUSH_MIN_FALL: f32 = 0.5;

/// Points for squashing an enemy, before any chain multiplier.
pub const KILL_POINTS: f32 = 50.0;
pub const GOLD_POINTS: f32 = 100.0;

const SOUND_CRATE_PUSH: &str = "wood_1.ogg";
const SOUND_BOX_POP: &str = "sprout_1.ogg";
const SOUND_STOMP: &str = "stomp_1.ogg";
const SOUND_BURN: &str = "burn_1.ogg";
const SOUND_COIN: &str = "coin_1.ogg";
const SOUND_POWERUP: &str = "powerup_1.ogg";

/// Side effects a frame accumulates while sprites react to each other.
/// Spawns are held back and enter the registry after the collision pass.
pub struct EffectQueue<'a> {
    pub sounds: &'a mut Vec<SoundRequest>,
    pub events: &'a mut Vec<GameEvent>,
    pub spawns: &'a mut Vec<Sprite>,
}

impl EffectQueue<'_> {
    pub fn play_sound(&mut self, name: &str) {
        self.sounds.push(SoundRequest::new(name));
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn spawn(&mut self, sprite: Sprite) {
        self.spawns.push(sprite);
    }
}

/// Accelerate downward, honoring the sprite's terminal velocity.
pub fn apply_gravity(sprite: &mut Sprite, speed_factor: f32) {
    sprite.vel.y += GRAVITY_ACCEL * speed_factor;
    if sprite.gravity_max > 0.0 && sprite.vel.y > sprite.gravity_max {
        sprite.vel.y = sprite.gravity_max;
    }
}

// -- Frame update --

/// Advance every live sprite inside `range`. Platform riders are moved
/// by the same delta as their platform, after all platforms have moved.
pub fn update_items(reg: &mut Registry, range: &ColRect, speed_factor: f32) {
    let mut carried: Vec<(SpriteId, Vec2)> = Vec::new();
    for sprite in reg.iter_mut() {
        if !sprite.is_live() || !range.intersects(&sprite.frame_rect()) {
            continue;
        }
        if let (Some(delta), Some(uid)) = (update_sprite(sprite, speed_factor), sprite.uid) {
            carried.push((uid, delta));
        }
    }
    for (platform, delta) in carried {
        for sprite in reg.iter_mut() {
            if sprite.is_live() && sprite.ground_object == Some(platform) {
                sprite.pos += delta;
            }
        }
    }
}

/// Self-contained per-kind update. Returns the frame delta for platforms
/// so riders can be carried.
fn update_sprite(sprite: &mut Sprite, speed_factor: f32) -> Option<Vec2> {
    let mut platform_delta = None;
    match sprite.kind {
        SpriteKind::MovingPlatform {
            origin,
            target,
            speed,
            heading,
        } => {
            let goal = if heading >= 0.0 { target } else { origin };
            let to_goal = goal - sprite.pos;
            let step = speed * speed_factor;
            let delta = if to_goal.length() <= step {
                sprite.kind = SpriteKind::MovingPlatform {
                    origin,
                    target,
                    speed,
                    heading: -heading,
                };
                to_goal
            } else {
                to_goal.normalize_or_zero() * step
            };
            sprite.pos += delta;
            // Per-frame velocity, so riders standing on us can read it.
            sprite.vel = if speed_factor > 0.0 {
                delta / speed_factor
            } else {
                Vec2::ZERO
            };
            platform_delta = Some(delta);
        }
        SpriteKind::Crate => {
            sprite.vel.x -= sprite.vel.x * CRATE_SLOWDOWN * speed_factor;
            if sprite.vel.x.abs() < CRATE_STOP_TOLERANCE {
                sprite.vel.x = 0.0;
            }
            if sprite.ground_object.is_none() {
                apply_gravity(sprite, speed_factor);
            }
        }
        SpriteKind::Walker => {
            sprite.vel.x = sprite.direction.sign() * WALKER_SPEED;
            if sprite.ground_object.is_none() {
                apply_gravity(sprite, speed_factor);
            }
        }
        SpriteKind::Item {
            item: ItemKind::Mushroom,
        } => {
            sprite.vel.x = sprite.direction.sign() * MUSHROOM_SPEED;
            if sprite.ground_object.is_none() {
                apply_gravity(sprite, speed_factor);
            }
        }
        _ => {}
    }
    if let Some(anim) = sprite.animation.as_mut() {
        anim.tick(speed_factor);
    }
    platform_delta
}

/// Generic physical response after a stepped move: stop against what
/// blocked us and record the ground when the move was downward.
pub fn settle_after_move(
    sprite: &mut Sprite,
    moved_down: bool,
    outcome: &MoveOutcome,
    reg: &Registry,
) {
    if outcome.blocked_x {
        sprite.vel.x = 0.0;
    }
    if outcome.blocked_y {
        if moved_down {
            sprite.ground_object = outcome
                .contacts
                .iter()
                .find(|c| {
                    c.validation == Validation::Blocking
                        && c.direction == Direction::Top
                        && reg.get(c.id).map_or(false, |t| t.can_be_ground)
                })
                .map(|c| c.id);
        }
        sprite.vel.y = 0.0;
    }
}

// -- Contact responses --

/// React to one collision event, from the receiver's point of view.
/// `event.direction` is the receiver's own face that made contact.
pub fn handle_sprite_collision(
    sprite: &mut Sprite,
    event: &CollisionEvent,
    reg: &mut Registry,
    fx: &mut EffectQueue,
) {
    match sprite.kind {
        SpriteKind::Crate => crate_collision(sprite, event, reg, fx),
        SpriteKind::BonusBox { .. } => bonus_box_collision(sprite, event, fx),
        SpriteKind::Walker => walker_collision(sprite, event, fx),
        SpriteKind::Item { .. } => item_collision(sprite, event, fx),
        _ => {}
    }
}

fn crate_collision(sprite: &mut Sprite, event: &CollisionEvent, reg: &mut Registry, fx: &mut EffectQueue) {
    match event.other_array {
        // Pushes only come through blocking contact; a carried crate
        // rides along without being shoved.
        ArrayBucket::Player if event.validation == Validation::Blocking => {
            match event.direction {
                // Shoved from the side; the knock only sounds when the
                // crate was at rest.
                Direction::Left => {
                    if sprite.vel.x.abs() < CRATE_STOP_TOLERANCE {
                        fx.play_sound(SOUND_CRATE_PUSH);
                    }
                    sprite.vel.x = CRATE_PUSH;
                }
                Direction::Right => {
                    if sprite.vel.x.abs() < CRATE_STOP_TOLERANCE {
                        fx.play_sound(SOUND_CRATE_PUSH);
                    }
                    sprite.vel.x = -CRATE_PUSH;
                }
                _ => {}
            }
        }
        ArrayBucket::Enemy => {
            // Landing on an enemy crushes it.
            if event.direction == Direction::Bottom && sprite.vel.y > CRATE_CRUSH_MIN_FALL {
                if let Some(victim) = reg.get_mut(event.other) {
                    let at = victim.pos;
                    victim.destroy();
                    fx.play_sound(SOUND_STOMP);
                    fx.emit(GameEvent::new(GameEvent::KIND_POINTS, KILL_POINTS, at.x, at.y));
                }
            }
        }
        ArrayBucket::Lava => burn_up(sprite, fx),
        _ => {}
    }
}

fn bonus_box_collision(sprite: &mut Sprite, event: &CollisionEvent, fx: &mut EffectQueue) {
    // Only a head bump from the player opens the box.
    if event.other_array != ArrayBucket::Player || event.direction != Direction::Bottom {
        return;
    }
    if let SpriteKind::BonusBox { item, used } = &mut sprite.kind {
        if *used {
            return;
        }
        *used = true;
        let item = *item;
        fx.play_sound(SOUND_BOX_POP);
        match item {
            // Coins are banked directly instead of spawning a pickup.
            ItemKind::Goldpiece => {
                fx.emit(GameEvent::new(
                    GameEvent::KIND_POINTS,
                    GOLD_POINTS,
                    sprite.pos.x,
                    sprite.pos.y,
                ));
            }
            ItemKind::Mushroom | ItemKind::Feather => {
                let spawned = spawn_item(
                    item,
                    Vec2::new(sprite.pos.x, sprite.pos.y - sprite.size.y),
                    sprite.direction,
                );
                fx.spawn(spawned);
            }
        }
    }
}

fn walker_collision(sprite: &mut Sprite, event: &CollisionEvent, fx: &mut EffectQueue) {
    match event.other_array {
        ArrayBucket::Player => {
            // Stomped from above; a side touch hurts the player instead,
            // which the player's own handler resolves.
            if event.direction == Direction::Top {
                sprite.destroy();
                fx.play_sound(SOUND_STOMP);
            }
        }
        ArrayBucket::Lava => burn_up(sprite, fx),
        _ => {
            // Walls, crates, stoppers and other enemies all turn us around.
            if event.direction.is_horizontal() {
                sprite.direction = sprite.direction.flip();
            }
        }
    }
}

fn item_collision(sprite: &mut Sprite, event: &CollisionEvent, fx: &mut EffectQueue) {
    let item = match sprite.kind {
        SpriteKind::Item { item } => item,
        _ => return,
    };
    match event.other_array {
        ArrayBucket::Player => {
            sprite.destroy();
            match item {
                ItemKind::Goldpiece => {
                    fx.play_sound(SOUND_COIN);
                    fx.emit(GameEvent::new(
                        GameEvent::KIND_POINTS,
                        GOLD_POINTS,
                        sprite.pos.x,
                        sprite.pos.y,
                    ));
                }
                ItemKind::Mushroom | ItemKind::Feather => {
                    fx.play_sound(SOUND_POWERUP);
                }
            }
            fx.emit(GameEvent::new(
                GameEvent::KIND_ITEM_COLLECTED,
                item as u8 as f32,
                sprite.pos.x,
                sprite.pos.y,
            ));
        }
        ArrayBucket::Lava => burn_up(sprite, fx),
        _ => {
            // Walking mushrooms bounce off walls like enemies do.
            if item == ItemKind::Mushroom
                && event.direction.is_horizontal()
                && event.validation == Validation::Blocking
            {
                sprite.direction = sprite.direction.flip();
            }
        }
    }
}

fn burn_up(sprite: &mut Sprite, fx: &mut EffectQueue) {
    sprite.destroy();
    fx.play_sound(SOUND_BURN);
}

/// Build a pickup the way bonus boxes release them.
pub fn spawn_item(item: ItemKind, pos: Vec2, direction: HorizDirection) -> Sprite {
    let name = match item {
        ItemKind::Goldpiece => "goldpiece",
        ItemKind::Mushroom => "mushroom",
        ItemKind::Feather => "feather",
    };
    let mut sprite = Sprite::new(SpriteKind::Item { item })
        .with_name(name)
        .with_pos(pos)
        .with_size(Vec2::new(28.0, 28.0))
        .with_array(ArrayBucket::Active)
        .with_massivity(Massivity::Passive)
        .with_direction(direction)
        .with_spawned(true);
    if item == ItemKind::Mushroom {
        sprite = sprite.with_gravity_max(MUSHROOM_GRAVITY_MAX);
    }
    sprite
}

/// Keep a sprite inside the level. Side edges clamp (patrollers turn
/// around), falling past the bottom destroys. Returns true when the
/// sprite was destroyed.
pub fn enforce_level_bounds(sprite: &mut Sprite, bounds: &ColRect) -> bool {
    let rect = sprite.col_rect();
    if rect.top() > bounds.bottom() {
        sprite.destroy();
        return true;
    }
    if rect.left() < bounds.left() {
        sprite.pos.x += bounds.left() - rect.left();
        turn_or_stop(sprite);
    } else if rect.right() > bounds.right() {
        sprite.pos.x -= rect.right() - bounds.right();
        turn_or_stop(sprite);
    }
    false
}

fn turn_or_stop(sprite: &mut Sprite) {
    match sprite.kind {
        SpriteKind::Walker
        | SpriteKind::Item {
            item: ItemKind::Mushroom,
        } => sprite.direction = sprite.direction.flip(),
        _ => sprite.vel.x = 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue<'a>(
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

    fn event(other_array: ArrayBucket, direction: Direction, validation: Validation) -> CollisionEvent {
        CollisionEvent {
            other: SpriteId(7),
            other_array,
            direction,
            validation,
        }
    }

    #[test]
    fn resting_crate_is_pushed_away_from_the_player() {
        let mut sounds = Vec::new();
        let mut events = Vec::new();
        let mut spawns = Vec::new();
        let mut fx = queue(&mut sounds, &mut events, &mut spawns);
        let mut reg = Registry::new();

        let mut krate = Sprite::new(SpriteKind::Crate);
        let ev = event(ArrayBucket::Player, Direction::Left, Validation::Blocking);
        handle_sprite_collision(&mut krate, &ev, &mut reg, &mut fx);
        assert_eq!(krate.vel.x, CRATE_PUSH);
        assert_eq!(sounds.len(), 1);

        // A second shove while already sliding stays silent.
        let mut fx = queue(&mut sounds, &mut events, &mut spawns);
        handle_sprite_collision(&mut krate, &ev, &mut reg, &mut fx);
        assert_eq!(sounds.len(), 1);
    }

    #[test]
    fn falling_crate_crushes_an_enemy() {
        let mut reg = Registry::new();
        let walker = reg
            .add(
                Sprite::new(SpriteKind::Walker)
                    .with_pos(Vec2::new(64.0, 64.0))
                    .with_size(Vec2::new(32.0, 32.0))
                    .with_array(ArrayBucket::Enemy),
            )
            .unwrap();

        let mut sounds = Vec::new();
        let mut events = Vec::new();
        let mut spawns = Vec::new();
        let mut fx = queue(&mut sounds, &mut events, &mut spawns);

        let mut krate = Sprite::new(SpriteKind::Crate);
        krate.vel.y = 5.0;
        let mut ev = event(ArrayBucket::Enemy, Direction::Bottom, Validation::Internal);
        ev.other = walker;
        handle_sprite_collision(&mut krate, &ev, &mut reg, &mut fx);

        assert!(!reg.get(walker).unwrap().is_live());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, GameEvent::KIND_POINTS);
        assert_eq!(events[0].a, KILL_POINTS);
    }

    #[test]
    fn slow_crate_does_not_crush() {
        let mut reg = Registry::new();
        let walker = reg
            .add(Sprite::new(SpriteKind::Walker).with_array(ArrayBucket::Enemy))
            .unwrap();

        let mut sounds = Vec::new();
        let mut events = Vec::new();
        let mut spawns = Vec::new();
        let mut fx = queue(&mut sounds, &mut events, &mut spawns);

        let mut krate = Sprite::new(SpriteKind::Crate);
        krate.vel.y = 0.2;
        let mut ev = event(ArrayBucket::Enemy, Direction::Bottom, Validation::Internal);
        ev.other = walker;
        handle_sprite_collision(&mut krate, &ev, &mut reg, &mut fx);
        assert!(reg.get(walker).unwrap().is_live());
    }

    #[test]
    fn bonus_box_pops_exactly_once() {
        let mut sounds = Vec::new();
        let mut events = Vec::new();
        let mut spawns = Vec::new();
        let mut fx = queue(&mut sounds, &mut events, &mut spawns);
        let mut reg = Registry::new();

        let mut bbox = Sprite::new(SpriteKind::BonusBox {
            item: ItemKind::Mushroom,
            used: false,
        })
        .with_pos(Vec2::new(96.0, 64.0))
        .with_size(Vec2::new(32.0, 32.0));

        let ev = event(ArrayBucket::Player, Direction::Bottom, Validation::Blocking);
        handle_sprite_collision(&mut bbox, &ev, &mut reg, &mut fx);
        assert_eq!(spawns.len(), 1);
        assert!(spawns[0].spawned);
        assert_eq!(spawns[0].pos.y, 32.0);
        assert!(matches!(bbox.kind, SpriteKind::BonusBox { used: true, .. }));

        let mut fx = queue(&mut sounds, &mut events, &mut spawns);
        handle_sprite_collision(&mut bbox, &ev, &mut reg, &mut fx);
        assert_eq!(spawns.len(), 1);
    }

    #[test]
    fn coin_box_banks_points_without_spawning() {
        let mut sounds = Vec::new();
        let mut events = Vec::new();
        let mut spawns = Vec::new();
        let mut fx = queue(&mut sounds, &mut events, &mut spawns);
        let mut reg = Registry::new();

        let mut bbox = Sprite::new(SpriteKind::BonusBox {
            item: ItemKind::Goldpiece,
            used: false,
        });
        let ev = event(ArrayBucket::Player, Direction::Bottom, Validation::Blocking);
        handle_sprite_collision(&mut bbox, &ev, &mut reg, &mut fx);
        assert!(spawns.is_empty());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, GameEvent::KIND_POINTS);
    }

    #[test]
    fn side_hits_from_the_player_leave_the_box_closed() {
        let mut sounds = Vec::new();
        let mut events = Vec::new();
        let mut spawns = Vec::new();
        let mut fx = queue(&mut sounds, &mut events, &mut spawns);
        let mut reg = Registry::new();

        let mut bbox = Sprite::new(SpriteKind::BonusBox {
            item: ItemKind::Goldpiece,
            used: false,
        });
        let ev = event(ArrayBucket::Player, Direction::Left, Validation::Blocking);
        handle_sprite_collision(&mut bbox, &ev, &mut reg, &mut fx);
        assert!(matches!(bbox.kind, SpriteKind::BonusBox { used: false, .. }));
    }

    #[test]
    fn walker_turns_at_walls_but_not_at_the_player() {
        let mut sounds = Vec::new();
        let mut events = Vec::new();
        let mut spawns = Vec::new();
        let mut fx = queue(&mut sounds, &mut events, &mut spawns);
        let mut reg = Registry::new();

        let mut walker = Sprite::new(SpriteKind::Walker).with_direction(HorizDirection::Right);
        let wall = event(ArrayBucket::Massive, Direction::Right, Validation::Blocking);
        handle_sprite_collision(&mut walker, &wall, &mut reg, &mut fx);
        assert_eq!(walker.direction, HorizDirection::Left);

        let mut fx = queue(&mut sounds, &mut events, &mut spawns);
        let side = event(ArrayBucket::Player, Direction::Left, Validation::Internal);
        handle_sprite_collision(&mut walker, &side, &mut reg, &mut fx);
        assert_eq!(walker.direction, HorizDirection::Left);
        assert!(walker.is_live());
    }

    #[test]
    fn stomp_from_above_destroys_the_walker() {
        let mut sounds = Vec::new();
        let mut events = Vec::new();
        let mut spawns = Vec::new();
        let mut fx = queue(&mut sounds, &mut events, &mut spawns);
        let mut reg = Registry::new();

        let mut walker = Sprite::new(SpriteKind::Walker);
        let stomp = event(ArrayBucket::Player, Direction::Top, Validation::Internal);
        handle_sprite_collision(&mut walker, &stomp, &mut reg, &mut fx);
        assert!(walker.auto_destroy);
        assert_eq!(sounds.len(), 1);
    }

    #[test]
    fn touched_item_is_collected() {
        let mut sounds = Vec::new();
        let mut events = Vec::new();
        let mut spawns = Vec::new();
        let mut fx = queue(&mut sounds, &mut events, &mut spawns);
        let mut reg = Registry::new();

        let mut coin = Sprite::new(SpriteKind::Item {
            item: ItemKind::Goldpiece,
        });
        let touch = event(ArrayBucket::Player, Direction::Left, Validation::Internal);
        handle_sprite_collision(&mut coin, &touch, &mut reg, &mut fx);
        assert!(coin.auto_destroy);
        assert!(events.iter().any(|e| e.kind == GameEvent::KIND_POINTS));
        assert!(events
            .iter()
            .any(|e| e.kind == GameEvent::KIND_ITEM_COLLECTED));
    }

    #[test]
    fn platform_ping_pongs_between_endpoints() {
        let mut platform = Sprite::new(SpriteKind::MovingPlatform {
            origin: Vec2::ZERO,
            target: Vec2::new(10.0, 0.0),
            speed: 4.0,
            heading: 1.0,
        })
        .with_pos(Vec2::ZERO);

        assert_eq!(update_sprite(&mut platform, 1.0), Some(Vec2::new(4.0, 0.0)));
        assert_eq!(update_sprite(&mut platform, 1.0), Some(Vec2::new(4.0, 0.0)));
        // Third step arrives and reverses heading.
        assert_eq!(update_sprite(&mut platform, 1.0), Some(Vec2::new(2.0, 0.0)));
        assert_eq!(platform.pos, Vec2::new(10.0, 0.0));
        match platform.kind {
            SpriteKind::MovingPlatform { heading, .. } => assert_eq!(heading, -1.0),
            _ => unreachable!(),
        }
        assert_eq!(update_sprite(&mut platform, 1.0), Some(Vec2::new(-4.0, 0.0)));
    }

    #[test]
    fn platform_riders_are_carried() {
        let mut reg = Registry::new();
        let platform = reg
            .add(
                Sprite::new(SpriteKind::MovingPlatform {
                    origin: Vec2::new(0.0, 64.0),
                    target: Vec2::new(100.0, 64.0),
                    speed: 2.0,
                    heading: 1.0,
                })
                .with_pos(Vec2::new(0.0, 64.0))
                .with_size(Vec2::new(64.0, 16.0))
                .with_array(ArrayBucket::Massive)
                .with_massivity(Massivity::Massive)
                .with_can_be_ground(true),
            )
            .unwrap();
        let rider = reg
            .add(
                Sprite::new(SpriteKind::Crate)
                    .with_pos(Vec2::new(8.0, 32.0))
                    .with_size(Vec2::new(32.0, 32.0))
                    .with_array(ArrayBucket::Active),
            )
            .unwrap();
        reg.get_mut(rider).unwrap().ground_object = Some(platform);

        let range = ColRect::new(-1000.0, -1000.0, 2000.0, 2000.0);
        update_items(&mut reg, &range, 1.0);
        assert_eq!(reg.get(rider).unwrap().pos.x, 10.0);
        assert_eq!(reg.get(platform).unwrap().pos.x, 2.0);
    }

    #[test]
    fn grounded_sprites_skip_gravity() {
        let mut krate = Sprite::new(SpriteKind::Crate).with_gravity_max(22.0);
        krate.ground_object = Some(SpriteId(3));
        update_sprite(&mut krate, 1.0);
        assert_eq!(krate.vel.y, 0.0);

        krate.ground_object = None;
        update_sprite(&mut krate, 1.0);
        assert_eq!(krate.vel.y, GRAVITY_ACCEL);
    }

    #[test]
    fn settling_records_the_ground() {
        let mut reg = Registry::new();
        let floor = reg
            .add(
                Sprite::new(SpriteKind::Terrain)
                    .with_pos(Vec2::new(0.0, 64.0))
                    .with_size(Vec2::new(64.0, 16.0))
                    .with_array(ArrayBucket::Massive)
                    .with_massivity(Massivity::Massive)
                    .with_can_be_ground(true),
            )
            .unwrap();

        let mut krate = Sprite::new(SpriteKind::Crate);
        krate.vel = Vec2::new(2.0, 9.0);
        let outcome = MoveOutcome {
            contacts: vec![crate::collision::query::Hit {
                id: floor,
                array: ArrayBucket::Massive,
                direction: Direction::Top,
                validation: Validation::Blocking,
            }],
            blocked_x: false,
            blocked_y: true,
        };
        settle_after_move(&mut krate, true, &outcome, &reg);
        assert_eq!(krate.vel.y, 0.0);
        assert_eq!(krate.vel.x, 2.0);
        assert_eq!(krate.ground_object, Some(floor));
    }

    #[test]
    fn bounds_clamp_sides_and_reap_fallers() {
        let bounds = ColRect::new(0.0, 0.0, 640.0, 480.0);

        let mut walker = Sprite::new(SpriteKind::Walker)
            .with_pos(Vec2::new(-6.0, 100.0))
            .with_size(Vec2::new(32.0, 32.0))
            .with_direction(HorizDirection::Left);
        assert!(!enforce_level_bounds(&mut walker, &bounds));
        assert_eq!(walker.pos.x, 0.0);
        assert_eq!(walker.direction, HorizDirection::Right);

        let mut krate = Sprite::new(SpriteKind::Crate)
            .with_pos(Vec2::new(100.0, 481.0))
            .with_size(Vec2::new(32.0, 32.0));
        assert!(enforce_level_bounds(&mut krate, &bounds));
        assert!(krate.auto_destroy);
    }
}
