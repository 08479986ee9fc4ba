//! The player avatar: movement state machine, jumping, powerups.
//!
//! The player owns its sprite instead of registering it; uid 0 is
//! reserved for it and queries take the sprite by reference. All state
//! transitions funnel through `set_moving_state` so entry/exit
//! bookkeeping cannot be skipped.

use glam::Vec2;
use log::debug;

use crate::api::types::{GameEvent, SpriteId};
use crate::collision::protocol::{CollisionEvent, Validation};
use crate::collision::query::{find_ground, query_relative, QueryFilter};
use crate::collision::rect::{ColRect, Direction};
use crate::core::registry::Registry;
use crate::core::zorder::Z_PLAYER;
use crate::input::state::PlayerInput;
use crate::player::state::{MoveState, PowerState};
use crate::sprites::behavior::{EffectQueue, CRATE_CRUSH_MIN_FALL, GRAVITY_ACCEL, KILL_POINTS};
use crate::sprites::kind::{ArrayBucket, HorizDirection, ItemKind, Massivity, SpriteKind};
use crate::sprites::sprite::Sprite;

// Horizontal movement, in pixels per reference frame.
pub const WALK_ACCEL: f32 = 1.1;
pub const WALK_MAX: f32 = 10.0;
pub const RUN_MAX: f32 = 15.0;
pub const SLOW_DOWN: f32 = 1.7;

// Vertical movement.
pub const GRAVITY_MAX: f32 = 25.0;
pub const PARACHUTE_MAX: f32 = 10.0;
pub const JUMP_POWER_INITIAL: f32 = 17.0;
pub const JUMP_ACCEL_UP: f32 = 4.0;
pub const JUMP_VEL_DEACCEL: f32 = 0.05;
/// A ceiling bump this early in the jump does not end it.
pub const JUMP_POWER_GRACE: f32 = 6.0;
/// How long a jump press stays valid before the feet find ground.
pub const JUMP_BUFFER_FRAMES: f32 = 10.0;
pub const RUN_JUMP_SCALE: f32 = 0.4;
pub const RUN_JUMP_DAMPING: f32 = 0.9;
pub const CLIMB_SPEED: f32 = 4.0;
pub const STOMP_BOUNCE: f32 = 10.0;

// Timers, in reference frames.
pub const INVINCIBLE_FRAMES: f32 = 120.0;
pub const KILL_CHAIN_FRAMES: f32 = 60.0;

const FLY_FRAMES: f32 = 240.0;
const FLY_SPEED: f32 = 12.0;
const FLY_CLIMB: f32 = -6.0;
const FLY_SINK: f32 = 8.0;
const FLY_DRIFT: f32 = 2.0;
const FLY_EASE: f32 = 0.2;
const STAY_TOLERANCE: f32 = 0.1;

const SOUND_JUMP: &str = "jump_1.ogg";
const SOUND_CAPE: &str = "cape_1.ogg";
const SOUND_HURT: &str = "hurt_1.ogg";
const SOUND_DEATH: &str = "death_1.ogg";

pub struct Player {
    pub sprite: Sprite,
    state: MoveState,
    pub power: PowerState,
    pub dead: bool,
    /// Frames of upward boost left in the current jump.
    jump_power: f32,
    jump_accel: f32,
    /// Takeoff parameters for the next jump; springboard-style hosts
    /// can raise them through `force_jump`.
    next_jump_power: f32,
    next_jump_accel: f32,
    jump_buffer: f32,
    invincible: f32,
    kill_chain: f32,
    kill_count: u32,
    ducked: bool,
    parachute: bool,
    fly_timer: f32,
    linked_to: Option<SpriteId>,
    held_object: Option<SpriteId>,
}

impl Player {
    pub fn new(start: Vec2) -> Self {
        let mut sprite = Sprite::new(SpriteKind::Player)
            .with_name("player")
            .with_pos(start)
            .with_size(Vec2::new(32.0, 48.0))
            .with_col_rect(Vec2::new(4.0, 4.0), Vec2::new(24.0, 44.0))
            .with_array(ArrayBucket::Player)
            .with_massivity(Massivity::Massive)
            .with_pos_z(Z_PLAYER)
            .with_gravity_max(GRAVITY_MAX);
        sprite.uid = Some(SpriteId::PLAYER);
        Self {
            sprite,
            // Levels drop the player onto the ground at start.
            state: MoveState::Fall,
            power: PowerState::Small,
            dead: false,
            jump_power: 0.0,
            jump_accel: JUMP_ACCEL_UP,
            next_jump_power: JUMP_POWER_INITIAL,
            next_jump_accel: JUMP_ACCEL_UP,
            jump_buffer: 0.0,
            invincible: 0.0,
            kill_chain: 0.0,
            kill_count: 0,
            ducked: false,
            parachute: false,
            fly_timer: 0.0,
            linked_to: None,
            held_object: None,
        }
    }

    // -- Accessors --

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn is_ducked(&self) -> bool {
        self.ducked
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible > 0.0
    }

    pub fn kill_count(&self) -> u32 {
        self.kill_count
    }

    pub fn jump_power(&self) -> f32 {
        self.jump_power
    }

    pub fn linked_to(&self) -> Option<SpriteId> {
        self.linked_to
    }

    pub fn held_object(&self) -> Option<SpriteId> {
        self.held_object
    }

    // -- State machine --

    /// Switch movement state, running entry/exit bookkeeping. Returns
    /// false when the transition is refused (only `Linked` refuses, and
    /// only until `release_link`).
    pub fn set_moving_state(&mut self, new_state: MoveState) -> bool {
        if self.state == new_state {
            return true;
        }
        if self.state == MoveState::Linked && self.linked_to.is_some() {
            return false;
        }

        match self.state {
            MoveState::Fall => self.parachute = false,
            MoveState::Fly => {
                self.sprite.rotation = 0.0;
                self.fly_timer = 0.0;
            }
            _ => {}
        }
        match new_state {
            MoveState::Fall => self.jump_power = 0.0,
            // Both hands go to the cape.
            MoveState::Fly => self.held_object = None,
            MoveState::Climb => {
                self.sprite.vel = Vec2::ZERO;
                self.jump_power = 0.0;
            }
            MoveState::Linked => self.sprite.vel = Vec2::ZERO,
            _ => {}
        }
        if new_state.is_airborne() {
            self.sprite.ground_object = None;
        }

        debug!(
            "player state {} -> {}",
            self.state.as_tag(),
            new_state.as_tag()
        );
        self.state = new_state;
        true
    }

    /// Attach to a controlling sprite; movement input is ignored until
    /// `release_link`.
    pub fn link_to(&mut self, id: SpriteId) {
        self.set_moving_state(MoveState::Linked);
        self.linked_to = Some(id);
    }

    pub fn release_link(&mut self) {
        self.linked_to = None;
        self.set_moving_state(MoveState::Fall);
    }

    /// Pick up a sprite by identity. The reference stays valid only as
    /// long as the sprite does; a failed lookup releases it.
    pub fn hold_object(&mut self, id: SpriteId) {
        if self.state != MoveState::Fly {
            self.held_object = Some(id);
        }
    }

    pub fn release_hold(&mut self) -> Option<SpriteId> {
        self.held_object.take()
    }

    /// Pin the carried sprite to the facing edge, vertically centered on
    /// the collision rect. Call once per frame after the player moved.
    pub fn carry_held(&mut self, reg: &mut Registry) {
        let Some(id) = self.held_object else { return };
        let Some(carried) = reg.get_mut(id) else {
            debug!("held object {} is gone, hold released", id.0);
            self.held_object = None;
            return;
        };
        let rect = self.sprite.col_rect();
        let x = match self.sprite.direction {
            HorizDirection::Right => rect.right(),
            HorizDirection::Left => rect.left() - carried.col_size.x,
        };
        let y = rect.top() + (rect.h - carried.col_size.y) * 0.5;
        carried.pos = Vec2::new(x, y) - carried.col_offset;
        carried.vel = Vec2::ZERO;
    }

    // -- Frame update --

    pub fn update(
        &mut self,
        input: &PlayerInput,
        reg: &Registry,
        speed_factor: f32,
        fx: &mut EffectQueue,
    ) {
        if self.dead {
            return;
        }
        // Drop a dangling hold before anything else reads it.
        if let Some(id) = self.held_object {
            if reg.get(id).is_none() {
                self.held_object = None;
            }
        }
        self.tick_timers(speed_factor);
        if self.state == MoveState::Linked {
            self.ride_link(reg, speed_factor);
            return;
        }
        self.ride_platform(reg, speed_factor);
        self.ducked = input.down && self.state.is_on_ground();
        self.update_jump_buffer(input, speed_factor);
        self.update_climb_grab(input, reg);

        match self.state {
            MoveState::Stay | MoveState::Walk | MoveState::Run => {
                self.update_ground(input, speed_factor, fx)
            }
            MoveState::Jump => {
                self.air_control(input, speed_factor);
                self.update_jump(input, speed_factor);
            }
            MoveState::Fall => self.update_fall(input, speed_factor),
            MoveState::Fly => self.update_fly(input, speed_factor),
            MoveState::Climb => self.update_climb(input, reg, fx),
            MoveState::Linked => {}
        }
    }

    fn tick_timers(&mut self, speed_factor: f32) {
        self.invincible = (self.invincible - speed_factor).max(0.0);
        self.sprite.alpha = if self.invincible > 0.0 { 0.6 } else { 1.0 };
        self.kill_chain = (self.kill_chain - speed_factor).max(0.0);
        if self.kill_chain == 0.0 {
            self.kill_count = 0;
        }
    }

    fn ride_link(&mut self, reg: &Registry, speed_factor: f32) {
        match self.linked_to.and_then(|id| reg.get(id)) {
            Some(host) => self.sprite.pos += host.vel * speed_factor,
            // Host vanished; nothing is holding us anymore.
            None => self.release_link(),
        }
    }

    fn ride_platform(&mut self, reg: &Registry, speed_factor: f32) {
        if let Some(ground) = self.sprite.ground_object.and_then(|id| reg.get(id)) {
            if matches!(ground.kind, SpriteKind::MovingPlatform { .. }) {
                self.sprite.pos += ground.vel * speed_factor;
            }
        }
    }

    fn update_jump_buffer(&mut self, input: &PlayerInput, speed_factor: f32) {
        if input.jump_pressed {
            self.jump_buffer = JUMP_BUFFER_FRAMES;
        } else {
            self.jump_buffer = (self.jump_buffer - speed_factor).max(0.0);
        }
    }

    fn update_climb_grab(&mut self, input: &PlayerInput, reg: &Registry) {
        if (input.up || input.down)
            && self.state != MoveState::Climb
            && self.touching_climbable(reg)
        {
            self.set_moving_state(MoveState::Climb);
        }
    }

    fn touching_climbable(&self, reg: &Registry) -> bool {
        query_relative(
            reg,
            None,
            &self.sprite,
            Vec2::ZERO,
            Vec2::ZERO,
            &QueryFilter::internal(),
        )
        .iter()
        .any(|hit| {
            reg.get(hit.id)
                .map_or(false, |s| s.massivity == Massivity::Climbable)
        })
    }

    fn update_ground(&mut self, input: &PlayerInput, speed_factor: f32, fx: &mut EffectQueue) {
        let drive = match (input.left, input.right) {
            (true, false) => Some(HorizDirection::Left),
            (false, true) => Some(HorizDirection::Right),
            _ => None,
        };
        let max = if input.run { RUN_MAX } else { WALK_MAX };
        match drive {
            Some(dir) if !self.ducked => {
                self.sprite.direction = dir;
                self.sprite.vel.x += dir.sign() * WALK_ACCEL * speed_factor;
                let v = self.sprite.vel.x;
                if v.abs() > max {
                    // Over the cap (run released): bleed off, don't snap.
                    self.sprite.vel.x = v.signum() * (v.abs() - SLOW_DOWN * speed_factor).max(max);
                }
            }
            _ => self.slow_down(speed_factor),
        }

        let speed = self.sprite.vel.x.abs();
        let next = if speed < STAY_TOLERANCE {
            MoveState::Stay
        } else if input.run && speed > WALK_MAX {
            MoveState::Run
        } else {
            MoveState::Walk
        };
        self.set_moving_state(next);

        if self.jump_buffer > 0.0 {
            self.start_jump(fx);
        }
    }

    fn slow_down(&mut self, speed_factor: f32) {
        let v = self.sprite.vel.x;
        let dec = SLOW_DOWN * speed_factor;
        self.sprite.vel.x = if v.abs() <= dec { 0.0 } else { v - dec * v.signum() };
    }

    fn air_control(&mut self, input: &PlayerInput, speed_factor: f32) {
        let max = if input.run { RUN_MAX } else { WALK_MAX };
        if input.right && !input.left {
            self.sprite.direction = HorizDirection::Right;
            let v = self.sprite.vel.x;
            if v < max {
                self.sprite.vel.x = (v + WALK_ACCEL * speed_factor).min(max);
            }
        } else if input.left && !input.right {
            self.sprite.direction = HorizDirection::Left;
            let v = self.sprite.vel.x;
            if v > -max {
                self.sprite.vel.x = (v - WALK_ACCEL * speed_factor).max(-max);
            }
        }
    }

    /// Begin a jump with whatever takeoff parameters are pending.
    /// A full-speed takeoff with the cape lifts into flight instead.
    fn start_jump(&mut self, fx: &mut EffectQueue) {
        self.jump_buffer = 0.0;
        let power = self.next_jump_power;
        self.jump_accel = self.next_jump_accel;
        self.next_jump_power = JUMP_POWER_INITIAL;
        self.next_jump_accel = JUMP_ACCEL_UP;

        if self.power == PowerState::Cape && self.sprite.vel.x.abs() >= RUN_MAX - 0.5 {
            if self.set_moving_state(MoveState::Fly) {
                self.fly_timer = FLY_FRAMES;
                self.sprite.vel.y = -(power * 0.6);
                fx.play_sound(SOUND_CAPE);
                return;
            }
        }
        if !self.set_moving_state(MoveState::Jump) {
            return;
        }
        self.jump_power = power;
        // Momentum feeds the takeoff and is damped in exchange.
        self.sprite.vel.y = -(power + self.sprite.vel.x.abs() * RUN_JUMP_SCALE);
        self.sprite.vel.x *= RUN_JUMP_DAMPING;
        fx.play_sound(SOUND_JUMP);
    }

    /// Queue a takeoff as if the jump key were pressed, with custom
    /// power. Springboards and similar launchers use this.
    pub fn force_jump(&mut self, power: f32, accel: f32) {
        self.next_jump_power = power;
        self.next_jump_accel = accel;
        self.jump_buffer = JUMP_BUFFER_FRAMES;
    }

    fn update_jump(&mut self, input: &PlayerInput, speed_factor: f32) {
        if !input.jump {
            self.set_moving_state(MoveState::Fall);
            return;
        }
        let v = self.sprite.vel.y;
        self.sprite.vel.y -= (self.jump_accel + v * JUMP_VEL_DEACCEL) * speed_factor;
        self.jump_power -= speed_factor;
        if self.jump_power <= 0.0 {
            self.set_moving_state(MoveState::Fall);
        }
    }

    fn update_fall(&mut self, input: &PlayerInput, speed_factor: f32) {
        self.air_control(input, speed_factor);
        self.parachute =
            self.power == PowerState::Cape && input.jump && self.sprite.vel.y > 0.0;
        let max = if self.parachute { PARACHUTE_MAX } else { GRAVITY_MAX };
        self.sprite.vel.y = (self.sprite.vel.y + GRAVITY_ACCEL * speed_factor).min(max);
    }

    fn update_fly(&mut self, input: &PlayerInput, speed_factor: f32) {
        self.fly_timer -= speed_factor;
        if self.fly_timer <= 0.0 || !input.jump {
            self.set_moving_state(MoveState::Fall);
            return;
        }
        if input.left {
            self.sprite.direction = HorizDirection::Left;
        } else if input.right {
            self.sprite.direction = HorizDirection::Right;
        }
        let pitch = if input.down {
            FLY_SINK
        } else if input.up {
            FLY_CLIMB
        } else {
            FLY_DRIFT
        };
        self.sprite.vel.y += (pitch - self.sprite.vel.y) * FLY_EASE * speed_factor;
        self.sprite.vel.x = self.sprite.direction.sign() * FLY_SPEED;
        self.sprite.rotation = (self.sprite.vel.y / FLY_SINK) * 0.3;
    }

    fn update_climb(&mut self, input: &PlayerInput, reg: &Registry, fx: &mut EffectQueue) {
        if self.jump_buffer > 0.0 {
            self.start_jump(fx);
            return;
        }
        let mut v = Vec2::ZERO;
        if input.up {
            v.y -= CLIMB_SPEED;
        }
        if input.down {
            v.y += CLIMB_SPEED;
        }
        if input.left {
            v.x -= CLIMB_SPEED * 0.5;
            self.sprite.direction = HorizDirection::Left;
        }
        if input.right {
            v.x += CLIMB_SPEED * 0.5;
            self.sprite.direction = HorizDirection::Right;
        }
        self.sprite.vel = v;
        if !self.touching_climbable(reg) {
            self.set_moving_state(MoveState::Fall);
        }
    }

    /// Re-check footing after the frame's movement. Walking off an edge
    /// (or the ground being deleted) drops into `Fall`.
    pub fn post_move(&mut self, reg: &Registry) {
        if self.dead || !self.state.is_on_ground() {
            return;
        }
        match find_ground(reg, None, &self.sprite) {
            Some(id) => self.sprite.ground_object = Some(id),
            None => {
                self.sprite.ground_object = None;
                self.set_moving_state(MoveState::Fall);
            }
        }
    }

    // -- Contact responses --

    /// React to one collision event. `other` is the sprite the event is
    /// about, borrowed by the dispatcher.
    pub fn handle_collision(
        &mut self,
        event: &CollisionEvent,
        other: &Sprite,
        fx: &mut EffectQueue,
    ) {
        if self.dead {
            return;
        }
        match event.other_array {
            ArrayBucket::Lava => self.kill(fx),
            ArrayBucket::Enemy => self.enemy_contact(event, other, fx),
            ArrayBucket::Active => {
                if let SpriteKind::Item { item } = other.kind {
                    self.collect_item(item, fx);
                } else if event.validation == Validation::Blocking {
                    if event.direction == Direction::Top
                        && matches!(other.kind, SpriteKind::Crate)
                        && other.vel.y > CRATE_CRUSH_MIN_FALL
                    {
                        self.downgrade(fx);
                    }
                    self.solid_contact(event, other);
                }
            }
            _ => {
                if event.validation == Validation::Blocking {
                    self.solid_contact(event, other);
                }
            }
        }
    }

    fn solid_contact(&mut self, event: &CollisionEvent, other: &Sprite) {
        match event.direction {
            Direction::Bottom => {
                self.sprite.vel.y = 0.0;
                if other.can_be_ground {
                    self.sprite.ground_object = Some(event.other);
                }
                if self.state.is_airborne() {
                    let landing = if self.sprite.vel.x.abs() < STAY_TOLERANCE {
                        MoveState::Stay
                    } else {
                        MoveState::Walk
                    };
                    self.set_moving_state(landing);
                }
            }
            Direction::Top => {
                self.sprite.vel.y = self.sprite.vel.y.max(0.0);
                match self.state {
                    // Early in the jump a head bump is forgiven, so
                    // low ceilings don't swallow the whole takeoff.
                    MoveState::Jump if self.jump_power < JUMP_POWER_GRACE => {
                        self.set_moving_state(MoveState::Fall);
                    }
                    MoveState::Fly => {
                        self.set_moving_state(MoveState::Fall);
                    }
                    _ => {}
                }
            }
            Direction::Left | Direction::Right => {
                self.sprite.vel.x = 0.0;
                if self.state == MoveState::Fly {
                    self.set_moving_state(MoveState::Fall);
                }
            }
            Direction::Undefined => {}
        }
    }

    fn enemy_contact(&mut self, event: &CollisionEvent, other: &Sprite, fx: &mut EffectQueue) {
        if event.direction == Direction::Bottom {
            // Stomp. Consecutive kills chain into multiplied points.
            self.kill_count += 1;
            self.kill_chain = KILL_CHAIN_FRAMES;
            fx.emit(GameEvent::new(
                GameEvent::KIND_POINTS,
                KILL_POINTS * self.kill_count as f32,
                other.pos.x,
                other.pos.y,
            ));
            self.stomp_bounce();
        } else {
            self.downgrade(fx);
        }
    }

    /// Rebound after squashing something.
    pub fn stomp_bounce(&mut self) {
        self.set_moving_state(MoveState::Fall);
        self.sprite.vel.y = -STOMP_BOUNCE;
    }

    fn collect_item(&mut self, item: ItemKind, fx: &mut EffectQueue) {
        match item {
            ItemKind::Goldpiece => {}
            ItemKind::Mushroom => self.upgrade(PowerState::Big, fx),
            ItemKind::Feather => self.upgrade(PowerState::Cape, fx),
        }
    }

    fn upgrade(&mut self, to: PowerState, fx: &mut EffectQueue) {
        if self.power < to {
            self.power = to;
            fx.emit(GameEvent::new(
                GameEvent::KIND_PLAYER_UPGRADE,
                to.index() as f32,
                0.0,
                0.0,
            ));
        }
    }

    /// Lose one powerup tier, or die at the bottom tier. Mercy
    /// invincibility absorbs the hit entirely while active.
    pub fn downgrade(&mut self, fx: &mut EffectQueue) {
        if self.invincible > 0.0 {
            return;
        }
        match self.power.downgraded() {
            Some(lower) => {
                self.power = lower;
                self.invincible = INVINCIBLE_FRAMES;
                fx.play_sound(SOUND_HURT);
                fx.emit(GameEvent::new(
                    GameEvent::KIND_PLAYER_HURT,
                    lower.index() as f32,
                    0.0,
                    0.0,
                ));
            }
            None => self.kill(fx),
        }
    }

    /// Unconditional death; invincibility does not apply.
    pub fn kill(&mut self, fx: &mut EffectQueue) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.sprite.vel = Vec2::ZERO;
        fx.play_sound(SOUND_DEATH);
        fx.emit(GameEvent::new(
            GameEvent::KIND_PLAYER_DEAD,
            0.0,
            self.sprite.pos.x,
            self.sprite.pos.y,
        ));
    }

    /// Side edges clamp; falling past the bottom is fatal.
    pub fn enforce_level_bounds(&mut self, bounds: &ColRect, fx: &mut EffectQueue) {
        if self.dead {
            return;
        }
        let rect = self.sprite.col_rect();
        if rect.top() > bounds.bottom() {
            self.kill(fx);
            return;
        }
        if rect.left() < bounds.left() {
            self.sprite.pos.x += bounds.left() - rect.left();
            self.sprite.vel.x = 0.0;
        } else if rect.right() > bounds.right() {
            self.sprite.pos.x -= rect.right() - bounds.right();
            self.sprite.vel.x = 0.0;
        }
    }
}
