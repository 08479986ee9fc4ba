//! Collision classification and the event protocol.
//!
//! `validate_collision` is the single source of truth for what a contact
//! between two sprites means: nothing, a touch notification, or a wall.
//! Movement uses it to decide whether to stop; the handler pass uses it
//! to decide who gets told what.

use log::debug;

use crate::api::types::SpriteId;
use crate::collision::rect::Direction;
use crate::sprites::kind::{ArrayBucket, Massivity, SpriteKind};
use crate::sprites::sprite::Sprite;

/// Tolerance when checking that a mover was above a half-solid's top
/// edge before the move.
pub const HALFMASSIVE_EPS: f32 = 0.4;

/// What a potential contact between two sprites means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Ignore entirely.
    NotValid,
    /// Report to both parties, never blocks movement.
    Internal,
    /// Stops movement and is reported to both parties.
    Blocking,
}

/// A resolved contact delivered to one sprite about another.
///
/// `direction` is the receiver's own face that made contact: a sprite
/// landing on a block gets `Bottom`, the block's counterpart event (if
/// any) carries `Top`. An `Undefined` direction reports overlap with no
/// resolvable face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub other: SpriteId,
    /// Dispatch selector: which handler arm the receiver runs.
    pub other_array: ArrayBucket,
    pub direction: Direction,
    pub validation: Validation,
}

impl CollisionEvent {
    /// The counterpart event the other party receives.
    pub fn mirrored(&self, own_id: SpriteId, own_array: ArrayBucket) -> CollisionEvent {
        CollisionEvent {
            other: own_id,
            other_array: own_array,
            direction: self.direction.opposite(),
            validation: self.validation,
        }
    }
}

/// Classify a contact of `mover` against `target`.
///
/// The rules, in order:
/// - dead, inactive or self targets never collide;
/// - lava, enemies-vs-player and items-vs-player touch (`Internal`);
/// - enemy-vs-enemy touches so walkers can turn around;
/// - enemy stoppers touch enemies and nothing else;
/// - massive targets block; half-solid targets block only a mover
///   descending onto their top edge; climbables touch; passives are
///   ignored.
/// Unknown pairings fail open to `NotValid`.
pub fn validate_collision(mover: &Sprite, target: &Sprite) -> Validation {
    if !target.is_live() || !mover.is_live() || mover.uid == target.uid {
        return Validation::NotValid;
    }

    match (mover.array, target.array) {
        // Lava burns whatever touches it; it never blocks.
        (_, ArrayBucket::Lava) => return Validation::Internal,
        (ArrayBucket::Lava, _) => return Validation::NotValid,

        // Player touching enemies (and the reverse) is damage/stomp
        // territory, not a wall.
        (ArrayBucket::Player, ArrayBucket::Enemy)
        | (ArrayBucket::Enemy, ArrayBucket::Player) => return Validation::Internal,

        // Walkers bump into each other and turn around.
        (ArrayBucket::Enemy, ArrayBucket::Enemy) => return Validation::Internal,

        // Stoppers exist for enemies only.
        (ArrayBucket::Enemy, ArrayBucket::Passive) => {
            if matches!(target.kind, SpriteKind::EnemyStopper) {
                return Validation::Internal;
            }
            return Validation::NotValid;
        }

        // Items are picked up by the player and ignored by everyone
        // else; nothing treats an item as a wall.
        (ArrayBucket::Player, ArrayBucket::Active) => {
            if matches!(target.kind, SpriteKind::Item { .. }) {
                return Validation::Internal;
            }
        }
        (ArrayBucket::Active, ArrayBucket::Player) => {
            if matches!(mover.kind, SpriteKind::Item { .. }) {
                return Validation::Internal;
            }
            // Crates and the like treat the player as solid.
        }
        (_, ArrayBucket::Active) => {
            if matches!(target.kind, SpriteKind::Item { .. }) {
                return Validation::NotValid;
            }
        }

        // A moving crate crushes enemies; other actives pass through.
        (ArrayBucket::Active, ArrayBucket::Enemy) => {
            if matches!(mover.kind, SpriteKind::Crate) {
                return Validation::Internal;
            }
            return Validation::NotValid;
        }
        _ => {}
    }

    match target.massivity {
        Massivity::Massive => Validation::Blocking,
        Massivity::Halfmassive => {
            // Only a mover falling onto the top edge is caught.
            let descending = mover.vel.y >= 0.0;
            let was_above =
                mover.col_rect().bottom() <= target.col_rect().top() + HALFMASSIVE_EPS;
            if descending && was_above {
                Validation::Blocking
            } else {
                Validation::NotValid
            }
        }
        Massivity::Climbable => Validation::Internal,
        Massivity::Passive => {
            if target.array == ArrayBucket::Passive || target.array == ArrayBucket::Massive {
                Validation::NotValid
            } else {
                // Passive massivity on an interactive bucket is a
                // pairing nothing defines; fail open.
                debug!(
                    "unhandled collision pairing {:?}/{:?} vs {:?}/{:?}",
                    mover.array, mover.kind, target.array, target.kind
                );
                Validation::NotValid
            }
        }
    }
}
