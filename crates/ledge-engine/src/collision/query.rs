//! Spatial queries and stepped movement.
//!
//! Queries are linear scans over the registry, scoped by bucket before
//! any rect math. Movement is resolved in sub-pixel steps of at most one
//! pixel per axis so fast movers cannot tunnel through thin geometry.

use glam::Vec2;

use crate::api::types::SpriteId;
use crate::collision::protocol::{validate_collision, Validation};
use crate::collision::rect::{resolve_direction, ColCircle, ColRect, Direction};
use crate::core::registry::Registry;
use crate::sprites::kind::ArrayBucket;
use crate::sprites::sprite::Sprite;

/// Which contact classes a query reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Only contacts that would stop movement.
    BlockingOnly,
    /// Only touch contacts.
    InternalOnly,
    #[default]
    All,
}

/// Pre-filters applied before any rectangle test.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryFilter {
    /// Restrict to one coarse bucket.
    pub array: Option<ArrayBucket>,
    /// Skip a specific sprite (usually the one asking).
    pub exclude: Option<SpriteId>,
    pub mode: QueryMode,
}

impl QueryFilter {
    pub fn blocking() -> Self {
        Self {
            mode: QueryMode::BlockingOnly,
            ..Self::default()
        }
    }

    pub fn internal() -> Self {
        Self {
            mode: QueryMode::InternalOnly,
            ..Self::default()
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_array(mut self, array: ArrayBucket) -> Self {
        self.array = Some(array);
        self
    }

    pub fn excluding(mut self, id: SpriteId) -> Self {
        self.exclude = Some(id);
        self
    }
}

/// One query result. `direction` is the face of the hit sprite that the
/// probe struck (`Top` = the probe came down onto it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: SpriteId,
    pub array: ArrayBucket,
    pub direction: Direction,
    pub validation: Validation,
}

/// Result of a stepped move.
#[derive(Debug, Default)]
pub struct MoveOutcome {
    /// Every distinct sprite contacted, blocking and touch alike.
    pub contacts: Vec<Hit>,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

impl MoveOutcome {
    fn note(&mut self, hit: Hit) {
        if !self.contacts.iter().any(|c| c.id == hit.id) {
            self.contacts.push(hit);
        }
    }
}

fn mode_accepts(mode: QueryMode, validation: Validation) -> bool {
    match mode {
        QueryMode::BlockingOnly => validation == Validation::Blocking,
        QueryMode::InternalOnly => validation == Validation::Internal,
        QueryMode::All => validation != Validation::NotValid,
    }
}

fn targets<'a>(
    reg: &'a Registry,
    player: Option<&'a Sprite>,
    mover_uid: Option<SpriteId>,
    filter: &'a QueryFilter,
) -> impl Iterator<Item = &'a Sprite> + 'a {
    reg.iter().chain(player).filter(move |t| {
        t.is_live()
            && t.uid != mover_uid
            && filter.exclude.map_or(true, |ex| t.uid != Some(ex))
            && filter.array.map_or(true, |a| t.array == a)
    })
}

/// Everything a rectangle probe would contact, with directions resolved
/// against `delta` (the motion that produced the probe).
/// Degenerate probe rectangles simply return no hits.
pub fn query_rect(
    reg: &Registry,
    player: Option<&Sprite>,
    mover: &Sprite,
    probe: &ColRect,
    delta: Vec2,
    filter: &QueryFilter,
) -> Vec<Hit> {
    let mut hits = Vec::new();
    for target in targets(reg, player, mover.uid, filter) {
        let target_rect = target.col_rect();
        if !probe.intersects(&target_rect) {
            continue;
        }
        let validation = validate_collision(mover, target);
        if !mode_accepts(filter.mode, validation) {
            continue;
        }
        if let Some(id) = target.uid {
            hits.push(Hit {
                id,
                array: target.array,
                direction: resolve_direction(probe, &target_rect, delta),
                validation,
            });
        }
    }
    hits
}

/// "What would I hit if I were over there": the mover's collision rect
/// shifted by `offset` and grown by `grow` around its center.
pub fn query_relative(
    reg: &Registry,
    player: Option<&Sprite>,
    mover: &Sprite,
    offset: Vec2,
    grow: Vec2,
    filter: &QueryFilter,
) -> Vec<Hit> {
    let probe = mover.col_rect().translated(offset).grown(grow.x, grow.y);
    query_rect(reg, player, mover, &probe, offset, filter)
}

/// Area query for effects. Directions are not meaningful for circles and
/// come back `Undefined`.
pub fn query_circle(
    reg: &Registry,
    player: Option<&Sprite>,
    mover: &Sprite,
    circle: &ColCircle,
    filter: &QueryFilter,
) -> Vec<Hit> {
    let mut hits = Vec::new();
    for target in targets(reg, player, mover.uid, filter) {
        if !circle.intersects_rect(&target.col_rect()) {
            continue;
        }
        let validation = validate_collision(mover, target);
        if !mode_accepts(filter.mode, validation) {
            continue;
        }
        if let Some(id) = target.uid {
            hits.push(Hit {
                id,
                array: target.array,
                direction: Direction::Undefined,
                validation,
            });
        }
    }
    hits
}

/// The blocking sprite directly under the mover's feet, if any.
pub fn find_ground(
    reg: &Registry,
    player: Option<&Sprite>,
    mover: &Sprite,
) -> Option<SpriteId> {
    let filter = QueryFilter::blocking();
    query_relative(reg, player, mover, Vec2::new(0.0, 1.0), Vec2::ZERO, &filter)
        .into_iter()
        .find(|hit| {
            hit.direction == Direction::Top
                && reg
                    .get(hit.id)
                    .or(player.filter(|p| p.uid == Some(hit.id)))
                    .map_or(false, |t| t.can_be_ground)
        })
        .map(|hit| hit.id)
}

/// Move a sprite by `delta`, stopping flush against anything that blocks
/// it. X resolves before Y. Touch contacts along the way are recorded
/// without stopping.
pub fn collide_move(
    mover: &mut Sprite,
    reg: &Registry,
    player: Option<&Sprite>,
    delta: Vec2,
) -> MoveOutcome {
    let mut outcome = MoveOutcome::default();
    step_axis(mover, reg, player, Axis::X, delta.x, &mut outcome);
    step_axis(mover, reg, player, Axis::Y, delta.y, &mut outcome);
    outcome
}

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    X,
    Y,
}

fn step_axis(
    mover: &mut Sprite,
    reg: &Registry,
    player: Option<&Sprite>,
    axis: Axis,
    amount: f32,
    outcome: &mut MoveOutcome,
) {
    if amount == 0.0 {
        return;
    }
    let sign = amount.signum();
    let mut remaining = amount.abs();
    let filter = QueryFilter::all();

    while remaining > 0.0 {
        let step = remaining.min(1.0) * sign;
        let dvec = match axis {
            Axis::X => Vec2::new(step, 0.0),
            Axis::Y => Vec2::new(0.0, step),
        };
        let next = mover.col_rect().translated(dvec);

        let mut block_face: Option<f32> = None;
        for target in targets(reg, player, mover.uid, &filter) {
            let target_rect = target.col_rect();
            if !next.intersects(&target_rect) {
                continue;
            }
            match validate_collision(mover, target) {
                Validation::NotValid => {}
                Validation::Internal => {
                    if let Some(id) = target.uid {
                        outcome.note(Hit {
                            id,
                            array: target.array,
                            direction: resolve_direction(&next, &target_rect, dvec),
                            validation: Validation::Internal,
                        });
                    }
                }
                Validation::Blocking => {
                    if let Some(id) = target.uid {
                        outcome.note(Hit {
                            id,
                            array: target.array,
                            direction: resolve_direction(&next, &target_rect, dvec),
                            validation: Validation::Blocking,
                        });
                    }
                    // Track the nearest opposing face for the flush snap.
                    let face = match (axis, sign > 0.0) {
                        (Axis::X, true) => target_rect.left(),
                        (Axis::X, false) => target_rect.right(),
                        (Axis::Y, true) => target_rect.top(),
                        (Axis::Y, false) => target_rect.bottom(),
                    };
                    block_face = Some(match block_face {
                        Some(f) if sign > 0.0 => f.min(face),
                        Some(f) => f.max(face),
                        None => face,
                    });
                }
            }
        }

        if let Some(face) = block_face {
            match (axis, sign > 0.0) {
                (Axis::X, true) => {
                    mover.pos.x = face - mover.col_size.x - mover.col_offset.x;
                    outcome.blocked_x = true;
                }
                (Axis::X, false) => {
                    mover.pos.x = face - mover.col_offset.x;
                    outcome.blocked_x = true;
                }
                (Axis::Y, true) => {
                    mover.pos.y = face - mover.col_size.y - mover.col_offset.y;
                    outcome.blocked_y = true;
                }
                (Axis::Y, false) => {
                    mover.pos.y = face - mover.col_offset.y;
                    outcome.blocked_y = true;
                }
            }
            return;
        }

        mover.pos += dvec;
        remaining -= step.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites::kind::{Massivity, SpriteKind};

    fn terrain(pos: Vec2, size: Vec2, massivity: Massivity) -> Sprite {
        Sprite::new(SpriteKind::Terrain)
            .with_pos(pos)
            .with_size(size)
            .with_massivity(massivity)
            .with_array(ArrayBucket::Massive)
            .with_can_be_ground(true)
    }

    fn mover_at(pos: Vec2) -> Sprite {
        let mut s = Sprite::new(SpriteKind::Crate)
            .with_pos(pos)
            .with_size(Vec2::new(32.0, 32.0))
            .with_array(ArrayBucket::Active)
            .with_massivity(Massivity::Massive);
        s.uid = Some(SpriteId(999));
        s
    }

    #[test]
    fn relative_probe_reports_blocking_hit_below() {
        let mut reg = Registry::new();
        let floor = reg
            .add(terrain(
                Vec2::new(0.0, 30.0),
                Vec2::new(32.0, 8.0),
                Massivity::Massive,
            ))
            .unwrap();
        let mut e = mover_at(Vec2::ZERO);
        e.vel.y = 5.0;

        let hits = query_relative(
            &reg,
            None,
            &e,
            Vec2::new(0.0, 5.0),
            Vec2::ZERO,
            &QueryFilter::blocking(),
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, floor);
        assert_eq!(hits[0].direction, Direction::Top);
        assert_eq!(hits[0].validation, Validation::Blocking);
    }

    #[test]
    fn query_modes_partition_contacts() {
        let mut reg = Registry::new();
        reg.add(terrain(
            Vec2::new(0.0, 40.0),
            Vec2::new(32.0, 8.0),
            Massivity::Massive,
        ))
        .unwrap();
        let vine = reg
            .add(terrain(
                Vec2::new(0.0, 0.0),
                Vec2::new(32.0, 48.0),
                Massivity::Climbable,
            ))
            .unwrap();
        let e = mover_at(Vec2::new(0.0, 4.0));

        let blocking = query_relative(
            &reg,
            None,
            &e,
            Vec2::new(0.0, 5.0),
            Vec2::ZERO,
            &QueryFilter::blocking(),
        );
        assert!(blocking.iter().all(|h| h.validation == Validation::Blocking));
        assert!(blocking.iter().all(|h| h.id != vine));

        let internal = query_relative(
            &reg,
            None,
            &e,
            Vec2::new(0.0, 5.0),
            Vec2::ZERO,
            &QueryFilter::internal(),
        );
        assert_eq!(internal.len(), 1);
        assert_eq!(internal[0].id, vine);

        let all = query_relative(
            &reg,
            None,
            &e,
            Vec2::new(0.0, 5.0),
            Vec2::ZERO,
            &QueryFilter::all(),
        );
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn degenerate_probe_is_harmless() {
        let mut reg = Registry::new();
        reg.add(terrain(
            Vec2::ZERO,
            Vec2::new(32.0, 32.0),
            Massivity::Massive,
        ))
        .unwrap();
        let mut e = mover_at(Vec2::new(8.0, 8.0));
        e.col_size = Vec2::ZERO;

        let hits = query_relative(
            &reg,
            None,
            &e,
            Vec2::ZERO,
            Vec2::ZERO,
            &QueryFilter::all(),
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn move_lands_flush_on_the_floor() {
        let mut reg = Registry::new();
        let floor = reg
            .add(terrain(
                Vec2::new(0.0, 64.0),
                Vec2::new(128.0, 16.0),
                Massivity::Massive,
            ))
            .unwrap();
        let mut e = mover_at(Vec2::new(16.0, 10.0));

        let outcome = collide_move(&mut e, &reg, None, Vec2::new(0.0, 40.0));
        assert!(outcome.blocked_y);
        assert!(!outcome.blocked_x);
        // Flush: feet exactly on the floor's top edge.
        assert_eq!(e.pos.y, 32.0);
        let hit = outcome.contacts.iter().find(|c| c.id == floor).unwrap();
        assert_eq!(hit.direction, Direction::Top);
    }

    #[test]
    fn move_stops_at_a_wall() {
        let mut reg = Registry::new();
        reg.add(terrain(
            Vec2::new(96.0, 0.0),
            Vec2::new(16.0, 128.0),
            Massivity::Massive,
        ))
        .unwrap();
        let mut e = mover_at(Vec2::new(10.0, 32.0));

        let outcome = collide_move(&mut e, &reg, None, Vec2::new(80.0, 0.0));
        assert!(outcome.blocked_x);
        assert_eq!(e.pos.x, 64.0);
        assert_eq!(e.pos.y, 32.0);
    }

    #[test]
    fn fast_mover_cannot_tunnel_thin_geometry() {
        let mut reg = Registry::new();
        reg.add(terrain(
            Vec2::new(0.0, 100.0),
            Vec2::new(128.0, 2.0),
            Massivity::Massive,
        ))
        .unwrap();
        let mut e = mover_at(Vec2::new(16.0, 0.0));

        let outcome = collide_move(&mut e, &reg, None, Vec2::new(0.0, 500.0));
        assert!(outcome.blocked_y);
        assert_eq!(e.pos.y, 68.0);
    }

    #[test]
    fn touch_contacts_do_not_stop_movement() {
        let mut reg = Registry::new();
        let vine = reg
            .add(terrain(
                Vec2::new(0.0, 20.0),
                Vec2::new(32.0, 60.0),
                Massivity::Climbable,
            ))
            .unwrap();
        let mut e = mover_at(Vec2::new(0.0, 0.0));

        let outcome = collide_move(&mut e, &reg, None, Vec2::new(0.0, 30.0));
        assert!(!outcome.blocked_y);
        assert_eq!(e.pos.y, 30.0);
        assert!(outcome.contacts.iter().any(|c| c.id == vine));
    }

    #[test]
    fn halfmassive_catches_fall_but_not_rise() {
        let mut reg = Registry::new();
        reg.add(terrain(
            Vec2::new(0.0, 64.0),
            Vec2::new(64.0, 8.0),
            Massivity::Halfmassive,
        ))
        .unwrap();

        // Falling from above: lands flush.
        let mut e = mover_at(Vec2::new(8.0, 10.0));
        e.vel.y = 10.0;
        let outcome = collide_move(&mut e, &reg, None, Vec2::new(0.0, 40.0));
        assert!(outcome.blocked_y);
        assert_eq!(e.pos.y, 32.0);

        // Rising from below: passes straight through.
        let mut e = mover_at(Vec2::new(8.0, 100.0));
        e.vel.y = -10.0;
        let outcome = collide_move(&mut e, &reg, None, Vec2::new(0.0, -80.0));
        assert!(!outcome.blocked_y);
        assert_eq!(e.pos.y, 20.0);
    }

    #[test]
    fn find_ground_sees_only_standable_blocks() {
        let mut reg = Registry::new();
        let floor = reg
            .add(terrain(
                Vec2::new(0.0, 32.0),
                Vec2::new(64.0, 16.0),
                Massivity::Massive,
            ))
            .unwrap();
        let e = mover_at(Vec2::new(8.0, 0.0));
        assert_eq!(find_ground(&reg, None, &e), Some(floor));

        // One pixel of air gap is enough to not be grounded.
        let e = mover_at(Vec2::new(8.0, -2.0));
        assert_eq!(find_ground(&reg, None, &e), None);
    }
}
