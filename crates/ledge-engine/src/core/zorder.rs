//! Layered z-ordering.
//!
//! Draw order is a float `pos_z`. Each massivity bucket owns a band of
//! the z range; within a bucket, requested positions that collide with an
//! already-assigned one are nudged up by an epsilon so equal requests
//! still draw in a deterministic insertion order. A parallel axis serves
//! editor views, which order sprites differently from the live game.

use crate::sprites::kind::Massivity;

/// Minimum spacing between two effective z positions in a bucket.
pub const Z_DELTA: f32 = 0.000_001;

/// Default band starts per massivity.
pub const Z_PASSIVE: f32 = 0.01;
pub const Z_HALFMASSIVE: f32 = 0.04;
pub const Z_CLIMBABLE: f32 = 0.05;
pub const Z_MASSIVE: f32 = 0.08;
/// The player draws above every level sprite.
pub const Z_PLAYER: f32 = 0.0999;

impl Massivity {
    /// Start of the draw band for sprites of this massivity.
    pub fn default_z(self) -> f32 {
        match self {
            Massivity::Passive => Z_PASSIVE,
            Massivity::Halfmassive => Z_HALFMASSIVE,
            Massivity::Climbable => Z_CLIMBABLE,
            Massivity::Massive => Z_MASSIVE,
        }
    }
}

/// Tracks the highest z handed out per massivity bucket, on both the
/// draw axis and the editor axis.
#[derive(Debug, Default)]
pub struct ZOrderIndex {
    last_z: [f32; Massivity::COUNT],
    last_editor_z: [f32; Massivity::COUNT],
}

impl ZOrderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a requested z into an effective one: requests at or below
    /// the bucket's last assignment land one epsilon above it.
    pub fn next_z(&mut self, bucket: Massivity, requested: f32) -> f32 {
        let last = &mut self.last_z[bucket.index()];
        let effective = if *last > 0.0 && requested <= *last {
            *last + Z_DELTA
        } else {
            requested
        };
        *last = effective;
        effective
    }

    /// Same nudge rule on the editor axis. Zero means "unset" and passes
    /// through untouched.
    pub fn next_editor_z(&mut self, bucket: Massivity, requested: f32) -> f32 {
        if requested <= 0.0 {
            return requested;
        }
        let last = &mut self.last_editor_z[bucket.index()];
        let effective = if *last > 0.0 && requested <= *last {
            *last + Z_DELTA
        } else {
            requested
        };
        *last = effective;
        effective
    }

    /// A z strictly above everything assigned in the bucket so far.
    pub fn front_z(&mut self, bucket: Massivity) -> f32 {
        let last = self.last_z[bucket.index()].max(bucket.default_z());
        self.next_z(bucket, last)
    }

    /// Highest z assigned in a bucket (0.0 if none yet).
    pub fn last_z(&self, bucket: Massivity) -> f32 {
        self.last_z[bucket.index()]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_requests_pass_through() {
        let mut zi = ZOrderIndex::new();
        assert_eq!(zi.next_z(Massivity::Massive, 0.08), 0.08);
        assert_eq!(zi.next_z(Massivity::Massive, 0.082), 0.082);
    }

    #[test]
    fn equal_requests_get_nudged_apart() {
        let mut zi = ZOrderIndex::new();
        let a = zi.next_z(Massivity::Massive, 0.08);
        let b = zi.next_z(Massivity::Massive, 0.08);
        let c = zi.next_z(Massivity::Massive, 0.08);
        assert!(a < b && b < c, "{} {} {}", a, b, c);
        // Nudges stay tiny.
        assert!(c - a < 3.0 * Z_DELTA + f32::EPSILON);
    }

    #[test]
    fn buckets_are_independent() {
        let mut zi = ZOrderIndex::new();
        zi.next_z(Massivity::Massive, 0.08);
        // A passive sprite at a lower z is not nudged by the massive one.
        assert_eq!(zi.next_z(Massivity::Passive, 0.01), 0.01);
    }

    #[test]
    fn lower_request_than_last_is_lifted() {
        let mut zi = ZOrderIndex::new();
        zi.next_z(Massivity::Passive, 0.02);
        let z = zi.next_z(Massivity::Passive, 0.012);
        assert!(z > 0.02);
    }

    #[test]
    fn front_z_tops_the_bucket() {
        let mut zi = ZOrderIndex::new();
        let a = zi.next_z(Massivity::Massive, 0.085);
        let f = zi.front_z(Massivity::Massive);
        assert!(f > a);
        // Empty bucket still lands inside its band.
        let f2 = zi.front_z(Massivity::Passive);
        assert!(f2 > Z_PASSIVE);
    }

    #[test]
    fn editor_axis_ignores_unset_values() {
        let mut zi = ZOrderIndex::new();
        assert_eq!(zi.next_editor_z(Massivity::Passive, 0.0), 0.0);
        let a = zi.next_editor_z(Massivity::Passive, 0.3);
        let b = zi.next_editor_z(Massivity::Passive, 0.3);
        assert!(b > a);
        // Draw axis unaffected by editor assignments.
        assert_eq!(zi.last_z(Massivity::Passive), 0.0);
    }

    #[test]
    fn reset_clears_both_axes() {
        let mut zi = ZOrderIndex::new();
        zi.next_z(Massivity::Massive, 0.5);
        zi.next_editor_z(Massivity::Massive, 0.5);
        zi.reset();
        assert_eq!(zi.next_z(Massivity::Massive, 0.08), 0.08);
        assert_eq!(zi.next_editor_z(Massivity::Massive, 0.08), 0.08);
    }
}
