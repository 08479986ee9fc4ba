//! Sprite classification: how a sprite blocks, which coarse bucket it
//! lives in, and which behavior drives it.

/// How a sprite participates in blocking collisions.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Massivity {
    /// Decoration. Never blocks, never touches.
    Passive,
    /// Overlap raises climb contact, never blocks.
    Climbable,
    /// Blocks only movers falling onto the top edge.
    Halfmassive,
    /// Blocks from every side.
    Massive,
}

impl Massivity {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this massivity can ever produce a blocking collision.
    pub fn can_block(self) -> bool {
        matches!(self, Massivity::Massive | Massivity::Halfmassive)
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Massivity::Passive => "passive",
            Massivity::Climbable => "climbable",
            Massivity::Halfmassive => "halfmassive",
            Massivity::Massive => "massive",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "passive" => Some(Massivity::Passive),
            "climbable" => Some(Massivity::Climbable),
            "halfmassive" => Some(Massivity::Halfmassive),
            "massive" => Some(Massivity::Massive),
            _ => None,
        }
    }
}

/// Coarse grouping used by queries and collision handler dispatch.
/// Determines which `handle_collision_*` arm the other party runs.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayBucket {
    Player,
    /// Static level geometry.
    Massive,
    /// Decoration and markers.
    Passive,
    /// Interactive objects: crates, boxes, platforms, items.
    Active,
    Enemy,
    Lava,
}

/// Facing for sprites that walk or get pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizDirection {
    Left,
    Right,
}

impl HorizDirection {
    pub fn flip(self) -> Self {
        match self {
            HorizDirection::Left => HorizDirection::Right,
            HorizDirection::Right => HorizDirection::Left,
        }
    }

    /// -1.0 for left, +1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            HorizDirection::Left => -1.0,
            HorizDirection::Right => 1.0,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            HorizDirection::Left => "left",
            HorizDirection::Right => "right",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "left" => Some(HorizDirection::Left),
            "right" => Some(HorizDirection::Right),
            _ => None,
        }
    }
}

/// What an item grants when collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Goldpiece,
    Mushroom,
    Feather,
}

impl ItemKind {
    pub fn as_tag(self) -> &'static str {
        match self {
            ItemKind::Goldpiece => "goldpiece",
            ItemKind::Mushroom => "mushroom",
            ItemKind::Feather => "feather",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "goldpiece" => Some(ItemKind::Goldpiece),
            "mushroom" => Some(ItemKind::Mushroom),
            "feather" => Some(ItemKind::Feather),
            _ => None,
        }
    }
}

/// The closed set of behaviors a sprite can carry.
///
/// Kind payloads stay small and `Copy` so behavior code can pattern-match
/// them out of a sprite, work, and write them back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    /// Static scenery; massivity decides whether it blocks.
    Terrain,
    /// Patrols between `origin` and `target`, carrying whatever stands
    /// on it.
    MovingPlatform {
        origin: glam::Vec2,
        target: glam::Vec2,
        speed: f32,
        /// +1 toward target, -1 back toward origin.
        heading: f32,
    },
    /// Pushable wooden box.
    Crate,
    /// Pops an item when the player knocks it from below.
    BonusBox { item: ItemKind, used: bool },
    Lava,
    /// Collectable powerup or coin.
    Item { item: ItemKind },
    /// Ground patrol enemy; turns at walls and stoppers.
    Walker,
    /// Invisible marker that turns walkers around.
    EnemyStopper,
    /// The player avatar. Lives outside the registry and outside kind
    /// dispatch; see `player::Player`.
    Player,
    /// Stand-in for level data that failed to load, and for slots
    /// whose sprite is temporarily moved out.
    Placeholder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn massivity_tags_round_trip() {
        for m in [
            Massivity::Passive,
            Massivity::Climbable,
            Massivity::Halfmassive,
            Massivity::Massive,
        ] {
            assert_eq!(Massivity::from_tag(m.as_tag()), Some(m));
        }
        assert_eq!(Massivity::from_tag("bogus"), None);
    }

    #[test]
    fn only_massive_and_halfmassive_block() {
        assert!(Massivity::Massive.can_block());
        assert!(Massivity::Halfmassive.can_block());
        assert!(!Massivity::Climbable.can_block());
        assert!(!Massivity::Passive.can_block());
    }

    #[test]
    fn horiz_direction_flip_and_sign() {
        assert_eq!(HorizDirection::Left.flip(), HorizDirection::Right);
        assert_eq!(HorizDirection::Right.sign(), 1.0);
        assert_eq!(HorizDirection::Left.sign(), -1.0);
    }
}
