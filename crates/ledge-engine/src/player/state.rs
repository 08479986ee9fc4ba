/// The player's movement state. Exactly one is active per frame and
/// every transition funnels through `Player::set_moving_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveState {
    #[default]
    Stay,
    Walk,
    Run,
    Jump,
    Fall,
    /// Cape flight after a full-speed takeoff.
    Fly,
    Climb,
    /// Attached to another sprite, which moves the player.
    Linked,
}

impl MoveState {
    pub fn is_on_ground(self) -> bool {
        matches!(self, MoveState::Stay | MoveState::Walk | MoveState::Run)
    }

    pub fn is_airborne(self) -> bool {
        matches!(self, MoveState::Jump | MoveState::Fall | MoveState::Fly)
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            MoveState::Stay => "stay",
            MoveState::Walk => "walk",
            MoveState::Run => "run",
            MoveState::Jump => "jump",
            MoveState::Fall => "fall",
            MoveState::Fly => "fly",
            MoveState::Climb => "climb",
            MoveState::Linked => "linked",
        }
    }
}

/// Powerup tier. Downgrades step one tier at a time; `Small` has no
/// tier left to lose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PowerState {
    #[default]
    Small,
    Big,
    Cape,
}

impl PowerState {
    pub fn downgraded(self) -> Option<PowerState> {
        match self {
            PowerState::Cape => Some(PowerState::Big),
            PowerState::Big => Some(PowerState::Small),
            PowerState::Small => None,
        }
    }

    pub fn index(self) -> u32 {
        match self {
            PowerState::Small => 0,
            PowerState::Big => 1,
            PowerState::Cape => 2,
        }
    }
}
