use core::fmt;

/// Data-model rule broken by a session, reported by
/// [`GameSession::validate_invariants`](crate::GameSession::validate_invariants).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    GlobalWaveNonZero,
    GlobalStateLivesConsistency,
    ShipState,
    ShipTimerRange,
    PlayerBulletState,
    UfoBulletState,
    AsteroidState,
    UfoState,
    ItemState,
    InventoryState,
    HighscoreOrder,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalWaveNonZero => write!(f, "GLOBAL_WAVE_NONZERO"),
            Self::GlobalStateLivesConsistency => write!(f, "GLOBAL_STATE_LIVES_CONSISTENCY"),
            Self::ShipState => write!(f, "SHIP_STATE"),
            Self::ShipTimerRange => write!(f, "SHIP_TIMER_RANGE"),
            Self::PlayerBulletState => write!(f, "PLAYER_BULLET_STATE"),
            Self::UfoBulletState => write!(f, "UFO_BULLET_STATE"),
            Self::AsteroidState => write!(f, "ASTEROID_STATE"),
            Self::UfoState => write!(f, "UFO_STATE"),
            Self::ItemState => write!(f, "ITEM_STATE"),
            Self::InventoryState => write!(f, "INVENTORY_STATE"),
            Self::HighscoreOrder => write!(f, "HIGHSCORE_ORDER"),
        }
    }
}

impl std::error::Error for RuleCode {}

/// Why a highscore row was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryError {
    NameLength { actual: usize, expected: usize },
    NameCharacter { found: char },
    BlankName,
    ZeroScore,
    ZeroWave,
    ShipTagTooLong { actual: usize, max: usize },
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameLength { actual, expected } => {
                write!(f, "name must be {expected} characters, got {actual}")
            }
            Self::NameCharacter { found } => {
                write!(f, "name contains invalid character {found:?}")
            }
            Self::BlankName => write!(f, "name is blank"),
            Self::ZeroScore => write!(f, "score must be positive"),
            Self::ZeroWave => write!(f, "wave must be positive"),
            Self::ShipTagTooLong { actual, max } => {
                write!(f, "ship tag too long: {actual} characters (max {max})")
            }
        }
    }
}

impl std::error::Error for EntryError {}
