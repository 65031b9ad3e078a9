pub mod audio;
pub mod constants;
pub mod difficulty;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod highscore;
pub mod input;
pub mod powerups;
pub mod rng;
pub mod session;
pub mod ship_stats;
pub mod ufo;

pub use audio::{AudioSink, SoundEvent};
pub use error::{EntryError, RuleCode};
pub use geometry::PlayField;
pub use highscore::{HighscoreEntry, HighscoreList};
pub use input::{Action, InputFrame, KeyBindings, KeyEvent};
pub use rng::SeededRng;
pub use session::{
    FrameClock, GameSession, GameState, KillSource, LeaderboardRequest, WorldSnapshot,
};
pub use ship_stats::{ShipStats, ShipType, SHIP_TYPES};
