pub mod bet_selector;
pub mod config;
pub mod cue;
pub mod error;
pub mod reels;
pub mod rng;
pub mod scoreboard;
pub mod session;
pub mod symbols;
pub mod win;

pub use crate::bet_selector::BetSelector;
pub use crate::config::{GameConfig, SelectorConfig};
pub use crate::cue::{Cue, CueRequest};
pub use crate::error::{ConfigError, ConfigResult};
pub use crate::reels::{compute_reel_window, is_winning_window, verify_window, ReelSpinner, SeededCategoryPicker};
pub use crate::rng::{derive_floats, derive_hash_hex, ProvablyFairRng};
pub use crate::scoreboard::{Payout, Scoreboard, ScoreboardView};
pub use crate::session::{
    CategoryPicker, FixedCategory, Phase, Presenter, RoundReport, Session, SettledRound,
    Settlement, SpinOutcome, Spinner, StartOutcome,
};
pub use crate::symbols::{ReelsConfig, Symbol};
pub use crate::win::{CategoryWeights, WinCategory};
