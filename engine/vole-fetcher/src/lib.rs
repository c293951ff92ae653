//! VOLE Fixtures Sync
//!
//! Pulls every round of a league from the VOLE public rounds endpoint,
//! normalizes the games and merges them into the dataset file the front end
//! reads. The dataset is rewritten only when its matches actually change.

pub mod config;
pub mod fetcher;
pub mod models;
pub mod parser;
pub mod score;
pub mod sync;

pub use config::FetcherConfig;
pub use fetcher::{RoundSource, VoleFetcher};
pub use models::*;
pub use parser::{parse_games, GameParser};
pub use score::{extract_score, ScoreRules, MAX_SET_SCORE};
pub use sync::LeagueSync;
