//! Match Registry - deduplicates league fixtures into canonical records
//!
//! Fixture rows arrive from several fetches (and from the persisted dataset)
//! under different ids, round labels and team-name spellings. This crate
//! canonicalizes team names, derives structural match keys and merges every
//! row describing the same real-world game into one most-complete record.

pub mod canonical;
pub mod dates;
pub mod keys;
pub mod registry;
pub mod types;

pub use canonical::{canonicalize, match_key, Canonicalizer, NameVocabulary};
pub use dates::{normalize_date, normalize_time};
pub use keys::{MatchKey, TeamKeyIndex};
pub use registry::{merge_matches, merge_matches_with, MatchRegistry};
pub use types::{MatchRecord, Quality};
