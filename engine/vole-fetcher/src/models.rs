use chrono::{DateTime, Utc};
use serde::Serialize;

/// Printed when a run pulled nothing from the upstream API
pub const EMPTY_FETCH_WARNING: &str =
    "WARNING: No matches pulled from VOLE API. Site might be blocking automated clients.";

/// What a sync run did to the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SyncOutcome {
    /// Merged matches equal the stored ones; nothing was written
    Unchanged,

    /// The dataset was rewritten
    Updated { matches: usize },
}

/// Summary of one sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub league_id: u32,

    /// Where the dataset lives
    pub location: String,

    /// Rounds requested from the source, including a round-0 retry
    pub rounds_probed: u32,

    /// Matches parsed from every fetched round, before deduplication
    pub fetched: usize,

    /// Stored matches dropped as legacy entries before merging
    pub legacy_dropped: usize,

    pub outcome: SyncOutcome,

    pub timestamp: DateTime<Utc>,
}

impl SyncReport {
    /// The status line printed on stdout
    pub fn status_line(&self) -> String {
        match self.outcome {
            SyncOutcome::Unchanged => format!(
                "No changes: {} (matches unchanged) league_id={}",
                self.location, self.league_id
            ),
            SyncOutcome::Updated { matches } => {
                format!("Updated {}: matches={} league_id={}", self.location, matches, self.league_id)
            }
        }
    }

    /// Warning to print after the status line, if any
    pub fn warning(&self) -> Option<&'static str> {
        (self.fetched == 0).then_some(EMPTY_FETCH_WARNING)
    }
}
