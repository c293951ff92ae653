use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

use crate::canonical::Canonicalizer;
use crate::dates::{is_placeholder_time, normalize_date, normalize_time};
use crate::types::MatchRecord;

lazy_static! {
    static ref ROUND_DIGITS: Regex = Regex::new(r"\d+").expect("valid digits pattern");
}

/// Natural key identifying a real-world game.
///
/// A fixture registers every key it can produce; two fixtures are the same
/// game when any of their keys coincide. Team pairs are ordered so a
/// home/away swap still matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchKey {
    DateTime { date: String, time: String, teams: (String, String) },
    Date { date: String, teams: (String, String) },
    Round { round: u32, teams: (String, String) },
    DateRound { date: String, round: u32, teams: (String, String) },
}

/// Every team match-key seen in a merge, used to collapse sponsor-suffixed
/// spellings onto the bare club name
#[derive(Debug, Clone, Default)]
pub struct TeamKeyIndex {
    canonicalizer: Canonicalizer,
    known: BTreeSet<String>,
}

impl TeamKeyIndex {
    /// Build the index from the team names of every record taking part in a merge
    pub fn from_records<'a>(
        canonicalizer: Canonicalizer,
        records: impl IntoIterator<Item = &'a MatchRecord>,
    ) -> Self {
        let mut known = BTreeSet::new();
        for record in records {
            for name in [&record.home, &record.away] {
                let key = canonicalizer.match_key(name);
                if !key.is_empty() {
                    known.insert(key);
                }
            }
        }
        Self { canonicalizer, known }
    }

    /// Replace a team key with the longest other known key contained in it.
    ///
    /// Ties on length resolve to the lexicographically smallest candidate.
    pub fn collapse(&self, key: &str) -> String {
        if key.is_empty() {
            return String::new();
        }

        let mut best: Option<&String> = None;
        for candidate in &self.known {
            if candidate == key || !key.contains(candidate.as_str()) {
                continue;
            }
            if best.map_or(true, |b| candidate.chars().count() > b.chars().count()) {
                best = Some(candidate);
            }
        }

        best.cloned().unwrap_or_else(|| key.to_string())
    }

    /// Collapsed match key of a single team name
    pub fn team_key(&self, name: &str) -> String {
        self.collapse(&self.canonicalizer.match_key(name))
    }

    /// Collapsed, order-independent team pair of a fixture
    pub fn team_pair(&self, home: &str, away: &str) -> (String, String) {
        let h = self.team_key(home);
        let a = self.team_key(away);
        if h <= a {
            (h, a)
        } else {
            (a, h)
        }
    }

    /// All candidate keys for a fixture, most specific first
    pub fn keys_for(&self, record: &MatchRecord) -> Vec<MatchKey> {
        let date = normalize_date(&record.date);
        let time = normalize_time(&record.time);
        let round = round_number(&record.round);
        let teams = self.team_pair(&record.home, &record.away);

        let mut keys = Vec::with_capacity(4);
        if !date.is_empty() && !is_placeholder_time(&time) {
            keys.push(MatchKey::DateTime { date: date.clone(), time, teams: teams.clone() });
        }
        if !date.is_empty() {
            keys.push(MatchKey::Date { date: date.clone(), teams: teams.clone() });
        }
        if let Some(round) = round {
            keys.push(MatchKey::Round { round, teams: teams.clone() });
            if !date.is_empty() {
                keys.push(MatchKey::DateRound { date, round, teams });
            }
        }
        keys
    }
}

/// First positive number embedded in a round label
pub fn round_number(label: &str) -> Option<u32> {
    let digits = ROUND_DIGITS.find(label)?;
    match digits.as_str().parse::<u32>() {
        Ok(n) if n > 0 => Some(n),
        _ => None,
    }
}
