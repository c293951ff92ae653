use crate::canonical::Canonicalizer;
use crate::dates::{normalize_date, normalize_time, sort_instant};
use crate::keys::{MatchKey, TeamKeyIndex};
use crate::types::MatchRecord;
use std::collections::HashMap;
use tracing::debug;

/// Match Registry - Deduplicates fixtures across fetches
///
/// Every canonical record is stored once, and every natural key it has
/// produced points at its id. A key keeps its first owner for the lifetime of
/// the registry, so the result does not depend on which duplicate arrives
/// last.
#[derive(Debug)]
pub struct MatchRegistry {
    /// Canonical records in first-seen order
    records: Vec<MatchRecord>,

    /// Map from canonical id to position in `records`
    index_by_id: HashMap<String, usize>,

    /// Map from natural key to the canonical id that registered it first
    key_owner: HashMap<MatchKey, String>,

    /// Team keys known to this merge
    team_keys: TeamKeyIndex,
}

impl MatchRegistry {
    /// Create an empty registry keyed with the given team index
    pub fn new(team_keys: TeamKeyIndex) -> Self {
        Self { records: Vec::new(), index_by_id: HashMap::new(), key_owner: HashMap::new(), team_keys }
    }

    /// Insert a record, or fold it into the canonical record it duplicates.
    ///
    /// Returns the canonical id the record ended up under.
    pub fn upsert(&mut self, candidate: MatchRecord) -> String {
        let keys = self.team_keys.keys_for(&candidate);
        let hit = keys.iter().find_map(|key| self.key_owner.get(key)).cloned();

        let id = match hit {
            Some(id) => {
                let position = self.index_by_id[&id];
                let merged = self.merge_into(&self.records[position], &candidate);
                debug!("Merged {} into {} ({} vs {})", candidate.id, id, candidate.home, candidate.away);
                self.records[position] = merged;
                id
            }
            None => self.insert_new(candidate),
        };

        for key in keys {
            self.key_owner.entry(key).or_insert_with(|| id.clone());
        }
        id
    }

    fn insert_new(&mut self, mut candidate: MatchRecord) -> String {
        if candidate.id.is_empty() {
            candidate.id = self.next_synthetic_id();
        }
        candidate.enforce_score_pair();
        let id = candidate.id.clone();

        match self.index_by_id.get(&id) {
            // Same source id under new keys: the game was rescheduled
            Some(&position) => {
                let previous = &self.records[position];
                if !candidate.has_score() {
                    candidate.set_score(previous.score());
                }
                if !candidate.has_venue() {
                    candidate.venue = previous.venue.clone();
                }
                debug!("Rescheduled {} to {} {}", id, candidate.date, candidate.time);
                self.records[position] = candidate;
            }
            None => {
                self.index_by_id.insert(id.clone(), self.records.len());
                self.records.push(candidate);
            }
        }
        id
    }

    fn next_synthetic_id(&self) -> String {
        let mut n = self.records.len() + 1;
        loop {
            let id = format!("M{n}");
            if !self.index_by_id.contains_key(&id) {
                return id;
            }
            n += 1;
        }
    }

    /// Look up a canonical record by id
    pub fn get(&self, id: &str) -> Option<&MatchRecord> {
        self.index_by_id.get(id).map(|&position| &self.records[position])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Combine a duplicate into its canonical record, keeping the most complete data
    fn merge_into(&self, base: &MatchRecord, candidate: &MatchRecord) -> MatchRecord {
        let mut out = base.clone();
        let base_quality = base.quality();

        if candidate.has_score() {
            // The score is oriented by the candidate's home/away order
            if self.is_reversed(&out, candidate) {
                std::mem::swap(&mut out.home, &mut out.away);
            }
            out.set_score(candidate.score());
        }
        out.enforce_score_pair();

        if candidate.has_venue() && !out.has_venue() {
            out.venue = candidate.venue.clone();
        }

        if !candidate.date.trim().is_empty() && out.date.trim().is_empty() {
            out.date = candidate.date.clone();
        }

        if candidate.has_known_time() && !out.has_known_time() {
            out.time = candidate.time.trim().to_string();
        }

        if out.has_blank_round() && !candidate.has_blank_round() {
            out.round = candidate.round.clone();
        }

        // A richer row replaces the display names of a sparser one. Ranked
        // against the base as stored, before any field above was copied in.
        if candidate.quality() > base_quality {
            out.home = candidate.home.clone();
            out.away = candidate.away.clone();
            if !candidate.has_blank_round() {
                out.round = candidate.round.clone();
            }
            if !candidate.date.trim().is_empty() {
                out.date = candidate.date.clone();
            }
            if candidate.has_known_time() {
                out.time = candidate.time.trim().to_string();
            }
        }

        for (key, value) in &candidate.extra {
            out.extra.entry(key.clone()).or_insert_with(|| value.clone());
        }

        out
    }

    /// True when both rows name the same two teams in opposite home/away order
    fn is_reversed(&self, base: &MatchRecord, candidate: &MatchRecord) -> bool {
        let base_home = self.team_keys.team_key(&base.home);
        let base_away = self.team_keys.team_key(&base.away);
        let home = self.team_keys.team_key(&candidate.home);
        let away = self.team_keys.team_key(&candidate.away);
        home != away && home == base_away && away == base_home
    }

    /// Canonical records ordered by kick-off, unparseable instants first
    pub fn into_sorted(self) -> Vec<MatchRecord> {
        let mut records = self.records;
        records.sort_by_key(|record| sort_instant(&record.date, &record.time));
        records
    }
}

/// Merge freshly parsed fixtures into a stored dataset.
///
/// Stored records are upserted first so nothing already persisted is lost
/// when a later fetch omits a field. Incoming records inherit score and venue
/// from a stored record with the same id before they are upserted.
pub fn merge_matches(existing: &[MatchRecord], incoming: &[MatchRecord]) -> Vec<MatchRecord> {
    merge_matches_with(Canonicalizer::default(), existing, incoming)
}

/// [`merge_matches`] with a custom name vocabulary
pub fn merge_matches_with(
    canonicalizer: Canonicalizer,
    existing: &[MatchRecord],
    incoming: &[MatchRecord],
) -> Vec<MatchRecord> {
    let team_keys = TeamKeyIndex::from_records(canonicalizer, existing.iter().chain(incoming));
    let mut registry = MatchRegistry::new(team_keys);

    for record in existing {
        let mut record = record.clone();
        let date = normalize_date(&record.date);
        if !date.is_empty() {
            record.date = date;
        }
        let time = normalize_time(&record.time);
        if !time.is_empty() {
            record.time = time;
        }
        registry.upsert(record);
    }

    for record in incoming {
        let mut record = record.clone();
        record.date = normalize_date(&record.date);
        record.time = normalize_time(&record.time);
        if let Some(previous) = registry.get(&record.id) {
            if record.hs.is_none() {
                record.hs = previous.hs;
            }
            if record.away_score.is_none() {
                record.away_score = previous.away_score;
            }
            if !record.has_venue() {
                record.venue = previous.venue.clone();
            }
        }
        record.enforce_score_pair();
        registry.upsert(record);
    }

    debug!(
        "Merged {} stored and {} incoming fixtures into {}",
        existing.len(),
        incoming.len(),
        registry.len()
    );
    registry.into_sorted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> MatchRecord {
        MatchRecord::from_value(&value).unwrap()
    }

    #[test]
    fn test_richer_candidate_wins() {
        let base = record(json!({
            "id": "100", "date": "2026-01-16", "time": "00:00",
            "home": "הפועל גליל עליון", "away": "מכבי עכו", "hs": null, "as": null
        }));
        let candidate = record(json!({
            "id": "200", "date": "2026-01-16", "time": "10:30",
            "home": "גליל עליון", "away": "עכו", "venue": "אולם עירוני", "hs": 2, "as": 1
        }));

        let merged = merge_matches(&[base], &[candidate]);

        assert_eq!(merged.len(), 1);
        let game = &merged[0];
        assert_eq!(game.id, "100");
        assert_eq!(game.time, "10:30");
        assert_eq!(game.score(), Some((2, 1)));
        assert_eq!(game.venue, "אולם עירוני");
        assert_eq!(game.home, "גליל עליון");
        assert_eq!(game.away, "עכו");
    }

    #[test]
    fn test_duplicate_in_batch_collapses() {
        let unscored = record(json!({
            "id": "a", "date": "2026-02-01", "time": "20:00", "home": "עכו", "away": "גליל עליון"
        }));
        let scored = record(json!({
            "id": "b", "date": "2026-02-01", "time": "20:00", "home": "גליל עליון", "away": "עכו",
            "hs": 3, "as": 0
        }));

        let merged = merge_matches(&[], &[unscored, scored]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "a");
        assert_eq!(merged[0].score(), Some((3, 0)));
        // Names follow the orientation of the row that supplied the score
        assert_eq!(merged[0].home, "גליל עליון");
        assert_eq!(merged[0].away, "עכו");
    }

    #[test]
    fn test_existing_score_never_regresses() {
        let stored = record(json!({
            "id": "a", "date": "2026-02-01", "time": "20:00", "home": "עכו", "away": "גליל עליון",
            "venue": "אולם", "hs": 3, "as": 2
        }));
        let refetched = record(json!({
            "id": "a", "date": "2026-02-01", "time": "20:00", "home": "עכו", "away": "גליל עליון"
        }));

        let merged = merge_matches(&[stored], &[refetched]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].score(), Some((3, 2)));
        assert_eq!(merged[0].venue, "אולם");
    }

    #[test]
    fn test_first_registrant_keeps_key() {
        let team_keys = TeamKeyIndex::default();
        let mut registry = MatchRegistry::new(team_keys);

        let first = registry.upsert(record(json!({
            "id": "first", "round": "מחזור 3", "date": "2026-02-01", "home": "עכו", "away": "גליל עליון"
        })));
        let second = registry.upsert(record(json!({
            "id": "second", "round": "מחזור 3", "date": "2026-02-08", "home": "עכו", "away": "גליל עליון"
        })));

        // Round key hit: both land on the first record
        assert_eq!(first, "first");
        assert_eq!(second, "first");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("first").unwrap().date, "2026-02-01");
    }

    #[test]
    fn test_synthetic_ids_are_unique() {
        let mut registry = MatchRegistry::new(TeamKeyIndex::default());

        registry.upsert(record(json!({"id": "M2", "date": "2026-01-01", "home": "א", "away": "ב"})));
        let synthetic = registry.upsert(record(json!({"date": "2026-01-02", "home": "ג", "away": "ד"})));

        assert_eq!(synthetic, "M3");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_rescheduled_game_keeps_single_id() {
        let stored = record(json!({
            "id": "g1", "date": "2026-03-01", "time": "19:00", "home": "א", "away": "ב", "venue": "אולם"
        }));
        let moved = record(json!({
            "id": "g1", "date": "2026-03-05", "time": "20:30", "home": "א", "away": "ב"
        }));

        let merged = merge_matches(&[stored], &[moved]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].date, "2026-03-05");
        assert_eq!(merged[0].time, "20:30");
        assert_eq!(merged[0].venue, "אולם");
    }

    #[test]
    fn test_output_sorted_with_unparseable_first() {
        let later = record(json!({"id": "b", "date": "2026-02-01", "time": "20:00", "home": "א", "away": "ב"}));
        let earlier = record(json!({"id": "a", "date": "15/01/2026", "time": "18:00", "home": "ג", "away": "ד"}));
        let undated = record(json!({"id": "c", "round": "מחזור 9", "home": "ה", "away": "ו"}));

        let merged = merge_matches(&[later, earlier, undated], &[]);
        let ids: Vec<&str> = merged.iter().map(|m| m.id.as_str()).collect();

        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(merged[1].date, "2026-01-15");
    }
}
