use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dates::is_placeholder_time;

/// One fixture as stored in the dataset file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Source id, or a deterministic synthetic id
    #[serde(default)]
    pub id: String,

    /// Human-readable round label (e.g. "מחזור 11")
    #[serde(default)]
    pub round: String,

    /// Calendar date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,

    /// Kick-off time, `HH:MM`; `00:00` or empty when unknown
    #[serde(default)]
    pub time: String,

    #[serde(default)]
    pub home: String,

    #[serde(default)]
    pub away: String,

    #[serde(default)]
    pub venue: String,

    /// Home sets won
    pub hs: Option<u32>,

    /// Away sets won
    #[serde(rename = "as")]
    pub away_score: Option<u32>,

    /// Keys this crate does not interpret, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Completeness ranking used when two rows describe the same game.
///
/// Field order is the comparison order: score, venue, time, then shorter
/// combined team names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality {
    pub has_score: bool,
    pub has_venue: bool,
    pub has_time: bool,
    pub name_brevity: i64,
}

impl MatchRecord {
    /// Build a record from an arbitrary stored JSON entry.
    ///
    /// Returns `None` for non-object values. Numeric ids and rounds are
    /// stringified; a half-present score pair is dropped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let mut extra = object.clone();
        for known in ["id", "round", "date", "time", "home", "away", "venue", "hs", "as"] {
            extra.remove(known);
        }

        let mut record = Self {
            id: lenient_string(object.get("id")),
            round: lenient_string(object.get("round")),
            date: lenient_string(object.get("date")),
            time: lenient_string(object.get("time")),
            home: lenient_string(object.get("home")),
            away: lenient_string(object.get("away")),
            venue: lenient_string(object.get("venue")),
            hs: lenient_score(object.get("hs")),
            away_score: lenient_score(object.get("as")),
            extra,
        };
        record.enforce_score_pair();
        Some(record)
    }

    /// Serialize back into a dataset entry
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Both scores, when the game has been played
    pub fn score(&self) -> Option<(u32, u32)> {
        match (self.hs, self.away_score) {
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }

    pub fn set_score(&mut self, score: Option<(u32, u32)>) {
        self.hs = score.map(|(home, _)| home);
        self.away_score = score.map(|(_, away)| away);
    }

    pub fn has_score(&self) -> bool {
        self.score().is_some()
    }

    /// Drop a half-present score so both sides are set or neither is
    pub fn enforce_score_pair(&mut self) {
        if self.hs.is_some() != self.away_score.is_some() {
            self.hs = None;
            self.away_score = None;
        }
    }

    pub fn has_venue(&self) -> bool {
        !self.venue.trim().is_empty()
    }

    pub fn has_known_time(&self) -> bool {
        !is_placeholder_time(&self.time)
    }

    /// True when the round label is empty or zero
    pub fn has_blank_round(&self) -> bool {
        let round = self.round.trim();
        round.is_empty() || round == "0"
    }

    pub fn quality(&self) -> Quality {
        let names = format!("{}|{}", self.home, self.away);
        Quality {
            has_score: self.has_score(),
            has_venue: self.has_venue(),
            has_time: self.has_known_time(),
            name_brevity: -(names.chars().count() as i64),
        }
    }
}

fn lenient_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn lenient_score(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                // Hand-edited files sometimes carry `3.0`
                n.as_f64().filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)
            })
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_is_lenient() {
        let record = MatchRecord::from_value(&json!({
            "id": 17,
            "round": 3,
            "date": "16/01/2026",
            "home": "עכו",
            "away": "גליל עליון",
            "hs": "3",
            "as": 1,
            "note": "kept"
        }))
        .unwrap();

        assert_eq!(record.id, "17");
        assert_eq!(record.round, "3");
        assert_eq!(record.time, "");
        assert_eq!(record.score(), Some((3, 1)));
        assert_eq!(record.extra.get("note"), Some(&json!("kept")));
    }

    #[test]
    fn test_integral_float_scores_are_accepted() {
        let record = MatchRecord::from_value(&json!({"id": "a", "hs": 3.0, "as": 1.0})).unwrap();
        assert_eq!(record.score(), Some((3, 1)));

        let record = MatchRecord::from_value(&json!({"id": "a", "hs": 2.5, "as": 1})).unwrap();
        assert_eq!(record.score(), None);

        let record = MatchRecord::from_value(&json!({"id": "a", "hs": -1.0, "as": 1})).unwrap();
        assert_eq!(record.score(), None);
    }

    #[test]
    fn test_half_score_is_dropped() {
        let record = MatchRecord::from_value(&json!({"id": "a", "hs": 2})).unwrap();
        assert_eq!(record.hs, None);
        assert_eq!(record.away_score, None);

        assert!(MatchRecord::from_value(&json!("not a match")).is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let record = MatchRecord::from_value(&json!({"id": "a", "date": "2026-01-16"})).unwrap();
        let value = record.to_value();

        assert_eq!(value["hs"], Value::Null);
        assert_eq!(value["as"], Value::Null);
        assert_eq!(value["venue"], json!(""));
        assert!(value.get("away_score").is_none());
    }

    #[test]
    fn test_quality_ordering() {
        let mut sparse = MatchRecord::from_value(&json!({
            "id": "a", "time": "00:00", "home": "הפועל גליל עליון", "away": "מכבי עכו"
        }))
        .unwrap();
        let mut rich = sparse.clone();
        rich.time = "10:30".to_string();

        assert!(rich.quality() > sparse.quality());

        sparse.set_score(Some((3, 0)));
        assert!(sparse.quality() > rich.quality());

        rich.set_score(Some((3, 0)));
        rich.home = "גליל עליון".to_string();
        assert!(rich.quality() > sparse.quality());
    }
}
