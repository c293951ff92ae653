//! Conversion of one rounds-endpoint payload into fixture records

use crate::score::ScoreRules;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use match_registry::{Canonicalizer, MatchRecord};
use serde_json::{Map, Value};
use tracing::debug;

/// Label used when a game carries neither a round name nor a round number
pub const ROUND_LABEL: &str = "מחזור";

const ID_KEYS: &[&str] = &["_id", "id"];
const DATETIME_KEYS: &[&str] = &["date", "game_date", "datetime"];

/// Offset-bearing layouts beyond RFC 3339; `%#z` takes `+02`, `+0200` and `+02:00`
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Naive timestamp layouts accepted when no offset is given; read as UTC
const NAIVE_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Parses the `games` list of a rounds payload
#[derive(Debug, Clone, Default)]
pub struct GameParser {
    canonicalizer: Canonicalizer,
    score_rules: ScoreRules,
}

impl GameParser {
    pub fn new(canonicalizer: Canonicalizer, score_rules: ScoreRules) -> Self {
        Self { canonicalizer, score_rules }
    }

    /// Parse every usable game in the payload.
    ///
    /// Non-object entries and games without a parseable kick-off are skipped.
    pub fn parse(&self, payload: &Value, tz: Tz) -> Vec<MatchRecord> {
        let Some(games) = payload.get("games").and_then(Value::as_array) else {
            return Vec::new();
        };

        games
            .iter()
            .filter_map(|game| match game.as_object() {
                Some(object) => self.parse_game(object, game, tz),
                None => {
                    debug!("Skipping non-object game entry: {}", game);
                    None
                }
            })
            .collect()
    }

    fn parse_game(&self, game: &Map<String, Value>, raw: &Value, tz: Tz) -> Option<MatchRecord> {
        let round_name = string_at(raw, &["round", "name"]);
        let round_number = raw.pointer("/round/number").and_then(Value::as_u64).filter(|n| *n > 0);
        let round = if !round_name.is_empty() {
            round_name
        } else if let Some(n) = raw.pointer("/round/number").and_then(Value::as_u64) {
            format!("{ROUND_LABEL} {n}")
        } else {
            ROUND_LABEL.to_string()
        };

        let home = self.canonicalizer.canonicalize(&team_name(raw, "home"));
        let away = self.canonicalizer.canonicalize(&team_name(raw, "away"));

        let Some(raw_kickoff) = first_non_empty_string(game, DATETIME_KEYS) else {
            debug!("Dropping game without kick-off: {}", raw);
            return None;
        };
        let Some(kickoff) = parse_kickoff(raw_kickoff) else {
            debug!("Dropping game with unparseable kick-off {:?}", raw_kickoff);
            return None;
        };
        let local = kickoff.with_timezone(&tz);
        let date = local.format("%Y-%m-%d").to_string();
        let time = local.format("%H:%M").to_string();

        let venue = [string_at(raw, &["place", "name"]), string_at(raw, &["stadium", "name"])]
            .into_iter()
            .find(|v| !v.is_empty())
            .unwrap_or_default();

        let id = match source_id(game) {
            Some(id) => id,
            None => {
                let round_part = round_number.map(|n| n.to_string()).unwrap_or_else(|| round.clone());
                format!("{round_part}|{date}|{time}|{home}|{away}").replace(' ', "_")
            }
        };

        let mut record = MatchRecord {
            id,
            round,
            date,
            time,
            home,
            away,
            venue,
            hs: None,
            away_score: None,
            extra: Map::new(),
        };
        record.set_score(self.score_rules.extract(raw));
        Some(record)
    }
}

/// Parse with the default vocabulary and score rules
pub fn parse_games(payload: &Value, tz: Tz) -> Vec<MatchRecord> {
    GameParser::default().parse(payload, tz)
}

/// Interpret an upstream timestamp; offset-less values are UTC
pub fn parse_kickoff(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let zoned = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(local) => format!("{local}+00:00"),
        None => raw.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn source_id(game: &Map<String, Value>) -> Option<String> {
    let id = ID_KEYS.iter().find_map(|key| match game.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })?;
    Some(id)
}

/// Provider-qualified name, then team name, then plain name
fn team_name(game: &Value, side: &str) -> String {
    [
        string_at(game, &[side, "team", "provider", "name"]),
        string_at(game, &[side, "team", "name"]),
        string_at(game, &[side, "name"]),
    ]
    .into_iter()
    .find(|name| !name.is_empty())
    .unwrap_or_default()
}

fn string_at(value: &Value, path: &[&str]) -> String {
    let mut current = value;
    for key in path {
        match current.get(*key) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    current.as_str().unwrap_or_default().to_string()
}

fn first_non_empty_string<'a>(game: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| game.get(*key)?.as_str().filter(|s| !s.is_empty()))
}
