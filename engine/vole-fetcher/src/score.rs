//! Best-effort score extraction from heterogeneous game payloads
//!
//! The upstream API has shipped several payload shapes over time. Strategies
//! are tried from most to least specific and the first one yielding two
//! non-negative integers wins. Extraction never fails: an unrecognised shape
//! is simply an unscored game.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

/// Most sets a team can win in one volleyball match
pub const MAX_SET_SCORE: u32 = 3;

const HOME_SCORE_KEYS: &[&str] = &["homeScore", "home_score", "homeGoals", "home_goals", "hs", "goals_home"];
const AWAY_SCORE_KEYS: &[&str] = &["awayScore", "away_score", "awayGoals", "away_goals", "as", "goals_away"];

const RESULT_CONTAINERS: &[&str] = &["result", "final", "final_result", "match_result", "game_result"];
const CONTAINER_HOME_KEYS: &[&str] = &["home", "hs", "homeScore", "home_score"];
const CONTAINER_AWAY_KEYS: &[&str] = &["away", "as", "awayScore", "away_score"];

const TEAM_SCORE_KEYS: &[&str] = &["goals", "score", "result"];

const SCORE_OBJECT_HOME_KEYS: &[&str] = &["home", "hs", "homeScore", "home_score", "homeGoals", "home_goals"];
const SCORE_OBJECT_AWAY_KEYS: &[&str] = &["away", "as", "awayScore", "away_score", "awayGoals", "away_goals"];

const SCORE_STRING_KEYS: &[&str] =
    &["result", "score", "final_score", "game_result", "display_result", "displayScore", "display_score"];

lazy_static! {
    static ref DIGITS: Regex = Regex::new(r"\d+").expect("valid digits pattern");
    static ref SCORE_STRING: Regex =
        Regex::new(r"(\d+)\s*[:\-\u{2013}\u{2014}\u{2011}]\s*(\d+)").expect("valid score pattern");
    static ref SET_PAIR: Regex = Regex::new(r"\b(\d)\s*[:\-]\s*(\d)\b").expect("valid set pattern");
}

/// Tunables of the last-resort recursive search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRules {
    /// A bare `a:b` string found deep in a payload only counts as a result
    /// when one side equals this value and neither exceeds it
    pub max_set_score: u32,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self { max_set_score: MAX_SET_SCORE }
    }
}

impl ScoreRules {
    /// Extract `(home, away)` from one game entry
    pub fn extract(&self, game: &Value) -> Option<(u32, u32)> {
        let object = game.as_object()?;

        direct_fields(object)
            .or_else(|| result_container(object))
            .or_else(|| per_team_fields(object))
            .or_else(|| score_object(object))
            .or_else(|| score_string(object))
            .or_else(|| self.walk(game))
    }

    fn walk(&self, value: &Value) -> Option<(u32, u32)> {
        match value {
            Value::Object(object) => {
                if object.contains_key("home") && object.contains_key("away") {
                    if let Some(pair) = both(to_score(object.get("home")), to_score(object.get("away"))) {
                        return Some(pair);
                    }
                }
                if let Some(pair) = direct_fields(object) {
                    return Some(pair);
                }
                object.values().find_map(|v| self.walk(v))
            }
            Value::Array(items) => items.iter().find_map(|v| self.walk(v)),
            Value::String(s) => self.set_pair(s),
            _ => None,
        }
    }

    fn set_pair(&self, text: &str) -> Option<(u32, u32)> {
        let max = self.max_set_score;
        let captures = SET_PAIR.captures_iter(text).find(|c| {
            let a = c[1].parse::<u32>().unwrap_or(u32::MAX);
            let b = c[2].parse::<u32>().unwrap_or(u32::MAX);
            a <= max && b <= max
        })?;

        let a = captures[1].parse::<u32>().ok()?;
        let b = captures[2].parse::<u32>().ok()?;
        (a == max || b == max).then_some((a, b))
    }
}

/// Extract `(home, away)` with the default rules
pub fn extract_score(game: &Value) -> Option<(u32, u32)> {
    ScoreRules::default().extract(game)
}

fn direct_fields(object: &Map<String, Value>) -> Option<(u32, u32)> {
    both(first_alias(object, HOME_SCORE_KEYS), first_alias(object, AWAY_SCORE_KEYS))
}

fn result_container(object: &Map<String, Value>) -> Option<(u32, u32)> {
    RESULT_CONTAINERS.iter().find_map(|key| {
        let container = object.get(*key)?.as_object()?;
        both(first_alias(container, CONTAINER_HOME_KEYS), first_alias(container, CONTAINER_AWAY_KEYS))
    })
}

fn per_team_fields(object: &Map<String, Value>) -> Option<(u32, u32)> {
    let home = object.get("home")?.as_object()?;
    let away = object.get("away")?.as_object()?;
    TEAM_SCORE_KEYS.iter().find_map(|key| both(to_score(home.get(*key)), to_score(away.get(*key))))
}

fn score_object(object: &Map<String, Value>) -> Option<(u32, u32)> {
    let score = object.get("score")?.as_object()?;
    both(first_alias(score, SCORE_OBJECT_HOME_KEYS), first_alias(score, SCORE_OBJECT_AWAY_KEYS))
}

fn score_string(object: &Map<String, Value>) -> Option<(u32, u32)> {
    SCORE_STRING_KEYS.iter().find_map(|key| {
        let text = object.get(*key)?.as_str()?;
        let captures = SCORE_STRING.captures(text)?;
        both(captures[1].parse().ok(), captures[2].parse().ok())
    })
}

/// Score under the first alias that is present and not null
fn first_alias(object: &Map<String, Value>, aliases: &[&str]) -> Option<u32> {
    let value = aliases.iter().find_map(|key| object.get(*key).filter(|v| !v.is_null()));
    to_score(value)
}

/// Integer or the first digit run of a string; anything else is not a score
fn to_score(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => DIGITS.find(s).and_then(|m| m.as_str().parse().ok()),
        _ => None,
    }
}

fn both(home: Option<u32>, away: Option<u32>) -> Option<(u32, u32)> {
    Some((home?, away?))
}
