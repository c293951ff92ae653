//! The persisted dataset document
//!
//! The file is a single JSON object. Only the four keys below are interpreted
//! here; anything else at the top level (a standings table written by another
//! job, for instance) is carried through a load/save cycle untouched.
//! Match entries stay raw JSON so callers decide how leniently to read them.

use crate::error::{PersistenceError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;

/// The dataset file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Team display name shown by the front end
    #[serde(default)]
    pub team: String,

    /// `YYYY-MM-DD HH:MM` in the league's timezone
    #[serde(default)]
    pub last_update: String,

    /// Fixtures in chronological order
    #[serde(default)]
    pub matches: Vec<Value>,

    /// Where standings data came from
    #[serde(rename = "standingsSource", default, skip_serializing_if = "Option::is_none")]
    pub standings_source: Option<String>,

    /// Top-level keys this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    /// Decode a dataset document that was read from `path`
    pub fn from_slice(path: &Path, bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        if !value.is_object() {
            return Err(PersistenceError::corruption(path, "top level is not a JSON object"));
        }
        serde_json::from_value(value).map_err(|e| PersistenceError::corruption(path, e.to_string()))
    }

    /// Write the document pretty-printed with a trailing newline
    pub fn write_pretty<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// The bytes [`Dataset::write_pretty`] produces
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_pretty(&mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_top_level_keys_survive() {
        let raw = json!({
            "team": "הפ׳ גליל עליון",
            "last_update": "2026-01-16 10:00",
            "matches": [{"id": "1"}],
            "standings": [{"team": "עכו", "points": 9}]
        });
        let bytes = serde_json::to_vec(&raw).unwrap();

        let dataset = Dataset::from_slice(Path::new("data.json"), &bytes).unwrap();
        assert_eq!(dataset.matches.len(), 1);
        assert_eq!(dataset.standings_source, None);
        assert!(dataset.extra.contains_key("standings"));

        let written: Value = serde_json::from_slice(&dataset.to_pretty_bytes().unwrap()).unwrap();
        assert_eq!(written["standings"][0]["points"], json!(9));
        assert!(written.get("standingsSource").is_none());
    }

    #[test]
    fn test_missing_keys_default() {
        let dataset = Dataset::from_slice(Path::new("data.json"), b"{}").unwrap();
        assert_eq!(dataset, Dataset::default());
    }

    #[test]
    fn test_non_object_is_corruption() {
        let err = Dataset::from_slice(Path::new("data.json"), b"[1, 2]").unwrap_err();
        assert!(matches!(err, PersistenceError::Corruption { .. }));

        let err = Dataset::from_slice(Path::new("data.json"), b"{not json").unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization(_)));
    }

    #[test]
    fn test_pretty_output_keeps_hebrew_and_newline() {
        let dataset = Dataset {
            team: "גליל עליון".to_string(),
            standings_source: Some("vole-api (rounds endpoint)".to_string()),
            ..Default::default()
        };

        let text = String::from_utf8(dataset.to_pretty_bytes().unwrap()).unwrap();
        assert!(text.contains("\"team\": \"גליל עליון\""));
        assert!(text.contains("\n  \"standingsSource\""));
        assert!(text.ends_with("}\n"));
    }
}
