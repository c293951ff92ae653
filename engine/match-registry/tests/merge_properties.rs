use match_registry::{canonicalize, merge_matches, normalize_date, MatchRecord};
use serde_json::{json, Value};

fn record(value: Value) -> MatchRecord {
    MatchRecord::from_value(&value).unwrap()
}

fn stored_dataset() -> Vec<MatchRecord> {
    vec![
        record(json!({
            "id": "5001", "round": "מחזור 1", "date": "10/01/2026", "time": "20:00:00",
            "home": "הפ׳ גליל עליון", "away": "מטה אשר", "venue": "", "hs": 3, "as": 1
        })),
        record(json!({
            "id": "5002", "round": "מחזור 2", "date": "2026-01-16", "time": "00:00",
            "home": "הפועל גליל עליון", "away": "מכבי עכו", "venue": "", "hs": null, "as": null
        })),
        record(json!({
            "id": "5003", "round": "מחזור 3", "date": "2026-01-23", "time": "19:30",
            "home": "קרית שמונה", "away": "גליל עליון", "venue": "", "hs": null, "as": null
        })),
    ]
}

fn fetched_batch() -> Vec<MatchRecord> {
    vec![
        record(json!({
            "id": "6002", "round": "מחזור 2", "date": "2026-01-16", "time": "10:30",
            "home": "גליל עליון", "away": "עכו", "venue": "אולם עירוני", "hs": 2, "as": 1
        })),
        record(json!({
            "id": "6003", "round": "מחזור 3", "date": "2026-01-23", "time": "19:30",
            "home": "קרית שמונה צו פיוס", "away": "גליל עליון", "venue": "היכל", "hs": 0, "as": 3
        })),
        record(json!({
            "id": "6004", "round": "מחזור 4", "date": "2026-01-30", "time": "20:00",
            "home": "גליל עליון", "away": "מטה אשר", "venue": "", "hs": null, "as": null
        })),
        record(json!({
            "id": "6005", "round": "מחזור 4", "date": "2026-01-30", "time": "20:00",
            "home": "מטה אשר", "away": "גליל עליון", "venue": "", "hs": 3, "as": 2
        })),
    ]
}

/// Record contents with the id removed, in a stable order
fn contents(records: &[MatchRecord]) -> Vec<Value> {
    let mut values: Vec<Value> = records
        .iter()
        .map(|r| {
            let mut value = r.to_value();
            value.as_object_mut().unwrap().remove("id");
            value
        })
        .collect();
    values.sort_by_key(|v| v.to_string());
    values
}

#[test]
fn test_merge_is_idempotent() {
    let once = merge_matches(&stored_dataset(), &fetched_batch());
    let twice = merge_matches(&once, &[]);

    assert_eq!(once, twice);
    assert_eq!(serde_json::to_string(&once).unwrap(), serde_json::to_string(&twice).unwrap());
}

#[test]
fn test_incoming_order_does_not_matter() {
    let forward = merge_matches(&stored_dataset(), &fetched_batch());

    let mut reversed_batch = fetched_batch();
    reversed_batch.reverse();
    let reversed = merge_matches(&stored_dataset(), &reversed_batch);

    let mut rotated_batch = fetched_batch();
    rotated_batch.rotate_left(1);
    let rotated = merge_matches(&stored_dataset(), &rotated_batch);

    assert_eq!(forward.len(), 4);
    assert_eq!(contents(&forward), contents(&reversed));
    assert_eq!(contents(&forward), contents(&rotated));
}

#[test]
fn test_name_variants_merge_into_one_record() {
    assert_eq!(canonicalize("הפ׳ גליל עליון"), "גליל עליון");
    assert_eq!(canonicalize("הפועל גליל עליון"), "גליל עליון");

    let a = record(json!({
        "id": "1", "date": "2026-01-16", "time": "10:30", "home": "הפ׳ גליל עליון", "away": "עכו"
    }));
    let b = record(json!({
        "id": "2", "date": "2026-01-16", "time": "10:30", "home": "הפועל גליל עליון", "away": "עכו"
    }));

    let merged = merge_matches(&[a, b], &[]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].id, "1");
}

#[test]
fn test_scores_are_always_paired() {
    let merged = merge_matches(&stored_dataset(), &fetched_batch());

    for game in &merged {
        assert_eq!(game.hs.is_some(), game.away_score.is_some(), "half score on {}", game.id);
    }

    let court_order = merged.iter().find(|m| m.id == "5003").unwrap();
    assert_eq!(court_order.score(), Some((0, 3)));
    assert_eq!(court_order.venue, "היכל");
}

#[test]
fn test_legacy_dates_are_normalized() {
    assert_eq!(normalize_date("16/01/2026"), normalize_date("2026-01-16"));
    assert_eq!(normalize_date("16/01/2026"), "2026-01-16");

    let merged = merge_matches(&stored_dataset(), &[]);
    assert_eq!(merged[0].date, "2026-01-10");
    assert_eq!(merged[0].time, "20:00");
}

#[test]
fn test_conflicting_duplicates_converge_in_any_order() {
    let unscored = record(json!({
        "id": "a", "round": "מחזור 5", "date": "2026-02-06", "time": "18:00",
        "home": "עכו", "away": "גליל עליון", "venue": "", "hs": null, "as": null
    }));
    let scored = record(json!({
        "id": "b", "round": "מחזור 5", "date": "2026-02-06", "time": "20:00",
        "home": "עכו בנק", "away": "גליל עליון", "venue": "", "hs": 1, "as": 3
    }));

    let forward = merge_matches(&[], &[unscored.clone(), scored.clone()]);
    let backward = merge_matches(&[], &[scored, unscored]);

    assert_eq!(forward.len(), 1);
    assert_eq!(contents(&forward), contents(&backward));
    assert_eq!(forward[0].home, "עכו בנק");
    assert_eq!(forward[0].time, "20:00");
    assert_eq!(forward[0].score(), Some((1, 3)));
}

#[test]
fn test_same_time_duplicates_keep_scored_names_in_any_order() {
    let unscored = record(json!({
        "id": "a", "date": "2026-02-06", "time": "18:00", "home": "עכו", "away": "גליל עליון"
    }));
    let scored = record(json!({
        "id": "b", "date": "2026-02-06", "time": "18:00", "home": "עכו בנק", "away": "גליל עליון",
        "hs": 3, "as": 0
    }));

    let forward = merge_matches(&[], &[unscored.clone(), scored.clone()]);
    let backward = merge_matches(&[], &[scored, unscored]);

    assert_eq!(contents(&forward), contents(&backward));
    assert_eq!(forward[0].home, "עכו בנק");
}

#[test]
fn test_sponsor_suffixed_name_collapses_onto_club() {
    let stored = record(json!({
        "id": "7001", "round": "מחזור 6", "date": "2026-02-13", "time": "00:00",
        "home": "עכו", "away": "גליל עליון", "venue": "", "hs": null, "as": null
    }));
    let fetched = record(json!({
        "id": "8001", "round": "מחזור 6", "date": "2026-02-13", "time": "19:00",
        "home": "עכו בנק הפועלים", "away": "גליל עליון", "venue": "אולם", "hs": 3, "as": 1
    }));

    let merged = merge_matches(&[stored], &[fetched]);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].id, "7001");
    assert_eq!(merged[0].home, "עכו בנק הפועלים");
    assert_eq!(merged[0].time, "19:00");
    assert_eq!(merged[0].score(), Some((3, 1)));
}
