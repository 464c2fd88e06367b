//! Record repair: guarantees a complete, well-typed store on every load.
//!
//! Persisted records can be absent, truncated, hand-edited, or written by
//! an older revision without some field. [`normalize`] rebuilds the full
//! [`StoreData`] from whatever JSON is found, repairing each field to its
//! seed default, and reports whether anything had to change. Backends
//! persist the repaired record whenever the flag is set, so the backing
//! medium is self-healing and newly introduced fields get backfilled on
//! first access after a deploy.
//!
//! Repair rules, per field class:
//!
//! - numeric: accepted only as a JSON non-negative integer, else default
//! - text: accepted only if non-empty after trimming, else default; the
//!   trimmed form is what gets stored
//! - story list: non-list input is replaced by the full default list;
//!   list input is repaired entry by entry against a positionally matched
//!   default, then sorted by position and renumbered `1..N`
//! - ledger amount: JSON `null` is a valid "no amount" marker; a missing
//!   or non-integer amount repairs to "no amount"
//!
//! Normalization is idempotent: feeding the output back in yields an equal
//! record with the corrected flag unset. The percent field is not clamped
//! here; the admin write boundary owns the `[0, 100]` clamp and the render
//! layer clamps again for display.

use serde_json::Value;

use crate::models::{
    default_settings, default_stories, DetailEntry, DetailKind, Settings, Story, StoreData,
    DETAIL_DESCRIPTION_PLACEHOLDER, STORY_DESCRIPTION_PLACEHOLDER, STORY_IMAGE_PLACEHOLDER,
    STORY_TITLE_PLACEHOLDER,
};

/// Rebuild a complete [`StoreData`] from raw persisted JSON.
///
/// `raw` is `None` when the backing medium had no record at all. `now` is
/// the timestamp used wherever a fresh `updated_at`/`created_at` value is
/// needed. Returns the repaired record and whether any repair happened.
pub fn normalize(raw: Option<&Value>, now: &str) -> (StoreData, bool) {
    let root = match raw {
        Some(Value::Object(map)) => map,
        _ => return (crate::models::default_store(now), true),
    };

    let mut corrected = false;

    let settings = normalize_settings(root.get("settings"), now, &mut corrected);
    let mut stories = normalize_stories(root.get("stories"), &mut corrected);
    if renumber_positions(&mut stories) {
        corrected = true;
    }

    (StoreData { settings, stories }, corrected)
}

fn normalize_settings(raw: Option<&Value>, now: &str, corrected: &mut bool) -> Settings {
    let defaults = default_settings(now);
    let obj = match raw {
        Some(Value::Object(map)) => map,
        _ => {
            *corrected = true;
            return defaults;
        }
    };

    Settings {
        total_surplus: field_u64(obj, "total_surplus", defaults.total_surplus, corrected),
        disks_sold: field_u64(obj, "disks_sold", defaults.disks_sold, corrected),
        families_supported: field_u64(
            obj,
            "families_supported",
            defaults.families_supported,
            corrected,
        ),
        projects_launched: field_u64(
            obj,
            "projects_launched",
            defaults.projects_launched,
            corrected,
        ),
        visitors_count: field_u64(obj, "visitors_count", defaults.visitors_count, corrected),
        base_price: field_u64(obj, "base_price", defaults.base_price, corrected),
        extra_price: field_u64(obj, "extra_price", defaults.extra_price, corrected),
        project_title: field_text(obj, "project_title", &defaults.project_title, corrected),
        progress_percent: field_u64(
            obj,
            "progress_percent",
            defaults.progress_percent,
            corrected,
        ),
        remaining_amount: field_u64(
            obj,
            "remaining_amount",
            defaults.remaining_amount,
            corrected,
        ),
        sales_points: field_text(obj, "sales_points", &defaults.sales_points, corrected),
        updated_at: field_text(obj, "updated_at", now, corrected),
    }
}

fn normalize_stories(raw: Option<&Value>, corrected: &mut bool) -> Vec<Story> {
    let list = match raw {
        Some(Value::Array(entries)) => entries,
        _ => {
            *corrected = true;
            return default_stories();
        }
    };

    let defaults = default_stories();
    list.iter()
        .enumerate()
        .map(|(index, entry)| {
            let fallback = defaults.get(index).cloned().unwrap_or_else(|| Story {
                id: index as u64 + 1,
                title: STORY_TITLE_PLACEHOLDER.to_string(),
                description: STORY_DESCRIPTION_PLACEHOLDER.to_string(),
                image_url: STORY_IMAGE_PLACEHOLDER.to_string(),
                position: index as u64 + 1,
            });
            normalize_story(entry, &fallback, corrected)
        })
        .collect()
}

fn normalize_story(raw: &Value, fallback: &Story, corrected: &mut bool) -> Story {
    let obj = match raw {
        Value::Object(map) => map,
        _ => {
            *corrected = true;
            return fallback.clone();
        }
    };

    Story {
        id: field_id(obj, "id", fallback.id, corrected),
        title: field_text(obj, "title", &fallback.title, corrected),
        description: field_text(obj, "description", &fallback.description, corrected),
        image_url: field_text(obj, "image_url", &fallback.image_url, corrected),
        position: field_id(obj, "position", fallback.position, corrected),
    }
}

/// Rebuild the ledger from raw persisted JSON.
///
/// An absent or non-list record yields the empty ledger with the corrected
/// flag set, so the backend writes an empty document and later loads come
/// back clean.
pub fn normalize_details(raw: Option<&Value>, now: &str) -> (Vec<DetailEntry>, bool) {
    let list = match raw {
        Some(Value::Array(entries)) => entries,
        _ => return (Vec::new(), true),
    };

    let mut corrected = false;
    let entries = list
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_detail(entry, index as u64 + 1, now, &mut corrected))
        .collect();

    (entries, corrected)
}

fn normalize_detail(
    raw: &Value,
    fallback_id: u64,
    now: &str,
    corrected: &mut bool,
) -> DetailEntry {
    let obj = match raw {
        Value::Object(map) => map,
        _ => {
            *corrected = true;
            return DetailEntry {
                id: fallback_id,
                kind: DetailKind::default(),
                description: DETAIL_DESCRIPTION_PLACEHOLDER.to_string(),
                amount: None,
                created_at: now.to_string(),
            };
        }
    };

    let kind = match obj.get("kind").and_then(Value::as_str) {
        Some(raw_kind) => match DetailKind::parse(raw_kind) {
            Some(kind) => kind,
            None => {
                *corrected = true;
                DetailKind::default()
            }
        },
        None => {
            *corrected = true;
            DetailKind::default()
        }
    };

    // Null is a valid "no amount" marker; anything else non-integer repairs.
    let amount = match obj.get("amount") {
        Some(Value::Null) => None,
        Some(value) => match value.as_i64() {
            Some(amount) => Some(amount),
            None => {
                *corrected = true;
                None
            }
        },
        None => {
            *corrected = true;
            None
        }
    };

    let created_at = match obj.get("created_at").and_then(Value::as_str) {
        Some(ts) if chrono::DateTime::parse_from_rfc3339(ts).is_ok() => ts.to_string(),
        _ => {
            *corrected = true;
            now.to_string()
        }
    };

    DetailEntry {
        id: field_id(obj, "id", fallback_id, corrected),
        kind,
        description: field_text(obj, "description", DETAIL_DESCRIPTION_PLACEHOLDER, corrected),
        amount,
        created_at,
    }
}

/// Repair an already-typed store in place.
///
/// Used by the relational backend, whose schema guarantees the numeric
/// typing but still allows empty text columns and sparse positions.
/// Returns whether anything changed.
pub fn repair_store(store: &mut StoreData, now: &str) -> bool {
    let defaults = default_settings(now);
    let mut changed = false;

    changed |= repair_text(&mut store.settings.project_title, &defaults.project_title);
    changed |= repair_text(&mut store.settings.sales_points, &defaults.sales_points);
    changed |= repair_text(&mut store.settings.updated_at, now);

    for story in &mut store.stories {
        changed |= repair_text(&mut story.title, STORY_TITLE_PLACEHOLDER);
        changed |= repair_text(&mut story.description, STORY_DESCRIPTION_PLACEHOLDER);
        changed |= repair_text(&mut story.image_url, STORY_IMAGE_PLACEHOLDER);
    }

    changed |= renumber_positions(&mut store.stories);
    changed
}

/// Repair already-typed ledger entries in place.
///
/// Companion to [`repair_store`] for backends whose schema carries the
/// typing: empty descriptions get the placeholder and unparsable
/// timestamps are replaced with `now`. Returns whether anything changed.
pub fn repair_details(details: &mut [DetailEntry], now: &str) -> bool {
    let mut changed = false;
    for entry in details.iter_mut() {
        changed |= repair_text(&mut entry.description, DETAIL_DESCRIPTION_PLACEHOLDER);
        if chrono::DateTime::parse_from_rfc3339(&entry.created_at).is_err() {
            entry.created_at = now.to_string();
            changed = true;
        }
    }
    changed
}

fn repair_text(value: &mut String, fallback: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        *value = fallback.to_string();
        true
    } else if trimmed.len() != value.len() {
        *value = trimmed.to_string();
        true
    } else {
        false
    }
}

/// Sort stories by position and reassign dense positions `1..N`.
///
/// Runs after every load and every mutation; returns whether any position
/// value actually changed (a dense list passes through untouched, which is
/// what keeps normalization idempotent).
pub fn renumber_positions(stories: &mut [Story]) -> bool {
    stories.sort_by_key(|story| story.position);
    let mut changed = false;
    for (index, story) in stories.iter_mut().enumerate() {
        let dense = index as u64 + 1;
        if story.position != dense {
            story.position = dense;
            changed = true;
        }
    }
    changed
}

fn field_u64(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    fallback: u64,
    corrected: &mut bool,
) -> u64 {
    match obj.get(key).and_then(Value::as_u64) {
        Some(value) => value,
        None => {
            *corrected = true;
            fallback
        }
    }
}

/// Like [`field_u64`] but rejects zero (ids and positions start at 1).
fn field_id(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    fallback: u64,
    corrected: &mut bool,
) -> u64 {
    match obj.get(key).and_then(Value::as_u64) {
        Some(value) if value >= 1 => value,
        _ => {
            *corrected = true;
            fallback
        }
    }
}

fn field_text(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    fallback: &str,
    corrected: &mut bool,
) -> String {
    match obj.get(key).and_then(Value::as_str) {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                *corrected = true;
                fallback.to_string()
            } else {
                if trimmed.len() != raw.len() {
                    *corrected = true;
                }
                trimmed.to_string()
            }
        }
        None => {
            *corrected = true;
            fallback.to_string()
        }
    }
}
