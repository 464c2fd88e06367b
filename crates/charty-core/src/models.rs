//! Core data models for the Charty dashboard.
//!
//! These types represent the singleton settings record, the ordered
//! success-story collection, and the income/expense ledger that flow
//! through the store, the admin actions, and the public pages.
//!
//! Every field has a seed default; the [`normalize`](crate::normalize)
//! module uses those defaults as per-field repair values, so a persisted
//! record is always complete and well typed after a load.

use serde::{Deserialize, Serialize};

/// Default admin password. Deployments override it in `[admin] password`.
pub const DEFAULT_ADMIN_PASSWORD: &str = "1234@@Ff";

/// Name of the session cookie set on successful admin login.
pub const AUTH_COOKIE: &str = "charty_admin";

/// Placeholder title for a freshly added or blanked-out story.
pub const STORY_TITLE_PLACEHOLDER: &str = "قصة جديدة";

/// Placeholder description for a freshly added or blanked-out story.
pub const STORY_DESCRIPTION_PLACEHOLDER: &str = "تفاصيل المشروع ستضاف قريباً.";

/// Shared placeholder image path for stories without a real photo.
pub const STORY_IMAGE_PLACEHOLDER: &str = "/place.png";

/// Fallback project title when the admin submits an empty one.
pub const PROJECT_TITLE_PLACEHOLDER: &str = "مشروع جديد قيد الإطلاق";

/// Placeholder description for a freshly added ledger entry.
pub const DETAIL_DESCRIPTION_PLACEHOLDER: &str = "بند جديد";

/// The singleton campaign record: live counters, pricing, and progress.
///
/// All numeric fields are unsigned; negative values cannot be represented
/// and are repaired to defaults on load. `progress_percent` is clamped into
/// `[0, 100]` at the admin write boundary and again at render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub total_surplus: u64,
    pub disks_sold: u64,
    pub families_supported: u64,
    pub projects_launched: u64,
    pub visitors_count: u64,
    pub base_price: u64,
    pub extra_price: u64,
    pub project_title: String,
    pub progress_percent: u64,
    pub remaining_amount: u64,
    /// Newline-delimited sales locations; empty lines are filtered at render.
    pub sales_points: String,
    /// RFC 3339 timestamp of the last admin save (not touched by the
    /// visitor counter).
    pub updated_at: String,
}

/// A success-story card shown on the public dashboard.
///
/// `position` values are dense `1..N` in display order; every mutation and
/// every load re-derives them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub position: u64,
}

/// Category of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailKind {
    Income,
    Expense,
    InKind,
}

impl DetailKind {
    /// Wire/database representation (`income`, `expense`, `in-kind`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailKind::Income => "income",
            DetailKind::Expense => "expense",
            DetailKind::InKind => "in-kind",
        }
    }

    /// Parse the wire representation; unknown values yield `None` so the
    /// caller decides whether to keep the previous kind or default.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(DetailKind::Income),
            "expense" => Some(DetailKind::Expense),
            "in-kind" => Some(DetailKind::InKind),
            _ => None,
        }
    }
}

impl Default for DetailKind {
    fn default() -> Self {
        DetailKind::Income
    }
}

/// One line item in the income/expense/in-kind ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailEntry {
    pub id: u64,
    pub kind: DetailKind,
    pub description: String,
    /// `None` marks an explicitly non-monetary contribution, distinct from
    /// "missing and needs repair".
    pub amount: Option<i64>,
    pub created_at: String,
}

/// The full persisted aggregate: settings plus the ordered story list.
///
/// The ledger is persisted separately (`load_details`/`save_details`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreData {
    pub settings: Settings,
    pub stories: Vec<Story>,
}

/// Seed settings used when no record exists and as per-field repair values.
pub fn default_settings(now: &str) -> Settings {
    Settings {
        total_surplus: 15450,
        disks_sold: 5200,
        families_supported: 12,
        projects_launched: 8,
        visitors_count: 0,
        base_price: 12,
        extra_price: 1000,
        project_title: "شراء فرن منزلي للأرملة (س)".to_string(),
        progress_percent: 70,
        remaining_amount: 300,
        sales_points: "دمشق - سوق الحميدية\nحلب - السبع بحرات\nحمص - شارع الدبلان".to_string(),
        updated_at: now.to_string(),
    }
}

/// Seed story cards (ids 1–3, positions 1–3).
pub fn default_stories() -> Vec<Story> {
    vec![
        Story {
            id: 1,
            title: "ماكينة خياطة".to_string(),
            description: "عائلة أم أحمد بدأت مشروع تفصيل منزلي.".to_string(),
            image_url: STORY_IMAGE_PLACEHOLDER.to_string(),
            position: 1,
        },
        Story {
            id: 2,
            title: "عربة طعام".to_string(),
            description: "الشاب خالد يعيل إخوته الآن.".to_string(),
            image_url: STORY_IMAGE_PLACEHOLDER.to_string(),
            position: 2,
        },
        Story {
            id: 3,
            title: "أدوات زراعية".to_string(),
            description: "مشروع زراعة منزلية لعائلة متعففة.".to_string(),
            image_url: STORY_IMAGE_PLACEHOLDER.to_string(),
            position: 3,
        },
    ]
}

/// The complete default aggregate.
pub fn default_store(now: &str) -> StoreData {
    StoreData {
        settings: default_settings(now),
        stories: default_stories(),
    }
}

/// Current UTC time in the timestamp format used across the store.
pub fn now_stamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stories_are_dense() {
        let stories = default_stories();
        for (i, story) in stories.iter().enumerate() {
            assert_eq!(story.position, i as u64 + 1);
            assert_eq!(story.id, i as u64 + 1);
        }
    }

    #[test]
    fn test_detail_kind_round_trip() {
        for kind in [DetailKind::Income, DetailKind::Expense, DetailKind::InKind] {
            assert_eq!(DetailKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DetailKind::parse("refund"), None);
    }

    #[test]
    fn test_store_data_json_shape() {
        let store = default_store("2024-01-01T00:00:00Z");
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["settings"]["total_surplus"], 15450);
        assert_eq!(json["stories"][0]["position"], 1);
    }

    #[test]
    fn test_detail_kind_serializes_kebab_case() {
        let entry = DetailEntry {
            id: 1,
            kind: DetailKind::InKind,
            description: "تبرع".to_string(),
            amount: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "in-kind");
        assert!(json["amount"].is_null());
    }
}
