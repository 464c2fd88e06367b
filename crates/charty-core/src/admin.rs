//! Admin mutations over the store and the ledger.
//!
//! Every function here is a pure in-memory transform; the HTTP layer loads
//! the current record, applies one of these, and saves the result back.
//! Form values follow the fallback rules from [`crate::form`]: a missing or
//! unparsable value keeps the previous stored value, an empty text falls
//! back to its placeholder. The progress percent is the one field with an
//! extra rule, clamped into `[0, 100]` at this boundary.

use crate::form::{coerce_i64, coerce_text, coerce_u64, FormFields};
use crate::models::{
    DetailEntry, DetailKind, Story, StoreData, DETAIL_DESCRIPTION_PLACEHOLDER,
    PROJECT_TITLE_PLACEHOLDER, STORY_DESCRIPTION_PLACEHOLDER, STORY_IMAGE_PLACEHOLDER,
    STORY_TITLE_PLACEHOLDER,
};
use crate::normalize::renumber_positions;

/// Apply a dashboard settings form to the store.
///
/// Numeric fields keep their previous value when the submitted one is
/// missing or not a non-negative integer. The project title falls back to
/// its placeholder when submitted empty; the sales points text keeps the
/// previous value instead, so a stray empty submit cannot wipe the list.
/// Stories named by a `story_id` field get their text fields updated from
/// the matching `story_title_<id>` family; ids that match no story are
/// ignored.
pub fn apply_update(store: &mut StoreData, form: &FormFields, now: &str) {
    let settings = &mut store.settings;

    settings.total_surplus = coerce_u64(form.first("total_surplus"), settings.total_surplus);
    settings.disks_sold = coerce_u64(form.first("disks_sold"), settings.disks_sold);
    settings.families_supported = coerce_u64(
        form.first("families_supported"),
        settings.families_supported,
    );
    settings.projects_launched =
        coerce_u64(form.first("projects_launched"), settings.projects_launched);
    settings.visitors_count = coerce_u64(form.first("visitors_count"), settings.visitors_count);
    settings.base_price = coerce_u64(form.first("base_price"), settings.base_price);
    settings.extra_price = coerce_u64(form.first("extra_price"), settings.extra_price);
    settings.project_title = coerce_text(form.first("project_title"), PROJECT_TITLE_PLACEHOLDER);
    settings.progress_percent = coerce_i64(
        form.first("progress_percent"),
        settings.progress_percent as i64,
    )
    .clamp(0, 100) as u64;
    settings.remaining_amount =
        coerce_u64(form.first("remaining_amount"), settings.remaining_amount);

    let previous_sales = settings.sales_points.clone();
    settings.sales_points = coerce_text(form.first("sales_points"), &previous_sales);
    settings.updated_at = now.to_string();

    for raw_id in form.all("story_id") {
        let id = match raw_id.parse::<u64>() {
            Ok(id) => id,
            Err(_) => continue,
        };
        let story = match store.stories.iter_mut().find(|story| story.id == id) {
            Some(story) => story,
            None => continue,
        };
        story.title = coerce_text(
            form.first(&format!("story_title_{id}")),
            STORY_TITLE_PLACEHOLDER,
        );
        story.description = coerce_text(
            form.first(&format!("story_description_{id}")),
            STORY_DESCRIPTION_PLACEHOLDER,
        );
        story.image_url = coerce_text(
            form.first(&format!("story_image_{id}")),
            STORY_IMAGE_PLACEHOLDER,
        );
    }

    renumber_positions(&mut store.stories);
}

/// Append a placeholder story and return its id.
///
/// The id is one past the highest id ever present in the list, so deleting
/// a story never causes its id to be handed out again within the same
/// record. The position slots in at the end of the dense range.
pub fn add_story(store: &mut StoreData) -> u64 {
    let id = store
        .stories
        .iter()
        .map(|story| story.id)
        .max()
        .unwrap_or(0)
        + 1;
    let position = store
        .stories
        .iter()
        .map(|story| story.position)
        .max()
        .unwrap_or(0)
        + 1;

    store.stories.push(Story {
        id,
        title: STORY_TITLE_PLACEHOLDER.to_string(),
        description: STORY_DESCRIPTION_PLACEHOLDER.to_string(),
        image_url: STORY_IMAGE_PLACEHOLDER.to_string(),
        position,
    });
    renumber_positions(&mut store.stories);
    id
}

/// Remove the story with the given id and close the position gap.
///
/// Returns whether a story was actually removed.
pub fn delete_story(store: &mut StoreData, id: u64) -> bool {
    let before = store.stories.len();
    store.stories.retain(|story| story.id != id);
    renumber_positions(&mut store.stories);
    store.stories.len() != before
}

/// Apply a ledger form to the entry list.
///
/// Entries named by a `detail_id` field get updated from the matching
/// `detail_description_<id>` family. The amount has a three-way rule: an
/// absent or unparsable field keeps the previous amount, while an
/// explicitly empty field clears it to the "no amount" state.
pub fn apply_details_update(details: &mut [DetailEntry], form: &FormFields) {
    for raw_id in form.all("detail_id") {
        let id = match raw_id.parse::<u64>() {
            Ok(id) => id,
            Err(_) => continue,
        };
        let entry = match details.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry,
            None => continue,
        };

        entry.description = coerce_text(
            form.first(&format!("detail_description_{id}")),
            DETAIL_DESCRIPTION_PLACEHOLDER,
        );
        if let Some(kind) = form
            .first(&format!("detail_kind_{id}"))
            .and_then(DetailKind::parse)
        {
            entry.kind = kind;
        }
        entry.amount = match form.first(&format!("detail_amount_{id}")) {
            None => entry.amount,
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    match trimmed.parse::<i64>() {
                        Ok(amount) => Some(amount),
                        Err(_) => entry.amount,
                    }
                }
            }
        };
    }
}

/// Append a placeholder ledger entry and return its id.
pub fn add_detail(details: &mut Vec<DetailEntry>, now: &str) -> u64 {
    let id = details.iter().map(|entry| entry.id).max().unwrap_or(0) + 1;
    details.push(DetailEntry {
        id,
        kind: DetailKind::default(),
        description: DETAIL_DESCRIPTION_PLACEHOLDER.to_string(),
        amount: None,
        created_at: now.to_string(),
    });
    id
}

/// Remove the ledger entry with the given id.
///
/// Returns whether an entry was actually removed.
pub fn delete_detail(details: &mut Vec<DetailEntry>, id: u64) -> bool {
    let before = details.len();
    details.retain(|entry| entry.id != id);
    details.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_store;

    const NOW: &str = "2024-06-01T00:00:00Z";

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::from(
            pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_update_applies_valid_numbers() {
        let mut store = default_store(NOW);
        apply_update(
            &mut store,
            &form(&[("total_surplus", "20000"), ("disks_sold", "6000")]),
            NOW,
        );
        assert_eq!(store.settings.total_surplus, 20000);
        assert_eq!(store.settings.disks_sold, 6000);
    }

    #[test]
    fn test_non_numeric_keeps_previous_not_default() {
        let mut store = default_store(NOW);
        store.settings.total_surplus = 99999;
        apply_update(&mut store, &form(&[("total_surplus", "abc")]), NOW);
        assert_eq!(
            store.settings.total_surplus, 99999,
            "a bad submit must keep the stored value, not reset it"
        );

        apply_update(&mut store, &form(&[("total_surplus", "")]), NOW);
        assert_eq!(store.settings.total_surplus, 99999);
    }

    #[test]
    fn test_percent_clamps_at_write_boundary() {
        let mut store = default_store(NOW);

        apply_update(&mut store, &form(&[("progress_percent", "-5")]), NOW);
        assert_eq!(store.settings.progress_percent, 0);

        apply_update(&mut store, &form(&[("progress_percent", "150")]), NOW);
        assert_eq!(store.settings.progress_percent, 100);

        apply_update(&mut store, &form(&[("progress_percent", "57")]), NOW);
        assert_eq!(store.settings.progress_percent, 57);
    }

    #[test]
    fn test_empty_title_gets_placeholder() {
        let mut store = default_store(NOW);
        apply_update(&mut store, &form(&[("project_title", "   ")]), NOW);
        assert_eq!(store.settings.project_title, PROJECT_TITLE_PLACEHOLDER);
    }

    #[test]
    fn test_empty_sales_points_keeps_previous() {
        let mut store = default_store(NOW);
        let original = store.settings.sales_points.clone();
        apply_update(&mut store, &form(&[("sales_points", "")]), NOW);
        assert_eq!(store.settings.sales_points, original);
    }

    #[test]
    fn test_update_stamps_updated_at() {
        let mut store = default_store(NOW);
        apply_update(&mut store, &form(&[]), "2024-07-01T00:00:00Z");
        assert_eq!(store.settings.updated_at, "2024-07-01T00:00:00Z");
    }

    #[test]
    fn test_story_fields_update_by_id() {
        let mut store = default_store(NOW);
        apply_update(
            &mut store,
            &form(&[
                ("story_id", "2"),
                ("story_title_2", "عنوان جديد"),
                ("story_description_2", ""),
                ("story_image_2", "/new.png"),
            ]),
            NOW,
        );
        let story = store.stories.iter().find(|s| s.id == 2).unwrap();
        assert_eq!(story.title, "عنوان جديد");
        assert_eq!(story.description, STORY_DESCRIPTION_PLACEHOLDER);
        assert_eq!(story.image_url, "/new.png");
    }

    #[test]
    fn test_unknown_story_id_is_ignored() {
        let mut store = default_store(NOW);
        let before = store.clone();
        apply_update(
            &mut store,
            &form(&[("story_id", "42"), ("story_title_42", "x")]),
            NOW,
        );
        assert_eq!(store.stories, before.stories);
    }

    #[test]
    fn test_add_story_extends_dense_range() {
        let mut store = default_store(NOW);
        let id = add_story(&mut store);
        assert_eq!(id, 4);
        assert_eq!(store.stories.len(), 4);
        assert_eq!(store.stories[3].id, 4);
        assert_eq!(store.stories[3].position, 4);
        assert_eq!(store.stories[3].title, STORY_TITLE_PLACEHOLDER);
    }

    #[test]
    fn test_delete_story_renumbers_remaining() {
        let mut store = default_store(NOW);
        add_story(&mut store);
        assert!(delete_story(&mut store, 2));

        let ids: Vec<u64> = store.stories.iter().map(|s| s.id).collect();
        let positions: Vec<u64> = store.stories.iter().map(|s| s.position).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_deleted_id_is_never_reused() {
        let mut store = default_store(NOW);
        assert!(delete_story(&mut store, 3));
        let id = add_story(&mut store);
        assert_eq!(id, 3, "max+1 over remaining ids 1,2");

        assert!(delete_story(&mut store, 1));
        let id = add_story(&mut store);
        assert_eq!(id, 4, "highest id still present is 3");
    }

    #[test]
    fn test_delete_missing_story_is_noop() {
        let mut store = default_store(NOW);
        assert!(!delete_story(&mut store, 42));
        assert_eq!(store.stories.len(), 3);
    }

    #[test]
    fn test_detail_update_amount_three_way() {
        let mut details = Vec::new();
        add_detail(&mut details, NOW);
        details[0].amount = Some(500);

        // Absent field keeps the previous amount.
        apply_details_update(
            &mut details,
            &form(&[("detail_id", "1"), ("detail_description_1", "شراء قمح")]),
        );
        assert_eq!(details[0].amount, Some(500));

        // Unparsable keeps the previous amount.
        apply_details_update(
            &mut details,
            &form(&[("detail_id", "1"), ("detail_amount_1", "كثير")]),
        );
        assert_eq!(details[0].amount, Some(500));

        // Explicitly empty clears it.
        apply_details_update(
            &mut details,
            &form(&[("detail_id", "1"), ("detail_amount_1", "")]),
        );
        assert_eq!(details[0].amount, None);
    }

    #[test]
    fn test_detail_update_kind_and_description() {
        let mut details = Vec::new();
        add_detail(&mut details, NOW);

        apply_details_update(
            &mut details,
            &form(&[
                ("detail_id", "1"),
                ("detail_kind_1", "in-kind"),
                ("detail_description_1", "دعم من مخبز"),
            ]),
        );
        assert_eq!(details[0].kind, DetailKind::InKind);
        assert_eq!(details[0].description, "دعم من مخبز");

        // An unknown kind keeps the previous one.
        apply_details_update(
            &mut details,
            &form(&[("detail_id", "1"), ("detail_kind_1", "refund")]),
        );
        assert_eq!(details[0].kind, DetailKind::InKind);
    }

    #[test]
    fn test_detail_add_and_delete() {
        let mut details = Vec::new();
        assert_eq!(add_detail(&mut details, NOW), 1);
        assert_eq!(add_detail(&mut details, NOW), 2);
        assert!(delete_detail(&mut details, 1));
        assert_eq!(add_detail(&mut details, NOW), 3, "ids are never reused");
        assert!(!delete_detail(&mut details, 99));
    }
}
