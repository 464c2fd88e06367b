//! SQLite-backed [`StoreBackend`] implementation.
//!
//! The schema guarantees the numeric typing, so loads only run the typed
//! repair pass (empty text, sparse positions, bad timestamps) and persist
//! the result when something had to change. A database without a settings
//! row gets seeded with the default record on first load. A read failure
//! is treated the same as an absent record, and a failed seed or heal
//! write is logged rather than returned, so only explicit saves surface
//! storage errors.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::warn;

use charty_core::models::{
    default_store, now_stamp, DetailEntry, DetailKind, Settings, Story, StoreData,
};
use charty_core::normalize::{repair_details, repair_store};
use charty_core::store::StoreBackend;

/// SQLite implementation of the [`StoreBackend`] trait.
///
/// Wraps a [`SqlitePool`] and maps each operation onto the settings,
/// stories, and details tables. Saves replace whole tables inside one
/// transaction, matching the trait's whole-record contract.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn read_store(&self) -> Result<Option<StoreData>> {
        let settings_row = sqlx::query(
            "SELECT total_surplus, disks_sold, families_supported, projects_launched, visitors_count, base_price, extra_price, project_title, progress_percent, remaining_amount, sales_points, updated_at FROM settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let settings_row = match settings_row {
            Some(row) => row,
            None => return Ok(None),
        };

        let settings = Settings {
            total_surplus: column_u64(&settings_row, "total_surplus"),
            disks_sold: column_u64(&settings_row, "disks_sold"),
            families_supported: column_u64(&settings_row, "families_supported"),
            projects_launched: column_u64(&settings_row, "projects_launched"),
            visitors_count: column_u64(&settings_row, "visitors_count"),
            base_price: column_u64(&settings_row, "base_price"),
            extra_price: column_u64(&settings_row, "extra_price"),
            project_title: settings_row.get("project_title"),
            progress_percent: column_u64(&settings_row, "progress_percent"),
            remaining_amount: column_u64(&settings_row, "remaining_amount"),
            sales_points: settings_row.get("sales_points"),
            updated_at: settings_row.get("updated_at"),
        };

        let story_rows = sqlx::query(
            "SELECT id, title, description, image_url, position FROM stories ORDER BY position ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let stories: Vec<Story> = story_rows
            .iter()
            .map(|row| Story {
                id: column_u64(row, "id"),
                title: row.get("title"),
                description: row.get("description"),
                image_url: row.get("image_url"),
                position: column_u64(row, "position"),
            })
            .collect();

        Ok(Some(StoreData { settings, stories }))
    }

    async fn write_store(&self, data: &StoreData) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let settings = &data.settings;
        sqlx::query(
            r#"
            INSERT INTO settings (id, total_surplus, disks_sold, families_supported,
                                  projects_launched, visitors_count, base_price, extra_price,
                                  project_title, progress_percent, remaining_amount,
                                  sales_points, updated_at)
            VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                total_surplus = excluded.total_surplus,
                disks_sold = excluded.disks_sold,
                families_supported = excluded.families_supported,
                projects_launched = excluded.projects_launched,
                visitors_count = excluded.visitors_count,
                base_price = excluded.base_price,
                extra_price = excluded.extra_price,
                project_title = excluded.project_title,
                progress_percent = excluded.progress_percent,
                remaining_amount = excluded.remaining_amount,
                sales_points = excluded.sales_points,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(settings.total_surplus as i64)
        .bind(settings.disks_sold as i64)
        .bind(settings.families_supported as i64)
        .bind(settings.projects_launched as i64)
        .bind(settings.visitors_count as i64)
        .bind(settings.base_price as i64)
        .bind(settings.extra_price as i64)
        .bind(&settings.project_title)
        .bind(settings.progress_percent as i64)
        .bind(settings.remaining_amount as i64)
        .bind(&settings.sales_points)
        .bind(&settings.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM stories").execute(&mut *tx).await?;

        for story in &data.stories {
            sqlx::query(
                "INSERT INTO stories (id, title, description, image_url, position) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(story.id as i64)
            .bind(&story.title)
            .bind(&story.description)
            .bind(&story.image_url)
            .bind(story.position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Read an INTEGER column as u64; hand-edited negative values clamp to 0.
fn column_u64(row: &sqlx::sqlite::SqliteRow, column: &str) -> u64 {
    let value: i64 = row.get(column);
    value.max(0) as u64
}

#[async_trait]
impl StoreBackend for SqliteStore {
    async fn load_store(&self) -> Result<StoreData> {
        let now = now_stamp();

        let raw = match self.read_store().await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Failed to read record, treating as absent: {:#}", err);
                None
            }
        };

        let mut data = match raw {
            Some(data) => data,
            None => {
                let data = default_store(&now);
                if let Err(err) = self.write_store(&data).await {
                    warn!("Failed to persist seeded record: {:#}", err);
                }
                return Ok(data);
            }
        };

        if repair_store(&mut data, &now) {
            if let Err(err) = self.write_store(&data).await {
                warn!("Failed to persist repaired record: {:#}", err);
            }
        }

        Ok(data)
    }

    async fn save_store(&self, data: &StoreData) -> Result<()> {
        self.write_store(data).await
    }

    async fn load_details(&self) -> Result<Vec<DetailEntry>> {
        let mut changed = false;
        let rows = match sqlx::query(
            "SELECT id, kind, description, amount, created_at FROM details ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        {
            Ok(rows) => rows,
            Err(err) => {
                warn!("Failed to read ledger, treating as absent: {:#}", err);
                changed = true;
                Vec::new()
            }
        };

        let mut details: Vec<DetailEntry> = rows
            .iter()
            .map(|row| {
                let raw_kind: String = row.get("kind");
                let kind = match DetailKind::parse(&raw_kind) {
                    Some(kind) => kind,
                    None => {
                        changed = true;
                        DetailKind::default()
                    }
                };
                DetailEntry {
                    id: column_u64(row, "id"),
                    kind,
                    description: row.get("description"),
                    amount: row.get("amount"),
                    created_at: row.get("created_at"),
                }
            })
            .collect();

        let now = now_stamp();
        if repair_details(&mut details, &now) || changed {
            if let Err(err) = self.save_details(&details).await {
                warn!("Failed to persist repaired ledger: {:#}", err);
            }
        }

        Ok(details)
    }

    async fn save_details(&self, details: &[DetailEntry]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM details").execute(&mut *tx).await?;

        for entry in details {
            sqlx::query(
                "INSERT INTO details (id, kind, description, amount, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(entry.id as i64)
            .bind(entry.kind.as_str())
            .bind(&entry.description)
            .bind(entry.amount)
            .bind(&entry.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
