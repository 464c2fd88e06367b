use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    // Create settings table (single row, id pinned to 1)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            total_surplus INTEGER NOT NULL DEFAULT 0,
            disks_sold INTEGER NOT NULL DEFAULT 0,
            families_supported INTEGER NOT NULL DEFAULT 0,
            projects_launched INTEGER NOT NULL DEFAULT 0,
            visitors_count INTEGER NOT NULL DEFAULT 0,
            base_price INTEGER NOT NULL DEFAULT 12,
            extra_price INTEGER NOT NULL DEFAULT 1000,
            project_title TEXT NOT NULL DEFAULT '',
            progress_percent INTEGER NOT NULL DEFAULT 0,
            remaining_amount INTEGER NOT NULL DEFAULT 0,
            sales_points TEXT NOT NULL DEFAULT '',
            updated_at TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(&pool)
    .await?;

    // Create stories table; ids and positions are assigned by the app
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stories (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            image_url TEXT NOT NULL,
            position INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    // Create details table (the income/expense ledger)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS details (
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL DEFAULT 'income',
            description TEXT NOT NULL,
            amount INTEGER,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    // Create indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_stories_position ON stories(position)")
        .execute(&pool)
        .await?;

    pool.close().await;
    Ok(())
}
