//! Store statistics overview.
//!
//! Prints a quick summary of the dashboard record and the ledger: counter
//! values, story count, and a per-kind breakdown of ledger entries. Used by
//! `charty stats` to check what the store holds without opening the admin
//! panel.

use anyhow::Result;

use charty_core::models::{DetailEntry, DetailKind};

use crate::config::Config;
use crate::db;
use crate::file_store::{DETAILS_FILE, STORE_FILE};

/// Per-kind breakdown of ledger entries.
struct KindStats {
    kind: DetailKind,
    entry_count: usize,
    cash_total: i64,
    non_cash_count: usize,
}

fn kind_stats(details: &[DetailEntry]) -> Vec<KindStats> {
    [DetailKind::Income, DetailKind::Expense, DetailKind::InKind]
        .into_iter()
        .map(|kind| {
            let entries = details.iter().filter(|entry| entry.kind == kind);
            let mut stats = KindStats {
                kind,
                entry_count: 0,
                cash_total: 0,
                non_cash_count: 0,
            };
            for entry in entries {
                stats.entry_count += 1;
                match entry.amount {
                    Some(amount) => stats.cash_total += amount,
                    None => stats.non_cash_count += 1,
                }
            }
            stats
        })
        .collect()
}

/// Total on-disk size of the backing files for the configured backend.
fn store_size(config: &Config) -> u64 {
    let paths = match config.store.backend.as_str() {
        "sqlite" => vec![db::db_path(config)],
        _ => vec![
            config.store.data_dir.join(STORE_FILE),
            config.store.data_dir.join(DETAILS_FILE),
        ],
    };
    paths
        .iter()
        .map(|path| std::fs::metadata(path).map(|m| m.len()).unwrap_or(0))
        .sum()
}

/// Run the stats command: load the store and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let store = db::build_store(config).await?;
    let data = store.load_store().await?;
    let details = store.load_details().await?;
    let settings = &data.settings;

    println!("Charty — Store Stats");
    println!("====================");
    println!();
    println!(
        "  Backend:         {} ({})",
        config.store.backend,
        config.store.data_dir.display()
    );
    println!("  Size:            {}", format_bytes(store_size(config)));
    println!();
    println!("  Visitors:        {}", settings.visitors_count);
    println!("  Total surplus:   {}", settings.total_surplus);
    println!("  Disks sold:      {}", settings.disks_sold);
    println!("  Families:        {}", settings.families_supported);
    println!("  Projects:        {}", settings.projects_launched);
    println!(
        "  Progress:        {}% ({})",
        settings.progress_percent, settings.project_title
    );
    println!("  Remaining:       {}", settings.remaining_amount);
    println!();
    println!("  Stories:         {}", data.stories.len());
    println!("  Ledger entries:  {}", details.len());
    println!("  Last update:     {}", settings.updated_at);

    let breakdown = kind_stats(&details);
    if details.is_empty() {
        println!();
        return Ok(());
    }

    println!();
    println!("  By kind:");
    println!(
        "  {:<10} {:>8} {:>12} {:>10}",
        "KIND", "ENTRIES", "CASH TOTAL", "NON-CASH"
    );
    println!("  {}", "-".repeat(44));
    for stats in &breakdown {
        println!(
            "  {:<10} {:>8} {:>12} {:>10}",
            stats.kind.as_str(),
            stats.entry_count,
            stats.cash_total,
            stats.non_cash_count
        );
    }
    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, kind: DetailKind, amount: Option<i64>) -> DetailEntry {
        DetailEntry {
            id,
            kind,
            description: "بند".to_string(),
            amount,
            created_at: "2024-06-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_kind_stats_sums_cash_and_counts_non_cash() {
        let details = vec![
            entry(1, DetailKind::Income, Some(2000)),
            entry(2, DetailKind::Income, Some(500)),
            entry(3, DetailKind::Expense, Some(300)),
            entry(4, DetailKind::InKind, None),
        ];
        let stats = kind_stats(&details);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].entry_count, 2);
        assert_eq!(stats[0].cash_total, 2500);
        assert_eq!(stats[1].cash_total, 300);
        assert_eq!(stats[2].entry_count, 1);
        assert_eq!(stats[2].non_cash_count, 1);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
