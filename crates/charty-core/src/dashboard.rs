//! Read path for the public dashboard.
//!
//! One query serves both page renders and the visitor counter: callers ask
//! for the record and opt into counting the request as a visit. The
//! counter bump is best effort; a backend that cannot persist it must not
//! take the public page down, so the save failure is logged and the
//! incremented record is still returned.

use anyhow::Result;
use tracing::warn;

use crate::models::StoreData;
use crate::store::StoreBackend;

/// Load the dashboard record, optionally counting this call as one visit.
///
/// With `increment_visitors` set, the visitor counter goes up by exactly
/// one and the record is saved back. `updated_at` is left alone; it tracks
/// admin edits, not traffic.
pub async fn get_dashboard_data<S: StoreBackend + ?Sized>(
    store: &S,
    increment_visitors: bool,
) -> Result<StoreData> {
    let mut data = store.load_store().await?;
    if increment_visitors {
        data.settings.visitors_count += 1;
        if let Err(err) = store.save_store(&data).await {
            warn!("Failed to persist visitor count: {:#}", err);
        }
    }
    Ok(data)
}
