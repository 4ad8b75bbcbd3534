//! Inventory analytics pipeline
//!
//! The one-shot batch transform behind the summary endpoint: group the
//! catalog, window the facts, derive the metrics. Stages run strictly in
//! that order and share nothing but their outputs, so the whole computation
//! is a pure function of the loaded snapshot, the two horizon parameters,
//! and the evaluation date.

pub mod group;
pub mod math;
pub mod summary;
pub mod window;

use crate::db::sqlite::models::CatalogSnapshot;
use chrono::{NaiveDate, Utc};

pub use summary::ProductGroupSummary;

/// Compute the per-product-group summary, evaluated as of now
pub fn compute_summary(
    snapshot: &CatalogSnapshot,
    days: u32,
    days_to_predict: u32,
) -> Vec<ProductGroupSummary> {
    compute_summary_at(snapshot, days, days_to_predict, Utc::now().date_naive())
}

/// Compute the summary against a fixed evaluation date.
///
/// Identical inputs and the same `today` always produce identical output;
/// only `days_since_launch` and its dependent rates move as the clock does.
pub fn compute_summary_at(
    snapshot: &CatalogSnapshot,
    days: u32,
    days_to_predict: u32,
    today: NaiveDate,
) -> Vec<ProductGroupSummary> {
    let (groups, index) = group::build_groups(&snapshot.items, &snapshot.sale_bounds, days);
    let windowed = window::aggregate_window(&groups, &index, &snapshot.sales, &snapshot.engagement);

    summary::derive_rows(
        &groups,
        &windowed,
        &index,
        &snapshot.sales,
        &snapshot.engagement,
        &snapshot.sale_bounds,
        days,
        days_to_predict,
        today,
    )
}
