//! SQLite database models
//!
//! Row types for the three catalog tables, plus the auxiliary sale-date
//! bounds the loader derives from `sales`. These are read-only snapshots:
//! the analytics pipeline never writes back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog item (one physical batch/variant of a product)
///
/// Multiple items may share the same (item_name, item_type, category) —
/// those form one product group in the summary output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub item_id: i64,
    pub item_name: String,
    pub item_type: String,
    pub category: String,
    pub current_stock: i64,
    /// Missing for items that went on sale before cataloging was in place;
    /// backfilled from the first sale date during grouping.
    pub launch_date: Option<NaiveDate>,
    pub sale_price: i64,
    /// Percent, 0-100
    pub sale_discount: i64,
    pub batch: String,
}

/// One recorded sale of an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub item_id: i64,
    pub date: NaiveDate,
    pub quantity: i64,
    pub total_value: f64,
}

/// Daily web engagement counters for an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementRecord {
    pub item_id: i64,
    pub date: NaiveDate,
    pub items_viewed: i64,
    pub items_addedtocart: i64,
}

/// First/last sale date for one item, aggregated from `sales`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleDateBounds {
    pub first_sold: NaiveDate,
    pub last_sold: NaiveDate,
}

/// Everything the summary computation reads, fetched in one pass
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub items: Vec<ItemRecord>,
    pub sales: Vec<SaleRecord>,
    pub engagement: Vec<EngagementRecord>,
    /// Keyed by item id; items with no sales are absent
    pub sale_bounds: HashMap<i64, SaleDateBounds>,
}

/// Distinct attribute values across the catalog, for filter dropdowns
#[derive(Debug, Clone, Serialize)]
pub struct DistinctValues {
    #[serde(rename = "Item_Name")]
    pub item_names: Vec<String>,
    #[serde(rename = "Item_Type")]
    pub item_types: Vec<String>,
    #[serde(rename = "Category")]
    pub categories: Vec<String>,
    #[serde(rename = "__Batch")]
    pub batches: Vec<String>,
}
