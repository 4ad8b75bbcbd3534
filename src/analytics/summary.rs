//! Metric derivation and the summary output row
//!
//! Combines the windowed sums with all-time sums and item attributes into
//! the final per-group analytics row. Every derivation is a pure function of
//! the group's aggregates; divisions resolve indeterminate results to 0
//! through `safe_div`, with one documented exception
//! (`Projected_Days_to_Sellout`, which stays null on a zero rate).

use crate::analytics::group::ProductGroup;
use crate::analytics::math::{finite_or_zero, round2, safe_div};
use crate::analytics::window::WindowTotals;
use crate::db::sqlite::models::{EngagementRecord, SaleDateBounds, SaleRecord};
use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// One output row: the analytics summary for a product group
#[derive(Debug, Clone, PartialEq)]
pub struct ProductGroupSummary {
    /// Minimum item id within the group
    pub item_id: i64,
    pub item_name: String,
    pub item_type: String,
    pub category: String,
    /// Distinct batch labels, comma-delimited
    pub batch: String,
    pub launch_date: NaiveDate,
    pub current_stock: i64,
    pub current_stock_value: f64,
    /// Quantity sold within the observation window
    pub quantity_sold: i64,
    /// Sum of sale total values within the observation window
    pub sold_quantity_value: f64,
    pub alltime_total_quantity: i64,
    pub alltime_total_quantity_value: f64,
    pub total_stock: i64,
    pub total_stock_value: f64,
    pub stock_sold_percentage: f64,
    pub total_stock_sold_percentage: f64,
    pub items_viewed: i64,
    pub alltime_items_viewed: i64,
    pub perday_view: f64,
    pub alltime_perday_view: f64,
    pub items_addedtocart: i64,
    pub alltime_items_addedtocart: i64,
    pub perday_atc: f64,
    pub alltime_perday_atc: f64,
    pub days_since_launch: i64,
    pub last_sold_date: Option<NaiveDate>,
    pub days_sold_out_past: i64,
    pub alltime_perday_quantity: f64,
    /// Null when the sell rate is 0: runway is unknown, not "today"
    pub projected_days_to_sellout: Option<f64>,
    pub predicted_quantity: f64,
    /// Horizon in days; parameterizes the predicted-quantity column name
    pub prediction_horizon_days: u32,
    pub sale_price_after_discount: f64,
    /// Distinct discount percentages, comma-delimited
    pub sale_discounts: String,
}

// Hand-written because one column name carries the projection horizon
// (`Predicted_Quantity_Next{N}Days`). Column order is part of the API
// contract and must match the field order above.
impl Serialize for ProductGroupSummary {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(32))?;
        map.serialize_entry("Item_Id", &self.item_id)?;
        map.serialize_entry("Item_Name", &self.item_name)?;
        map.serialize_entry("Item_Type", &self.item_type)?;
        map.serialize_entry("Category", &self.category)?;
        map.serialize_entry("__Batch", &self.batch)?;
        map.serialize_entry("__Launch_Date", &iso_date(self.launch_date))?;
        map.serialize_entry("Current_Stock", &self.current_stock)?;
        map.serialize_entry("Current_Stock_Value", &self.current_stock_value)?;
        map.serialize_entry("Quantity_sold", &self.quantity_sold)?;
        map.serialize_entry("Sold_Quantity_Value", &self.sold_quantity_value)?;
        map.serialize_entry("Alltime_Total_Quantity", &self.alltime_total_quantity)?;
        map.serialize_entry(
            "Alltime_Total_Quantity_Value",
            &self.alltime_total_quantity_value,
        )?;
        map.serialize_entry("Total_Stock", &self.total_stock)?;
        map.serialize_entry("Total_Stock_Value", &self.total_stock_value)?;
        map.serialize_entry("Stock_Sold_Percentage", &self.stock_sold_percentage)?;
        map.serialize_entry(
            "Total_Stock_Sold_Percentage",
            &self.total_stock_sold_percentage,
        )?;
        map.serialize_entry("Items_Viewed", &self.items_viewed)?;
        map.serialize_entry("Alltime_Items_Viewed", &self.alltime_items_viewed)?;
        map.serialize_entry("perday_view", &self.perday_view)?;
        map.serialize_entry("Alltime_perday_View", &self.alltime_perday_view)?;
        map.serialize_entry("Items_Addedtocart", &self.items_addedtocart)?;
        map.serialize_entry("Alltime_Items_Addedtocart", &self.alltime_items_addedtocart)?;
        map.serialize_entry("perday_atc", &self.perday_atc)?;
        map.serialize_entry("Alltime_perday_atc", &self.alltime_perday_atc)?;
        map.serialize_entry("days_since_launch", &self.days_since_launch)?;
        map.serialize_entry("Last_Sold_Date", &self.last_sold_date.map(iso_date))?;
        map.serialize_entry("Days_Sold_Out_Past", &self.days_sold_out_past)?;
        map.serialize_entry("Alltime_perday_Quantity", &self.alltime_perday_quantity)?;
        map.serialize_entry(
            "Projected_Days_to_Sellout",
            &self.projected_days_to_sellout,
        )?;
        map.serialize_entry(
            &format!(
                "Predicted_Quantity_Next{}Days",
                self.prediction_horizon_days
            ),
            &self.predicted_quantity,
        )?;
        map.serialize_entry("Sale_Price_After_Discount", &self.sale_price_after_discount)?;
        map.serialize_entry("Sale_Discounts", &self.sale_discounts)?;
        map.end()
    }
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// All-time (unwindowed) sums for one product group
#[derive(Debug, Clone, Copy, Default)]
struct AlltimeTotals {
    quantity: i64,
    items_viewed: i64,
    items_addedtocart: i64,
}

fn aggregate_alltime(
    group_count: usize,
    index: &HashMap<i64, usize>,
    sales: &[SaleRecord],
    engagement: &[EngagementRecord],
) -> Vec<AlltimeTotals> {
    let mut totals = vec![AlltimeTotals::default(); group_count];

    for sale in sales {
        if let Some(pos) = index.get(&sale.item_id) {
            totals[*pos].quantity += sale.quantity;
        }
    }
    for record in engagement {
        if let Some(pos) = index.get(&record.item_id) {
            totals[*pos].items_viewed += record.items_viewed;
            totals[*pos].items_addedtocart += record.items_addedtocart;
        }
    }

    totals
}

/// Derive the summary rows from the grouped and windowed aggregates.
///
/// `today` is the evaluation date; rows come back sorted ascending by the
/// group's minimum item id.
#[allow(clippy::too_many_arguments)]
pub fn derive_rows(
    groups: &[ProductGroup],
    windowed: &[WindowTotals],
    index: &HashMap<i64, usize>,
    sales: &[SaleRecord],
    engagement: &[EngagementRecord],
    sale_bounds: &HashMap<i64, SaleDateBounds>,
    days: u32,
    days_to_predict: u32,
    today: NaiveDate,
) -> Vec<ProductGroupSummary> {
    let alltime = aggregate_alltime(groups.len(), index, sales, engagement);

    let mut rows: Vec<ProductGroupSummary> = groups
        .iter()
        .zip(windowed.iter().zip(alltime.iter()))
        .map(|(group, (window, alltime))| {
            derive_row(group, window, alltime, sale_bounds, days, days_to_predict, today)
        })
        .collect();

    rows.sort_by_key(|row| row.item_id);
    rows
}

fn derive_row(
    group: &ProductGroup,
    window: &WindowTotals,
    alltime: &AlltimeTotals,
    sale_bounds: &HashMap<i64, SaleDateBounds>,
    days: u32,
    days_to_predict: u32,
    today: NaiveDate,
) -> ProductGroupSummary {
    let alltime_quantity = alltime.quantity;
    let total_stock = group.current_stock + alltime_quantity;

    let stock_sold_percentage =
        round2(safe_div(window.quantity_sold as f64, total_stock as f64) * 100.0);
    let total_stock_sold_percentage =
        round2(safe_div(alltime_quantity as f64, total_stock as f64) * 100.0);

    let days_since_launch = (today - group.launch_date).num_days();

    let last_sold_date = group
        .member_ids
        .iter()
        .filter_map(|id| sale_bounds.get(id).map(|b| b.last_sold))
        .max();

    let days_sold_out_past = if group.current_stock == 0 {
        last_sold_date
            .map(|last| (last - group.launch_date).num_days())
            .unwrap_or(0)
    } else {
        0
    };

    // The zero-quantity branch rates against the sold-out span, not the
    // launch age. TODO: confirm with the reporting owners whether it should
    // use days_since_launch like the non-zero branch.
    let alltime_perday_quantity = if alltime_quantity == 0 {
        round2(safe_div(
            alltime_quantity as f64,
            days_sold_out_past as f64,
        ))
    } else {
        round2(safe_div(alltime_quantity as f64, days_since_launch as f64))
    };

    let unit_net_price = group.mean_sale_price * (100.0 - group.mean_sale_discount) / 100.0;
    let current_stock_value = round2(finite_or_zero(group.current_stock as f64 * unit_net_price));
    let alltime_total_quantity_value =
        round2(finite_or_zero(alltime_quantity as f64 * unit_net_price));
    let total_stock_value = round2(finite_or_zero(total_stock as f64 * unit_net_price));

    let alltime_perday_view = round2(safe_div(
        alltime.items_viewed as f64,
        days_since_launch as f64,
    ));
    let alltime_perday_atc = round2(safe_div(
        alltime.items_addedtocart as f64,
        days_since_launch as f64,
    ));

    // Recent groups have lived fewer days than the window is long; rate
    // against the days actually elapsed in that case.
    let window_days = if days_since_launch > days as i64 {
        days as i64
    } else {
        days_since_launch
    };
    let perday_view = round2(safe_div(window.items_viewed as f64, window_days as f64));
    let perday_atc = round2(safe_div(window.items_addedtocart as f64, window_days as f64));

    // Deliberately not routed through safe_div: a zero rate means the runway
    // is unknown, and null says that better than a fabricated 0.
    let projected_days_to_sellout = if alltime_perday_quantity == 0.0 {
        None
    } else {
        Some(round2(
            group.current_stock as f64 / alltime_perday_quantity,
        ))
    };

    let predicted_quantity = if group.current_stock != 0 {
        round2(alltime_perday_quantity * days_to_predict as f64)
    } else {
        0.0
    };

    let sale_discounts = group
        .sale_discounts
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    ProductGroupSummary {
        item_id: group.min_item_id,
        item_name: group.key.item_name.clone(),
        item_type: group.key.item_type.clone(),
        category: group.key.category.clone(),
        batch: group.batches.join(", "),
        launch_date: group.launch_date,
        current_stock: group.current_stock,
        current_stock_value,
        quantity_sold: window.quantity_sold,
        sold_quantity_value: round2(window.sold_value),
        alltime_total_quantity: alltime_quantity,
        alltime_total_quantity_value,
        total_stock,
        total_stock_value,
        stock_sold_percentage,
        total_stock_sold_percentage,
        items_viewed: window.items_viewed,
        alltime_items_viewed: alltime.items_viewed,
        perday_view,
        alltime_perday_view,
        items_addedtocart: window.items_addedtocart,
        alltime_items_addedtocart: alltime.items_addedtocart,
        perday_atc,
        alltime_perday_atc,
        days_since_launch,
        last_sold_date,
        days_sold_out_past,
        alltime_perday_quantity,
        projected_days_to_sellout,
        predicted_quantity,
        prediction_horizon_days: days_to_predict,
        sale_price_after_discount: round2(group.mean_net_price),
        sale_discounts,
    }
}
