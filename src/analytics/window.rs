//! Windowed aggregation of sales and engagement
//!
//! Filters each record into its group's own observation window and sums the
//! metrics. The filter is per group, not global: two groups launched a month
//! apart scope "the first N days" to different calendar ranges.

use crate::analytics::group::ProductGroup;
use crate::db::sqlite::models::{EngagementRecord, SaleRecord};
use std::collections::HashMap;

/// Windowed sums for one product group
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowTotals {
    pub quantity_sold: i64,
    pub sold_value: f64,
    pub items_viewed: i64,
    pub items_addedtocart: i64,
}

/// Sum sales and engagement inside each group's window.
///
/// Returns one entry per group, parallel to `groups`. Records referencing an
/// item outside every group are dropped; groups with nothing in-window keep
/// zeroed totals.
pub fn aggregate_window(
    groups: &[ProductGroup],
    index: &HashMap<i64, usize>,
    sales: &[SaleRecord],
    engagement: &[EngagementRecord],
) -> Vec<WindowTotals> {
    let mut totals = vec![WindowTotals::default(); groups.len()];

    for sale in sales {
        let pos = match index.get(&sale.item_id) {
            Some(pos) => *pos,
            None => continue,
        };
        let group = &groups[pos];
        if sale.date >= group.window_start && sale.date <= group.window_end {
            totals[pos].quantity_sold += sale.quantity;
            totals[pos].sold_value += sale.total_value;
        }
    }

    for record in engagement {
        let pos = match index.get(&record.item_id) {
            Some(pos) => *pos,
            None => continue,
        };
        let group = &groups[pos];
        if record.date >= group.window_start && record.date <= group.window_end {
            totals[pos].items_viewed += record.items_viewed;
            totals[pos].items_addedtocart += record.items_addedtocart;
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::group::build_groups;
    use crate::db::sqlite::models::ItemRecord;
    use chrono::NaiveDate;

    fn item(id: i64, name: &str, launch: &str) -> ItemRecord {
        ItemRecord {
            item_id: id,
            item_name: name.to_string(),
            item_type: "Tshirt".to_string(),
            category: "Menswear".to_string(),
            current_stock: 10,
            launch_date: Some(launch.parse().unwrap()),
            sale_price: 1000,
            sale_discount: 0,
            batch: "B1".to_string(),
        }
    }

    fn sale(item_id: i64, date: &str, quantity: i64, value: f64) -> SaleRecord {
        SaleRecord {
            item_id,
            date: date.parse::<NaiveDate>().unwrap(),
            quantity,
            total_value: value,
        }
    }

    fn views(item_id: i64, date: &str, viewed: i64, atc: i64) -> EngagementRecord {
        EngagementRecord {
            item_id,
            date: date.parse::<NaiveDate>().unwrap(),
            items_viewed: viewed,
            items_addedtocart: atc,
        }
    }

    #[test]
    fn test_per_group_windows_scope_independently() {
        // Two groups launched a month apart, same window length
        let items = vec![
            item(1, "Crew Neck", "2024-01-01"),
            item(2, "V Neck", "2024-02-01"),
        ];
        let (groups, index) = build_groups(&items, &Default::default(), 10);

        let sales = vec![
            sale(1, "2024-01-05", 3, 300.0),  // inside group 1 window
            sale(1, "2024-02-05", 4, 400.0),  // outside group 1 window
            sale(2, "2024-02-05", 7, 700.0),  // inside group 2 window
        ];

        let totals = aggregate_window(&groups, &index, &sales, &[]);
        assert_eq!(totals[0].quantity_sold, 3);
        assert_eq!(totals[0].sold_value, 300.0);
        assert_eq!(totals[1].quantity_sold, 7);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let items = vec![item(1, "Crew Neck", "2024-01-01")];
        let (groups, index) = build_groups(&items, &Default::default(), 10);

        let sales = vec![
            sale(1, "2024-01-01", 1, 10.0),  // start bound
            sale(1, "2024-01-11", 2, 20.0),  // end bound
            sale(1, "2024-01-12", 4, 40.0),  // past end
        ];

        let totals = aggregate_window(&groups, &index, &sales, &[]);
        assert_eq!(totals[0].quantity_sold, 3);
    }

    #[test]
    fn test_unmatched_item_ids_are_dropped() {
        let items = vec![item(1, "Crew Neck", "2024-01-01")];
        let (groups, index) = build_groups(&items, &Default::default(), 30);

        let sales = vec![sale(999, "2024-01-02", 50, 5000.0)];
        let engagement = vec![views(999, "2024-01-02", 100, 10)];

        let totals = aggregate_window(&groups, &index, &sales, &engagement);
        assert_eq!(totals[0], WindowTotals::default());
    }

    #[test]
    fn test_engagement_sums_in_window() {
        let items = vec![item(1, "Crew Neck", "2024-01-01")];
        let (groups, index) = build_groups(&items, &Default::default(), 5);

        let engagement = vec![
            views(1, "2024-01-02", 100, 10),
            views(1, "2024-01-03", 50, 5),
            views(1, "2024-01-20", 999, 99),  // outside
        ];

        let totals = aggregate_window(&groups, &index, &[], &engagement);
        assert_eq!(totals[0].items_viewed, 150);
        assert_eq!(totals[0].items_addedtocart, 15);
    }

    #[test]
    fn test_no_records_leaves_zero_totals() {
        let items = vec![item(1, "Crew Neck", "2024-01-01")];
        let (groups, index) = build_groups(&items, &Default::default(), 30);

        let totals = aggregate_window(&groups, &index, &[], &[]);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0], WindowTotals::default());
    }
}
