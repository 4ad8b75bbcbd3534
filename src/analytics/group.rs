//! Product grouping and observation windows
//!
//! Items sharing (name, type, category) are batches of one conceptual
//! product and report as a single summary row. Each group gets its own
//! observation window anchored at the group's earliest launch date, so
//! window bounds are computed here, once, and record filtering downstream
//! joins against them.

use crate::db::sqlite::models::{ItemRecord, SaleDateBounds};
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeSet, HashMap};

/// Grouping key: one conceptual product
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub item_name: String,
    pub item_type: String,
    pub category: String,
}

/// One product group with its window bounds and item-attribute aggregates
#[derive(Debug, Clone)]
pub struct ProductGroup {
    pub key: GroupKey,
    /// Minimum item id in the group; identifies the output row and orders it
    pub min_item_id: i64,
    /// Earliest effective launch date across members
    pub launch_date: NaiveDate,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// Sum of member current stock (stock is not date-scoped)
    pub current_stock: i64,
    pub mean_sale_price: f64,
    pub mean_sale_discount: f64,
    /// Mean of per-item discounted unit price
    pub mean_net_price: f64,
    /// Distinct discount percentages observed in the group
    pub sale_discounts: Vec<i64>,
    /// Distinct batch labels observed in the group
    pub batches: Vec<String>,
    pub member_ids: Vec<i64>,
}

struct GroupAccumulator {
    min_item_id: i64,
    launch_date: NaiveDate,
    current_stock: i64,
    price_sum: f64,
    discount_sum: f64,
    net_price_sum: f64,
    member_count: i64,
    discounts: BTreeSet<i64>,
    batches: BTreeSet<String>,
    member_ids: Vec<i64>,
}

/// Resolve an item's effective launch date: the cataloged date, or the first
/// sale date when the catalog has none
pub fn effective_launch_date(
    item: &ItemRecord,
    sale_bounds: &HashMap<i64, SaleDateBounds>,
) -> Option<NaiveDate> {
    item.launch_date
        .or_else(|| sale_bounds.get(&item.item_id).map(|b| b.first_sold))
}

/// Partition items into product groups and compute per-group window bounds.
///
/// Items with no launch date and no recorded sale have no anchor for the
/// window and are excluded entirely; their sales and engagement records drop
/// with them. Returns the groups ordered by minimum item id, plus the
/// item-id -> group-index join map used by the record filters.
pub fn build_groups(
    items: &[ItemRecord],
    sale_bounds: &HashMap<i64, SaleDateBounds>,
    days: u32,
) -> (Vec<ProductGroup>, HashMap<i64, usize>) {
    let mut accumulators: HashMap<GroupKey, GroupAccumulator> = HashMap::new();

    for item in items {
        let launch = match effective_launch_date(item, sale_bounds) {
            Some(date) => date,
            None => continue,
        };

        let key = GroupKey {
            item_name: item.item_name.clone(),
            item_type: item.item_type.clone(),
            category: item.category.clone(),
        };

        let net_price =
            item.sale_price as f64 * (100 - item.sale_discount) as f64 / 100.0;

        let acc = accumulators
            .entry(key)
            .or_insert_with(|| GroupAccumulator {
                min_item_id: item.item_id,
                launch_date: launch,
                current_stock: 0,
                price_sum: 0.0,
                discount_sum: 0.0,
                net_price_sum: 0.0,
                member_count: 0,
                discounts: BTreeSet::new(),
                batches: BTreeSet::new(),
                member_ids: Vec::new(),
            });

        acc.min_item_id = acc.min_item_id.min(item.item_id);
        acc.launch_date = acc.launch_date.min(launch);
        acc.current_stock += item.current_stock;
        acc.price_sum += item.sale_price as f64;
        acc.discount_sum += item.sale_discount as f64;
        acc.net_price_sum += net_price;
        acc.member_count += 1;
        acc.discounts.insert(item.sale_discount);
        acc.batches.insert(item.batch.clone());
        acc.member_ids.push(item.item_id);
    }

    let mut groups: Vec<ProductGroup> = accumulators
        .into_iter()
        .map(|(key, acc)| {
            let count = acc.member_count as f64;
            ProductGroup {
                key,
                min_item_id: acc.min_item_id,
                launch_date: acc.launch_date,
                window_start: acc.launch_date,
                window_end: acc.launch_date + Duration::days(days as i64),
                current_stock: acc.current_stock,
                mean_sale_price: acc.price_sum / count,
                mean_sale_discount: acc.discount_sum / count,
                mean_net_price: acc.net_price_sum / count,
                sale_discounts: acc.discounts.into_iter().collect(),
                batches: acc.batches.into_iter().collect(),
                member_ids: acc.member_ids,
            }
        })
        .collect();

    groups.sort_by_key(|g| g.min_item_id);

    let mut index: HashMap<i64, usize> = HashMap::new();
    for (pos, group) in groups.iter().enumerate() {
        for id in &group.member_ids {
            index.insert(*id, pos);
        }
    }

    (groups, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, launch: Option<&str>, stock: i64) -> ItemRecord {
        ItemRecord {
            item_id: id,
            item_name: name.to_string(),
            item_type: "Tshirt".to_string(),
            category: "Menswear".to_string(),
            current_stock: stock,
            launch_date: launch.map(|d| d.parse().unwrap()),
            sale_price: 1000,
            sale_discount: 20,
            batch: "B1".to_string(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_launch_date_falls_back_to_first_sale() {
        let items = vec![item(1, "Crew Neck", None, 10)];
        let mut bounds = HashMap::new();
        bounds.insert(
            1,
            SaleDateBounds {
                first_sold: date("2024-02-01"),
                last_sold: date("2024-03-01"),
            },
        );

        let (groups, _) = build_groups(&items, &bounds, 30);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].launch_date, date("2024-02-01"));
    }

    #[test]
    fn test_item_without_any_launch_anchor_is_excluded() {
        let items = vec![
            item(1, "Crew Neck", Some("2024-01-01"), 10),
            item(2, "Ghost Item", None, 99),
        ];
        let bounds = HashMap::new();

        let (groups, index) = build_groups(&items, &bounds, 30);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key.item_name, "Crew Neck");
        assert!(!index.contains_key(&2));
    }

    #[test]
    fn test_group_launch_is_earliest_member_launch() {
        let items = vec![
            item(5, "Crew Neck", Some("2024-03-10"), 10),
            item(3, "Crew Neck", Some("2024-01-10"), 20),
        ];
        let bounds = HashMap::new();

        let (groups, index) = build_groups(&items, &bounds, 7);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.min_item_id, 3);
        assert_eq!(group.launch_date, date("2024-01-10"));
        assert_eq!(group.window_start, date("2024-01-10"));
        assert_eq!(group.window_end, date("2024-01-17"));
        assert_eq!(group.current_stock, 30);
        // Both members join to the same group
        assert_eq!(index[&3], index[&5]);
    }

    #[test]
    fn test_groups_split_on_type_and_category() {
        let mut other_type = item(2, "Crew Neck", Some("2024-01-01"), 5);
        other_type.item_type = "Hoodie".to_string();
        let items = vec![item(1, "Crew Neck", Some("2024-01-01"), 10), other_type];

        let (groups, _) = build_groups(&items, &HashMap::new(), 30);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_attribute_aggregates() {
        let mut discounted = item(2, "Crew Neck", Some("2024-01-01"), 5);
        discounted.sale_price = 2000;
        discounted.sale_discount = 50;
        discounted.batch = "B2".to_string();
        let items = vec![item(1, "Crew Neck", Some("2024-01-01"), 10), discounted];

        let (groups, _) = build_groups(&items, &HashMap::new(), 30);
        let group = &groups[0];
        assert_eq!(group.mean_sale_price, 1500.0);
        assert_eq!(group.mean_sale_discount, 35.0);
        // (1000 * 0.8 + 2000 * 0.5) / 2
        assert_eq!(group.mean_net_price, 900.0);
        assert_eq!(group.sale_discounts, vec![20, 50]);
        assert_eq!(group.batches, vec!["B1".to_string(), "B2".to_string()]);
    }

    #[test]
    fn test_zero_days_window_is_launch_day_only() {
        let items = vec![item(1, "Crew Neck", Some("2024-01-01"), 10)];
        let (groups, _) = build_groups(&items, &HashMap::new(), 0);
        assert_eq!(groups[0].window_start, groups[0].window_end);
    }
}
