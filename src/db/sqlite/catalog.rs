//! Catalog read queries
//!
//! The loading stage of the summary pipeline: fetches the item, sale, and
//! engagement tables as typed rows plus the per-item first/last sale dates.
//! Coercion to integers and `NaiveDate` happens in the row mappers; no
//! filtering or business logic here, and no writes.

use crate::db::sqlite::models::{
    CatalogSnapshot, DistinctValues, EngagementRecord, ItemRecord, SaleDateBounds, SaleRecord,
};
use crate::error::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashMap;

/// Fetch everything the summary computation needs in one snapshot
pub fn load_snapshot(conn: &Connection) -> Result<CatalogSnapshot> {
    let items = load_items(conn)?;
    let sales = load_sales(conn)?;
    let engagement = load_engagement(conn)?;
    let sale_bounds = load_sale_bounds(conn)?;

    tracing::debug!(
        "Loaded catalog snapshot: {} items, {} sales, {} engagement rows",
        items.len(),
        sales.len(),
        engagement.len()
    );

    Ok(CatalogSnapshot {
        items,
        sales,
        engagement,
        sale_bounds,
    })
}

fn load_items(conn: &Connection) -> Result<Vec<ItemRecord>> {
    let mut stmt = conn.prepare(
        "SELECT item_id, item_name, item_type, category, current_stock,
                launch_date, sale_price, sale_discount, batch
         FROM items",
    )?;

    let items = stmt
        .query_map([], |row| {
            Ok(ItemRecord {
                item_id: row.get(0)?,
                item_name: row.get(1)?,
                item_type: row.get(2)?,
                category: row.get(3)?,
                current_stock: row.get(4)?,
                launch_date: row.get::<_, Option<NaiveDate>>(5)?,
                sale_price: row.get(6)?,
                sale_discount: row.get(7)?,
                batch: row.get(8)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(items)
}

fn load_sales(conn: &Connection) -> Result<Vec<SaleRecord>> {
    let mut stmt = conn.prepare("SELECT item_id, date, quantity, total_value FROM sales")?;

    let sales = stmt
        .query_map([], |row| {
            Ok(SaleRecord {
                item_id: row.get(0)?,
                date: row.get(1)?,
                quantity: row.get(2)?,
                total_value: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(sales)
}

fn load_engagement(conn: &Connection) -> Result<Vec<EngagementRecord>> {
    let mut stmt =
        conn.prepare("SELECT item_id, date, items_viewed, items_addedtocart FROM engagement")?;

    let engagement = stmt
        .query_map([], |row| {
            Ok(EngagementRecord {
                item_id: row.get(0)?,
                date: row.get(1)?,
                items_viewed: row.get(2)?,
                items_addedtocart: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(engagement)
}

/// First/last sale date per item, aggregated in SQL
fn load_sale_bounds(conn: &Connection) -> Result<HashMap<i64, SaleDateBounds>> {
    let mut stmt =
        conn.prepare("SELECT item_id, MIN(date), MAX(date) FROM sales GROUP BY item_id")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                SaleDateBounds {
                    first_sold: row.get(1)?,
                    last_sold: row.get(2)?,
                },
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows.into_iter().collect())
}

/// Distinct non-null attribute values, for the filter dropdown endpoint
pub fn distinct_values(conn: &Connection) -> Result<DistinctValues> {
    Ok(DistinctValues {
        item_names: distinct_column(conn, "item_name")?,
        item_types: distinct_column(conn, "item_type")?,
        categories: distinct_column(conn, "category")?,
        batches: distinct_column(conn, "batch")?,
    })
}

fn distinct_column(conn: &Connection, column: &str) -> Result<Vec<String>> {
    // Column names come from the fixed list above, never from user input
    let sql = format!(
        "SELECT DISTINCT {col} FROM items WHERE {col} IS NOT NULL ORDER BY {col}",
        col = column
    );
    let mut stmt = conn.prepare(&sql)?;

    let values = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::migrations::run_migrations;
    use rusqlite::params;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn insert_item(conn: &Connection, id: i64, name: &str, launch: Option<&str>) {
        conn.execute(
            "INSERT INTO items (item_id, item_name, item_type, category, current_stock,
                                launch_date, sale_price, sale_discount, batch)
             VALUES (?1, ?2, 'Tshirt', 'Menswear', 50, ?3, 1200, 10, 'B1')",
            params![id, name, launch],
        )
        .unwrap();
    }

    fn insert_sale(conn: &Connection, item_id: i64, date: &str, quantity: i64, value: f64) {
        conn.execute(
            "INSERT INTO sales (item_id, date, quantity, total_value) VALUES (?1, ?2, ?3, ?4)",
            params![item_id, date, quantity, value],
        )
        .unwrap();
    }

    #[test]
    fn test_load_snapshot_coerces_types() {
        let conn = create_test_db();
        insert_item(&conn, 1, "Crew Neck", Some("2024-01-15"));
        insert_item(&conn, 2, "Crew Neck", None);
        insert_sale(&conn, 1, "2024-01-20", 5, 6000.0);
        conn.execute(
            "INSERT INTO engagement (item_id, date, items_viewed, items_addedtocart)
             VALUES (1, '2024-01-20', 120, 8)",
            [],
        )
        .unwrap();

        let snapshot = load_snapshot(&conn).unwrap();

        assert_eq!(snapshot.items.len(), 2);
        let first = snapshot.items.iter().find(|i| i.item_id == 1).unwrap();
        assert_eq!(
            first.launch_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(first.sale_price, 1200);
        assert_eq!(first.sale_discount, 10);

        let second = snapshot.items.iter().find(|i| i.item_id == 2).unwrap();
        assert_eq!(second.launch_date, None);

        assert_eq!(snapshot.sales.len(), 1);
        assert_eq!(snapshot.sales[0].quantity, 5);
        assert_eq!(snapshot.engagement.len(), 1);
        assert_eq!(snapshot.engagement[0].items_viewed, 120);
    }

    #[test]
    fn test_sale_bounds_aggregate() {
        let conn = create_test_db();
        insert_item(&conn, 1, "Crew Neck", Some("2024-01-01"));
        insert_sale(&conn, 1, "2024-02-10", 2, 100.0);
        insert_sale(&conn, 1, "2024-01-05", 1, 50.0);
        insert_sale(&conn, 1, "2024-03-01", 3, 150.0);

        let snapshot = load_snapshot(&conn).unwrap();

        let bounds = snapshot.sale_bounds.get(&1).unwrap();
        assert_eq!(
            bounds.first_sold,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(
            bounds.last_sold,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );

        // No sales -> no entry
        assert!(!snapshot.sale_bounds.contains_key(&99));
    }

    #[test]
    fn test_distinct_values_deduplicate() {
        let conn = create_test_db();
        insert_item(&conn, 1, "Crew Neck", None);
        insert_item(&conn, 2, "Crew Neck", None);
        insert_item(&conn, 3, "V Neck", None);

        let values = distinct_values(&conn).unwrap();
        assert_eq!(values.item_names, vec!["Crew Neck", "V Neck"]);
        assert_eq!(values.item_types, vec!["Tshirt"]);
        assert_eq!(values.batches, vec!["B1"]);
    }

    #[test]
    fn test_empty_catalog_loads_empty_snapshot() {
        let conn = create_test_db();
        let snapshot = load_snapshot(&conn).unwrap();
        assert!(snapshot.items.is_empty());
        assert!(snapshot.sales.is_empty());
        assert!(snapshot.engagement.is_empty());
        assert!(snapshot.sale_bounds.is_empty());
    }
}
