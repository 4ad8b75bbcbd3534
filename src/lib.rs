//! Stockpulse - Retail Inventory Analytics Service
//!
//! Serves a per-product-group inventory summary computed on demand from
//! item, sales, and web-engagement records: current stock, sell-through,
//! engagement rates, and a linear sales projection.

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod state;
