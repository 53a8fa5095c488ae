//! Data Report Model
//!
//! Derived per-worker per-day productivity rows, produced by reconciling an
//! uploaded external dataset with picking records.

use serde::{Deserialize, Serialize};

/// Stored reconciliation row (`data_reports` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DataReport {
    pub id: i64,
    pub worker_id: i64,
    /// Calendar day the report covers (YYYY-MM-DD)
    pub report_date: String,
    pub orders: i64,
    pub order_lines: i64,
    pub units: i64,
    /// Hours spent on the picking work type that day
    pub time_spent: f64,
    /// NULL when no picking hours were recorded that day
    pub order_lines_per_hour: Option<f64>,
    /// NULL when units is zero
    pub units_per_order_line: Option<f64>,
    /// When the row was inserted (Unix millis)
    pub created_at: i64,
}

/// New reconciliation row, before insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataReportNew {
    pub worker_id: i64,
    pub report_date: String,
    pub orders: i64,
    pub order_lines: i64,
    pub units: i64,
    pub time_spent: f64,
    pub order_lines_per_hour: Option<f64>,
    pub units_per_order_line: Option<f64>,
}

/// One uploaded external-dataset row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadEntry {
    /// External inventory-system worker id
    pub soft_one_id: String,
    /// Calendar day (YYYY-MM-DD)
    pub date: String,
    pub orders: i64,
    pub order_lines: i64,
    pub units: i64,
}
