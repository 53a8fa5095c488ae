//! Data Report Repository
//!
//! Persisted reconciliation rows from external dataset uploads.

use super::RepoResult;
use shared::models::{DataReport, DataReportNew};
use shared::util::now_millis;
use sqlx::SqlitePool;

/// Insert a batch of reconciliation rows inside one transaction
pub async fn insert_many(pool: &SqlitePool, reports: &[DataReportNew]) -> RepoResult<usize> {
    let mut tx = pool.begin().await?;
    for report in reports {
        sqlx::query(
            "INSERT INTO data_reports \
             (worker_id, report_date, orders, order_lines, units, time_spent, \
              order_lines_per_hour, units_per_order_line, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(report.worker_id)
        .bind(&report.report_date)
        .bind(report.orders)
        .bind(report.order_lines)
        .bind(report.units)
        .bind(report.time_spent)
        .bind(report.order_lines_per_hour)
        .bind(report.units_per_order_line)
        .bind(now_millis())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(reports.len())
}

/// Rows whose report date falls within `[from, to]` (inclusive, ISO dates)
pub async fn find_by_date_range(
    pool: &SqlitePool,
    from: &str,
    to: &str,
) -> RepoResult<Vec<DataReport>> {
    let reports = sqlx::query_as::<_, DataReport>(
        "SELECT id, worker_id, report_date, orders, order_lines, units, time_spent, \
                order_lines_per_hour, units_per_order_line, created_at \
         FROM data_reports \
         WHERE report_date >= ? AND report_date <= ? \
         ORDER BY report_date, worker_id",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(reports)
}
