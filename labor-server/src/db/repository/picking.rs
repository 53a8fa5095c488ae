//! Picking Repository
//!
//! Task lifecycle rows: one row per task, open while `end_timestamp`
//! is NULL.

use super::{RepoError, RepoResult};
use shared::models::{PickingRecord, PickingWithWorker, WorkType};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, worker_id, work_type, subtask, subtask_quantity, start_timestamp, end_timestamp";

/// Open a new task for a worker starting at `start`
pub async fn create(
    pool: &SqlitePool,
    worker_id: i64,
    work_type: WorkType,
    start: i64,
) -> RepoResult<PickingRecord> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO picking (worker_id, work_type, start_timestamp) \
         VALUES (?, ?, ?) RETURNING id",
    )
    .bind(worker_id)
    .bind(work_type)
    .bind(start)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create picking record".into()))
}

/// Find a record by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PickingRecord>> {
    let record = sqlx::query_as::<_, PickingRecord>(&format!(
        "SELECT {COLUMNS} FROM picking WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

/// Close an open record: stamp the end time and attach subtask details
///
/// Only matches rows whose `end_timestamp` is still NULL; a zero update
/// means the record is missing or already closed, which the caller
/// discriminates with [`find_by_id`].
pub async fn close(
    pool: &SqlitePool,
    id: i64,
    end: i64,
    subtask: Option<String>,
    subtask_quantity: Option<i64>,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE picking SET end_timestamp = ?, subtask = ?, subtask_quantity = ? \
         WHERE id = ? AND end_timestamp IS NULL",
    )
    .bind(end)
    .bind(&subtask)
    .bind(subtask_quantity)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Delete a record (correction path)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM picking WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// All records for one worker, newest first
pub async fn find_for_worker(pool: &SqlitePool, worker_id: i64) -> RepoResult<Vec<PickingRecord>> {
    let records = sqlx::query_as::<_, PickingRecord>(&format!(
        "SELECT {COLUMNS} FROM picking WHERE worker_id = ? ORDER BY start_timestamp DESC"
    ))
    .bind(worker_id)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// The worker's open records, newest first
///
/// One open row per worker is an advisory invariant, not a constraint
/// (admin assignment can open a second one), so every open row is
/// returned.
pub async fn find_active_for_worker(
    pool: &SqlitePool,
    worker_id: i64,
) -> RepoResult<Vec<PickingRecord>> {
    let records = sqlx::query_as::<_, PickingRecord>(&format!(
        "SELECT {COLUMNS} FROM picking \
         WHERE worker_id = ? AND end_timestamp IS NULL \
         ORDER BY start_timestamp DESC"
    ))
    .bind(worker_id)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// Every currently open record across all workers
pub async fn find_open(pool: &SqlitePool) -> RepoResult<Vec<PickingRecord>> {
    let records = sqlx::query_as::<_, PickingRecord>(&format!(
        "SELECT {COLUMNS} FROM picking WHERE end_timestamp IS NULL ORDER BY start_timestamp"
    ))
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// Records joined with worker names, restricted to a start-time range
///
/// The join is inner: records whose worker has been deleted drop out of
/// reporting rather than appearing unnamed.
pub async fn find_with_worker(
    pool: &SqlitePool,
    from: i64,
    to: i64,
) -> RepoResult<Vec<PickingWithWorker>> {
    let records = sqlx::query_as::<_, PickingWithWorker>(
        "SELECT p.id, p.worker_id, p.work_type, p.subtask, p.subtask_quantity, \
                p.start_timestamp, p.end_timestamp, w.name AS worker_name \
         FROM picking p \
         JOIN workers w ON w.id = p.worker_id \
         WHERE p.start_timestamp >= ? AND p.start_timestamp <= ? \
         ORDER BY p.start_timestamp",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// Records in range that carry a subtask label
pub async fn find_with_subtask(
    pool: &SqlitePool,
    from: i64,
    to: i64,
) -> RepoResult<Vec<PickingWithWorker>> {
    let records = sqlx::query_as::<_, PickingWithWorker>(
        "SELECT p.id, p.worker_id, p.work_type, p.subtask, p.subtask_quantity, \
                p.start_timestamp, p.end_timestamp, w.name AS worker_name \
         FROM picking p \
         JOIN workers w ON w.id = p.worker_id \
         WHERE p.start_timestamp >= ? AND p.start_timestamp <= ? \
           AND p.subtask IS NOT NULL AND p.subtask != '' \
         ORDER BY p.start_timestamp",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// Picking-type records for one worker within a start-time range
///
/// Feeds reconciliation: external order counts only cover the picking
/// work type.
pub async fn find_picking_for_worker_in_range(
    pool: &SqlitePool,
    worker_id: i64,
    from: i64,
    to: i64,
) -> RepoResult<Vec<PickingRecord>> {
    let records = sqlx::query_as::<_, PickingRecord>(&format!(
        "SELECT {COLUMNS} FROM picking \
         WHERE worker_id = ? AND work_type = ? \
           AND start_timestamp >= ? AND start_timestamp <= ? \
         ORDER BY start_timestamp"
    ))
    .bind(worker_id)
    .bind(WorkType::Picking)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(records)
}
