//! Worker Repository

use super::{RepoError, RepoResult};
use crate::auth::password;
use shared::models::{Worker, WorkerCreate, WorkerUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, soft_one_id, name, password, admin, created_at";

/// Find all workers, ordered by name
///
/// Rows still carry the password hash; handlers map to `WorkerResponse`
/// before anything leaves the API.
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Worker>> {
    let workers = sqlx::query_as::<_, Worker>(
        "SELECT id, soft_one_id, name, password, admin, created_at FROM workers ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(workers)
}

/// Find a worker by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Worker>> {
    let worker = sqlx::query_as::<_, Worker>(&format!(
        "SELECT {COLUMNS} FROM workers WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(worker)
}

/// Find a worker by external inventory-system id
pub async fn find_by_external_id(
    pool: &SqlitePool,
    soft_one_id: &str,
) -> RepoResult<Option<Worker>> {
    let worker = sqlx::query_as::<_, Worker>(&format!(
        "SELECT {COLUMNS} FROM workers WHERE soft_one_id = ? LIMIT 1"
    ))
    .bind(soft_one_id)
    .fetch_optional(pool)
    .await?;
    Ok(worker)
}

/// Find a worker by name (login path)
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Worker>> {
    let worker = sqlx::query_as::<_, Worker>(&format!(
        "SELECT {COLUMNS} FROM workers WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(worker)
}

/// Whether any admin worker exists (bootstrap check)
pub async fn any_admin_exists(pool: &SqlitePool) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workers WHERE admin = 1")
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Create a new worker, hashing the password with a fresh salt
pub async fn create(pool: &SqlitePool, data: WorkerCreate) -> RepoResult<Worker> {
    // Check duplicate name (login is keyed by name)
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Worker name '{}' already exists",
            data.name
        )));
    }

    let hash = password::hash_password(&data.password)
        .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO workers (soft_one_id, name, password, admin, created_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.soft_one_id)
    .bind(&data.name)
    .bind(&hash)
    .bind(data.admin)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create worker".into()))
}

/// Update a worker
///
/// Name is always written; the password is re-hashed and written only when
/// a new one is supplied (patch semantics).
pub async fn update(pool: &SqlitePool, id: i64, data: WorkerUpdate) -> RepoResult<Worker> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Worker {id} not found")))?;

    // Renaming onto another worker's name would break login lookup
    if data.name != existing.name && find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Worker name '{}' already exists",
            data.name
        )));
    }

    let rows = match data.password {
        Some(ref new_password) => {
            let hash = password::hash_password(new_password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;
            sqlx::query("UPDATE workers SET name = ?, password = ? WHERE id = ?")
                .bind(&data.name)
                .bind(&hash)
                .bind(id)
                .execute(pool)
                .await?
        }
        None => {
            sqlx::query("UPDATE workers SET name = ? WHERE id = ?")
                .bind(&data.name)
                .bind(id)
                .execute(pool)
                .await?
        }
    };

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Worker {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Worker {id} not found")))
}

/// Hard-delete a worker
///
/// Picking rows referencing the worker are intentionally left in place;
/// reporting joins simply stop matching them.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM workers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
