//! Picking API Handlers

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository;
use crate::reporting;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, resolve_range};
use crate::utils::validation::{validate_optional_text, MAX_NAME_LEN};
use shared::models::{
    DataReport, DataReportNew, PickingAssign, PickingClose, PickingRecord, PickingStart,
    PickingWithWorker, WorkType,
};
use shared::util::now_millis;
use shared::{AppError, AppResult, ErrorCode};

/// Date-range query for the reporting endpoints (YYYY-MM-DD, both
/// optional, default trailing 30 days)
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// ── Lifecycle (any authenticated worker) ────────────────────────────

/// POST /picking — start a task for the authenticated worker
pub async fn start(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PickingStart>,
) -> AppResult<Json<PickingRecord>> {
    let record =
        repository::picking::create(&state.pool, user.id, payload.work_type, now_millis())
            .await
            .map_err(AppError::from)?;
    tracing::info!(
        worker_id = user.id,
        work_type = %payload.work_type,
        record_id = record.id,
        "Task started"
    );
    Ok(Json(record))
}

/// PUT /picking/{id} — close an open record at now
///
/// Workers close their own records; closing someone else's requires
/// admin. Closing twice is rejected, the close is terminal.
pub async fn close(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PickingClose>,
) -> AppResult<Json<PickingRecord>> {
    validate_optional_text(&payload.subtask, "subtask", MAX_NAME_LEN)?;

    let record = repository::picking::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::PickingNotFound, format!("Record {id} not found"))
        })?;

    if record.worker_id != user.id && !user.is_admin() {
        tracing::warn!(
            target: "security",
            worker_id = user.id,
            record_id = id,
            "Attempt to close another worker's record"
        );
        return Err(AppError::forbidden("Cannot close another worker's record"));
    }

    if !record.is_open() {
        return Err(AppError::with_message(
            ErrorCode::PickingAlreadyClosed,
            format!("Record {id} is already closed"),
        ));
    }

    let closed = repository::picking::close(
        &state.pool,
        id,
        now_millis(),
        payload.subtask,
        payload.subtask_quantity,
    )
    .await
    .map_err(AppError::from)?;
    if !closed {
        // Lost a race with another close
        return Err(AppError::with_message(
            ErrorCode::PickingAlreadyClosed,
            format!("Record {id} is already closed"),
        ));
    }

    let record = repository::picking::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::PickingNotFound, format!("Record {id} not found"))
        })?;
    Ok(Json(record))
}

/// GET /picking — own records, newest first
pub async fn list_own(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<PickingRecord>>> {
    let records = repository::picking::find_for_worker(&state.pool, user.id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(records))
}

/// GET /picking/active — own open records, newest first
pub async fn active(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<PickingRecord>>> {
    let records = repository::picking::find_active_for_worker(&state.pool, user.id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(records))
}

/// GET /picking/work — work types with spare capacity
///
/// Advisory: the count-then-start sequence is not transactional, two
/// workers can both see the last slot.
pub async fn available_work(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<WorkType>>> {
    let open = repository::picking::find_open(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(reporting::available_work_types(&open)))
}

// ── Admin: assignment and corrections ───────────────────────────────

/// POST /picking/assign — start a task for an arbitrary worker
pub async fn assign(
    State(state): State<ServerState>,
    Json(payload): Json<PickingAssign>,
) -> AppResult<Json<PickingRecord>> {
    repository::worker::find_by_id(&state.pool, payload.worker_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::WorkerNotFound,
                format!("Worker {} not found", payload.worker_id),
            )
        })?;

    let record = repository::picking::create(
        &state.pool,
        payload.worker_id,
        payload.work_type,
        now_millis(),
    )
    .await
    .map_err(AppError::from)?;
    Ok(Json(record))
}

/// GET /picking/{id} — records for an arbitrary worker (admin)
pub async fn list_for_worker(
    State(state): State<ServerState>,
    Path(worker_id): Path<i64>,
) -> AppResult<Json<Vec<PickingRecord>>> {
    repository::worker::find_by_id(&state.pool, worker_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::WorkerNotFound,
                format!("Worker {worker_id} not found"),
            )
        })?;

    let records = repository::picking::find_for_worker(&state.pool, worker_id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(records))
}

/// DELETE /picking/{id} — remove a record, open or closed
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = repository::picking::delete(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    if !deleted {
        return Err(AppError::with_message(
            ErrorCode::PickingNotFound,
            format!("Record {id} not found"),
        ));
    }
    Ok(Json(true))
}

// ── Admin: reporting ────────────────────────────────────────────────

/// GET /picking/all — raw joined rows for the range
pub async fn list_all(
    State(state): State<ServerState>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<Vec<PickingWithWorker>>> {
    let (from, to) = resolve_range(range.start_date.as_deref(), range.end_date.as_deref())?;
    let records = repository::picking::find_with_worker(&state.pool, from, to)
        .await
        .map_err(AppError::from)?;
    Ok(Json(records))
}

/// GET /picking/time — total hours per worker
pub async fn time_report(
    State(state): State<ServerState>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<Vec<reporting::WorkerHours>>> {
    let (from, to) = resolve_range(range.start_date.as_deref(), range.end_date.as_deref())?;
    let workers = worker_pairs(&state).await?;
    let records = repository::picking::find_with_worker(&state.pool, from, to)
        .await
        .map_err(AppError::from)?;
    Ok(Json(reporting::worker_hours(&workers, &records)))
}

/// GET /picking/report — hours per worker per work type
pub async fn type_report(
    State(state): State<ServerState>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<Vec<reporting::WorkerTypeHours>>> {
    let (from, to) = resolve_range(range.start_date.as_deref(), range.end_date.as_deref())?;
    let workers = worker_pairs(&state).await?;
    let records = repository::picking::find_with_worker(&state.pool, from, to)
        .await
        .map_err(AppError::from)?;
    Ok(Json(reporting::worker_type_hours(&workers, &records)))
}

/// GET /picking/subtasks — quantity and hour totals per subtask label
pub async fn subtask_report(
    State(state): State<ServerState>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<BTreeMap<String, reporting::SubtaskTotals>>> {
    let (from, to) = resolve_range(range.start_date.as_deref(), range.end_date.as_deref())?;
    let records = repository::picking::find_with_subtask(&state.pool, from, to)
        .await
        .map_err(AppError::from)?;
    Ok(Json(reporting::subtask_summary(&records)))
}

/// GET /picking/csv — the range as a CSV attachment
pub async fn csv_export(
    State(state): State<ServerState>,
    Query(range): Query<RangeQuery>,
) -> AppResult<impl IntoResponse> {
    let (from, to) = resolve_range(range.start_date.as_deref(), range.end_date.as_deref())?;
    let records = repository::picking::find_with_worker(&state.pool, from, to)
        .await
        .map_err(AppError::from)?;
    let csv = reporting::render_csv(&records);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"picking_report.csv\"",
            ),
        ],
        csv,
    ))
}

// ── Admin: external dataset reconciliation ──────────────────────────

/// POST /picking/upload — reconcile external per-day rows
///
/// Every row must match a known worker by external id; the whole upload
/// is rejected on the first unknown id, nothing is persisted.
pub async fn upload(
    State(state): State<ServerState>,
    Json(entries): Json<Vec<shared::models::UploadEntry>>,
) -> AppResult<Json<Vec<DataReportNew>>> {
    let mut reports = Vec::with_capacity(entries.len());
    for entry in &entries {
        let worker = repository::worker::find_by_external_id(&state.pool, &entry.soft_one_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::WorkerNotFound,
                    format!("No worker with external id {}", entry.soft_one_id),
                )
            })?;

        let date = parse_date(&entry.date)?;
        let day_records = repository::picking::find_picking_for_worker_in_range(
            &state.pool,
            worker.id,
            day_start_millis(date),
            day_end_millis(date),
        )
        .await
        .map_err(AppError::from)?;

        reports.push(reporting::reconcile(entry, worker.id, &day_records));
    }

    let inserted = repository::data_report::insert_many(&state.pool, &reports)
        .await
        .map_err(AppError::from)?;
    tracing::info!(rows = inserted, "Dataset upload reconciled");
    Ok(Json(reports))
}

/// GET /picking/reports — stored reconciliation rows for the range
pub async fn stored_reports(
    State(state): State<ServerState>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<Vec<DataReport>>> {
    let (from, to) = stored_range(&range)?;
    let reports = repository::data_report::find_by_date_range(&state.pool, &from, &to)
        .await
        .map_err(AppError::from)?;
    Ok(Json(reports))
}

/// Resolve the optional range into ISO date bounds (data_reports stores
/// plain dates, not millis)
fn stored_range(range: &RangeQuery) -> AppResult<(String, String)> {
    let today = chrono::Utc::now().date_naive();
    let from = match &range.start_date {
        Some(d) => parse_date(d)?.to_string(),
        None => (today - chrono::Duration::days(30)).to_string(),
    };
    let to = match &range.end_date {
        Some(d) => parse_date(d)?.to_string(),
        None => today.to_string(),
    };
    if from > to {
        return Err(AppError::validation("Range start is after range end"));
    }
    Ok((from, to))
}

/// All workers as `(id, name)` pairs for the zero-seeded reports
async fn worker_pairs(state: &ServerState) -> AppResult<Vec<(i64, String)>> {
    let workers = repository::worker::find_all(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(workers.into_iter().map(|w| (w.id, w.name)).collect())
}
