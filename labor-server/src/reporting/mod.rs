//! Reporting & aggregation
//!
//! Single-pass folds over joined picking rows. All duration math follows
//! one rule: an open record contributes zero hours
//! (`end.unwrap_or(start) - start`).

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use shared::models::{DataReportNew, PickingRecord, PickingWithWorker, UploadEntry, WorkType};
use shared::util::MILLIS_PER_HOUR;

/// Per-type concurrent task capacity
///
/// A work type is available when its open-record count is strictly below
/// this value. Advisory only; the check is not transactional.
pub fn capacity(work_type: WorkType) -> usize {
    match work_type {
        WorkType::Picking => 10,
        WorkType::Packing => 5,
        WorkType::Labelling => 2,
        WorkType::LiquidProduction => 3,
        WorkType::Preparation => 5,
        WorkType::Checking => 3,
        WorkType::Restocking => 4,
        WorkType::SubDivision => 2,
    }
}

/// Hours a record contributes: open records count zero
pub fn duration_hours(start: i64, end: Option<i64>) -> f64 {
    (end.unwrap_or(start) - start) as f64 / MILLIS_PER_HOUR
}

/// Fixed per-work-type table, zero-seeded for every variant
///
/// Serializes as an object keyed by the wire strings, so every work type
/// appears in the output even when it accumulated nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkTypeTable([f64; WorkType::COUNT]);

impl WorkTypeTable {
    pub fn new() -> Self {
        Self([0.0; WorkType::COUNT])
    }

    pub fn add(&mut self, work_type: WorkType, hours: f64) {
        self.0[work_type.index()] += hours;
    }

    pub fn get(&self, work_type: WorkType) -> f64 {
        self.0[work_type.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Default for WorkTypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for WorkTypeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WorkType::COUNT))?;
        for wt in WorkType::ALL {
            map.serialize_entry(wt.as_str(), &self.0[wt.index()])?;
        }
        map.end()
    }
}

/// Per-worker total hours row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerHours {
    pub worker_id: i64,
    pub worker_name: String,
    pub hours: f64,
}

/// Per-worker per-work-type hours row
#[derive(Debug, Clone, Serialize)]
pub struct WorkerTypeHours {
    pub worker_id: i64,
    pub worker_name: String,
    pub hours: WorkTypeTable,
}

/// Per-subtask totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubtaskTotals {
    pub quantity: i64,
    pub hours: f64,
}

/// Total hours per worker over the given records
///
/// Every worker in `workers` appears in the result, with zero hours when
/// no records matched.
pub fn worker_hours(
    workers: &[(i64, String)],
    records: &[PickingWithWorker],
) -> Vec<WorkerHours> {
    let mut totals: BTreeMap<i64, f64> = workers.iter().map(|(id, _)| (*id, 0.0)).collect();
    for r in records {
        *totals.entry(r.worker_id).or_insert(0.0) +=
            duration_hours(r.start_timestamp, r.end_timestamp);
    }

    workers
        .iter()
        .map(|(id, name)| WorkerHours {
            worker_id: *id,
            worker_name: name.clone(),
            hours: totals.get(id).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Hours per worker per work type
///
/// Same coverage rule as [`worker_hours`]: every listed worker appears,
/// and every work type appears inside each table.
pub fn worker_type_hours(
    workers: &[(i64, String)],
    records: &[PickingWithWorker],
) -> Vec<WorkerTypeHours> {
    let mut tables: BTreeMap<i64, WorkTypeTable> = workers
        .iter()
        .map(|(id, _)| (*id, WorkTypeTable::new()))
        .collect();
    for r in records {
        tables
            .entry(r.worker_id)
            .or_default()
            .add(r.work_type, duration_hours(r.start_timestamp, r.end_timestamp));
    }

    workers
        .iter()
        .map(|(id, name)| WorkerTypeHours {
            worker_id: *id,
            worker_name: name.clone(),
            hours: tables.remove(id).unwrap_or_default(),
        })
        .collect()
}

/// Quantity and hour totals keyed by subtask label
///
/// Records without a subtask are skipped (the query already filters them,
/// this fold tolerates them anyway).
pub fn subtask_summary(records: &[PickingWithWorker]) -> BTreeMap<String, SubtaskTotals> {
    let mut summary: BTreeMap<String, SubtaskTotals> = BTreeMap::new();
    for r in records {
        let Some(subtask) = r.subtask.as_deref().filter(|s| !s.is_empty()) else {
            continue;
        };
        let entry = summary.entry(subtask.to_string()).or_default();
        entry.quantity += r.subtask_quantity.unwrap_or(0);
        entry.hours += duration_hours(r.start_timestamp, r.end_timestamp);
    }
    summary
}

/// Render records as CSV
///
/// Header plus one line per record. Values are comma-joined without
/// quoting; hours carry two decimals.
pub fn render_csv(records: &[PickingWithWorker]) -> String {
    let mut out = String::from("worker,work_type,hours,subtask,subtask_quantity\n");
    for r in records {
        let hours = duration_hours(r.start_timestamp, r.end_timestamp);
        let subtask = r.subtask.as_deref().unwrap_or("");
        let quantity = r
            .subtask_quantity
            .map(|q| q.to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{},{:.2},{},{}\n",
            r.worker_name, r.work_type, hours, subtask, quantity
        ));
    }
    out
}

/// Work types whose open-record count is strictly under capacity
pub fn available_work_types(open_records: &[PickingRecord]) -> Vec<WorkType> {
    let mut counts = [0usize; WorkType::COUNT];
    for r in open_records {
        counts[r.work_type.index()] += 1;
    }
    WorkType::ALL
        .into_iter()
        .filter(|wt| counts[wt.index()] < capacity(*wt))
        .collect()
}

/// Reconcile one uploaded external row against that worker's picking
/// hours for the day
///
/// `order_lines_per_hour` is NULL when no picking hours were recorded;
/// `units_per_order_line` is NULL when `units` is zero. NULL is the
/// persisted sentinel for both.
pub fn reconcile(
    entry: &UploadEntry,
    worker_id: i64,
    day_records: &[PickingRecord],
) -> DataReportNew {
    let hours: f64 = day_records
        .iter()
        .map(|r| duration_hours(r.start_timestamp, r.end_timestamp))
        .sum();

    let order_lines_per_hour = if hours > 0.0 {
        Some(entry.order_lines as f64 / hours)
    } else {
        None
    };
    let units_per_order_line = if entry.units != 0 {
        Some(entry.order_lines as f64 / entry.units as f64)
    } else {
        None
    };

    DataReportNew {
        worker_id,
        report_date: entry.date.clone(),
        orders: entry.orders,
        order_lines: entry.order_lines,
        units: entry.units,
        time_spent: hours,
        order_lines_per_hour,
        units_per_order_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        worker_id: i64,
        name: &str,
        work_type: WorkType,
        start: i64,
        end: Option<i64>,
    ) -> PickingWithWorker {
        PickingWithWorker {
            id: 0,
            worker_id,
            worker_name: name.to_string(),
            work_type,
            subtask: None,
            subtask_quantity: None,
            start_timestamp: start,
            end_timestamp: end,
        }
    }

    const HOUR: i64 = 3_600_000;

    #[test]
    fn open_record_contributes_zero_hours() {
        assert_eq!(duration_hours(5_000, None), 0.0);
        assert_eq!(duration_hours(0, Some(2 * HOUR)), 2.0);
    }

    #[test]
    fn worker_hours_include_zero_rows() {
        let workers = vec![(1, "Ana".to_string()), (2, "Bram".to_string())];
        let records = vec![record(1, "Ana", WorkType::Picking, 0, Some(HOUR))];

        let rows = worker_hours(&workers, &records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].hours, 1.0);
        assert_eq!(rows[1].worker_name, "Bram");
        assert_eq!(rows[1].hours, 0.0);
    }

    #[test]
    fn type_table_zero_seeds_all_variants() {
        let workers = vec![(1, "Ana".to_string())];
        let records = vec![
            record(1, "Ana", WorkType::Packing, 0, Some(HOUR)),
            record(1, "Ana", WorkType::Packing, HOUR, Some(3 * HOUR)),
        ];

        let rows = worker_type_hours(&workers, &records);
        assert_eq!(rows[0].hours.get(WorkType::Packing), 3.0);
        assert_eq!(rows[0].hours.get(WorkType::Restocking), 0.0);

        let json = serde_json::to_value(&rows[0].hours).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), WorkType::COUNT);
        assert_eq!(obj["liquid production"], 0.0);
    }

    #[test]
    fn subtask_summary_accumulates_quantity_and_hours() {
        let mut a = record(1, "Ana", WorkType::Labelling, 0, Some(HOUR));
        a.subtask = Some("box-7".into());
        a.subtask_quantity = Some(40);
        let mut b = record(2, "Bram", WorkType::Labelling, 0, Some(2 * HOUR));
        b.subtask = Some("box-7".into());
        b.subtask_quantity = Some(10);
        let c = record(1, "Ana", WorkType::Picking, 0, Some(HOUR));

        let summary = subtask_summary(&[a, b, c]);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary["box-7"].quantity, 50);
        assert_eq!(summary["box-7"].hours, 3.0);
    }

    #[test]
    fn csv_has_header_plus_one_line_per_record() {
        let mut a = record(1, "Ana", WorkType::SubDivision, 0, Some(HOUR + HOUR / 2));
        a.subtask = Some("split-3".into());
        a.subtask_quantity = Some(12);
        let b = record(2, "Bram", WorkType::Picking, 0, None);

        let csv = render_csv(&[a, b]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "worker,work_type,hours,subtask,subtask_quantity");
        assert_eq!(lines[1], "Ana,sub division,1.50,split-3,12");
        assert_eq!(lines[2], "Bram,picking,0.00,,");
    }

    #[test]
    fn availability_boundary_is_strict() {
        // Labelling capacity is 2: one open record leaves it available,
        // two close it off.
        let open = |n: usize| -> Vec<PickingRecord> {
            (0..n)
                .map(|i| PickingRecord {
                    id: i as i64,
                    worker_id: i as i64,
                    work_type: WorkType::Labelling,
                    subtask: None,
                    subtask_quantity: None,
                    start_timestamp: 0,
                    end_timestamp: None,
                })
                .collect()
        };

        assert!(available_work_types(&open(1)).contains(&WorkType::Labelling));
        assert!(!available_work_types(&open(2)).contains(&WorkType::Labelling));
        // The other types stay available throughout
        assert!(available_work_types(&open(2)).contains(&WorkType::Picking));
    }

    #[test]
    fn reconcile_division_by_zero_yields_null() {
        let entry = UploadEntry {
            soft_one_id: "EXT-9".into(),
            date: "2024-03-15".into(),
            orders: 12,
            order_lines: 30,
            units: 0,
        };

        // No picking hours that day
        let report = reconcile(&entry, 4, &[]);
        assert_eq!(report.time_spent, 0.0);
        assert!(report.order_lines_per_hour.is_none());
        assert!(report.units_per_order_line.is_none());

        // Two picking hours
        let day = vec![PickingRecord {
            id: 1,
            worker_id: 4,
            work_type: WorkType::Picking,
            subtask: None,
            subtask_quantity: None,
            start_timestamp: 0,
            end_timestamp: Some(2 * HOUR),
        }];
        let entry_units = UploadEntry { units: 60, ..entry };
        let report = reconcile(&entry_units, 4, &day);
        assert_eq!(report.time_spent, 2.0);
        assert_eq!(report.order_lines_per_hour, Some(15.0));
        assert_eq!(report.units_per_order_line, Some(0.5));
    }
}
