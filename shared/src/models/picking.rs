//! Picking Model
//!
//! A picking record tracks one timed task for one worker. A record with no
//! end timestamp is open/active; setting the end timestamp closes it, which
//! is terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed set of warehouse task categories
///
/// Wire and storage representation uses the lowercase names, with spaces
/// ("liquid production", "sub division") — matching the external systems
/// that consume the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkType {
    #[serde(rename = "picking")]
    Picking,
    #[serde(rename = "packing")]
    Packing,
    #[serde(rename = "labelling")]
    Labelling,
    #[serde(rename = "liquid production")]
    LiquidProduction,
    #[serde(rename = "preparation")]
    Preparation,
    #[serde(rename = "checking")]
    Checking,
    #[serde(rename = "restocking")]
    Restocking,
    #[serde(rename = "sub division")]
    SubDivision,
}

impl WorkType {
    /// Every variant, in a stable order (used to seed zeroed aggregation tables)
    pub const ALL: [WorkType; 8] = [
        WorkType::Picking,
        WorkType::Packing,
        WorkType::Labelling,
        WorkType::LiquidProduction,
        WorkType::Preparation,
        WorkType::Checking,
        WorkType::Restocking,
        WorkType::SubDivision,
    ];

    /// Number of variants
    pub const COUNT: usize = Self::ALL.len();

    /// Storage/wire string for this work type
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Picking => "picking",
            WorkType::Packing => "packing",
            WorkType::Labelling => "labelling",
            WorkType::LiquidProduction => "liquid production",
            WorkType::Preparation => "preparation",
            WorkType::Checking => "checking",
            WorkType::Restocking => "restocking",
            WorkType::SubDivision => "sub division",
        }
    }

    /// Parse a storage/wire string
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|wt| wt.as_str() == s)
    }

    /// Stable index into [`Self::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|wt| wt == self)
            .expect("variant listed in ALL")
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picking record row as stored in the `picking` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PickingRecord {
    pub id: i64,
    pub worker_id: i64,
    pub work_type: WorkType,
    /// Free-text refinement of the work type (a specific label or product)
    pub subtask: Option<String>,
    pub subtask_quantity: Option<i64>,
    /// Task start (Unix millis)
    pub start_timestamp: i64,
    /// Task end (Unix millis); NULL while the task is open
    pub end_timestamp: Option<i64>,
}

impl PickingRecord {
    /// Whether the record is still open (no end timestamp)
    pub fn is_open(&self) -> bool {
        self.end_timestamp.is_none()
    }
}

/// Picking record joined with the worker's name (reporting queries)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PickingWithWorker {
    pub id: i64,
    pub worker_id: i64,
    pub worker_name: String,
    pub work_type: WorkType,
    pub subtask: Option<String>,
    pub subtask_quantity: Option<i64>,
    pub start_timestamp: i64,
    pub end_timestamp: Option<i64>,
}

/// Start-task payload (worker id comes from the token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickingStart {
    pub work_type: WorkType,
}

/// Admin assign payload: start a task for an arbitrary worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickingAssign {
    pub worker_id: i64,
    pub work_type: WorkType,
}

/// Close-task payload with optional subtask metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickingClose {
    #[serde(default)]
    pub subtask: Option<String>,
    #[serde(default)]
    pub subtask_quantity: Option<i64>,
}

#[cfg(feature = "db")]
mod db_impls {
    use super::WorkType;
    use sqlx::encode::IsNull;
    use sqlx::error::BoxDynError;
    use sqlx::sqlite::{Sqlite, SqliteTypeInfo, SqliteValueRef};

    // Manual impls: the storage strings contain spaces, which rules out
    // `#[sqlx(rename_all = ...)]`.

    impl sqlx::Type<Sqlite> for WorkType {
        fn type_info() -> SqliteTypeInfo {
            <&str as sqlx::Type<Sqlite>>::type_info()
        }
    }

    impl<'q> sqlx::Encode<'q, Sqlite> for WorkType {
        fn encode_by_ref(
            &self,
            buf: &mut <Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
        ) -> Result<IsNull, BoxDynError> {
            <&str as sqlx::Encode<'q, Sqlite>>::encode_by_ref(&self.as_str(), buf)
        }
    }

    impl<'r> sqlx::Decode<'r, Sqlite> for WorkType {
        fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
            let s = <&str as sqlx::Decode<Sqlite>>::decode(value)?;
            WorkType::parse(s).ok_or_else(|| format!("unknown work type: {s}").into())
        }
    }
}
