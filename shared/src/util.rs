//! Small utility helpers

/// Current Unix timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Milliseconds per hour, for duration folds
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Milliseconds per day
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
