//! Deterministic test values
//!
//! Records are stamped from a caller-supplied clock, so tests pin it here.

use chrono::{DateTime, Utc};

/// Fixed timestamp for testing (2024-01-01 00:00:00 UTC)
pub const TEST_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

/// The same instant as stored in the `timestamp_utc` column
pub const TEST_TIMESTAMP_COLUMN: &str = "2024/01/01 00:00:00";

/// Get a fixed chrono DateTime for testing
pub fn test_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(TEST_TIMESTAMP)
        .expect("Invalid test timestamp")
        .with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use subportal::data::TIMESTAMP_FORMAT;

    #[test]
    fn test_timestamp_column_matches_format() {
        assert_eq!(
            test_now().format(TIMESTAMP_FORMAT).to_string(),
            TEST_TIMESTAMP_COLUMN
        );
    }
}
