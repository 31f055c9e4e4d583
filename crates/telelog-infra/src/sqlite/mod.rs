//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools. Timestamps are stored as RFC 3339 UTC
//! strings; the shared helpers below do the mapping in both directions.

use chrono::{DateTime, Utc};

use telelog_types::error::RepositoryError;

pub mod message;
pub mod pool;
pub mod session;
pub mod user;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_roundtrip() {
        let now = Utc::now();
        let parsed = parse_datetime(&format_datetime(&now)).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        let err = parse_datetime("yesterday").unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }

    #[test]
    fn test_format_preserves_ordering_as_text() {
        // Recent-message queries sort on the TEXT column, so string order
        // must match chronological order.
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::seconds(90);
        assert!(format_datetime(&earlier) < format_datetime(&later));
    }
}
