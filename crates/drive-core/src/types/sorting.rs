//! Sorting types for live queries.

use std::cmp::Ordering;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ascending sort on one document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Document field to sort by.
    pub field: String,
}

impl SortField {
    /// Create an ascending sort on the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Compare two documents' values for this field.
    ///
    /// Missing and null values sort first. Numbers are epoch milliseconds and
    /// RFC 3339 strings are instants, so both forms compare on one timeline
    /// regardless of offset. Other strings sort after every instant, then
    /// lexicographically; anything else is `Equal` so the caller's
    /// tie-breaker decides.
    pub fn compare(&self, a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (SortKey::of(a), SortKey::of(b)) {
            (SortKey::Null, SortKey::Null) => Ordering::Equal,
            (SortKey::Null, _) => Ordering::Less,
            (_, SortKey::Null) => Ordering::Greater,
            (SortKey::Instant(x), SortKey::Instant(y)) => {
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (SortKey::Instant(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Instant(_)) => Ordering::Greater,
            (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
            _ => Ordering::Equal,
        }
    }
}

/// A field value normalised for ordering.
enum SortKey<'a> {
    Null,
    /// Milliseconds since the Unix epoch.
    Instant(f64),
    Text(&'a str),
    Other,
}

impl<'a> SortKey<'a> {
    fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Null,
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Other, Self::Instant),
            Some(Value::String(s)) => match DateTime::parse_from_rfc3339(s) {
                Ok(dt) => Self::Instant(dt.timestamp_millis() as f64),
                Err(_) => Self::Text(s),
            },
            Some(_) => Self::Other,
        }
    }
}
