//! Decoded rows handed to table handlers.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::enums::DataType;
use crate::models::types::table_metadata::TableMetadata;

/// One typed scalar value.
///
/// Null slots keep their column's kind so handlers can tell a missing
/// integer from a missing string.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    /// Nanoseconds since the unix epoch.
    Time64Ns(i64),
    /// Signed nanoseconds.
    Duration64Ns(i64),
    Null(DataType),
}

impl Datum {
    pub fn data_type(&self) -> DataType {
        match self {
            Datum::Boolean(_) => DataType::Boolean,
            Datum::Int64(_) => DataType::Int64,
            Datum::Float64(_) => DataType::Float64,
            Datum::String(_) => DataType::String,
            Datum::Time64Ns(_) => DataType::Time64Ns,
            Datum::Duration64Ns(_) => DataType::Duration64Ns,
            Datum::Null(dt) => *dt,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Datum::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::String(s) => Some(s),
            _ => None,
        }
    }

    /// Timestamp as `SystemTime`. Pre-epoch values are supported.
    pub fn as_time(&self) -> Option<SystemTime> {
        match self {
            Datum::Time64Ns(ns) if *ns >= 0 => {
                UNIX_EPOCH.checked_add(Duration::from_nanos(*ns as u64))
            }
            Datum::Time64Ns(ns) => UNIX_EPOCH.checked_sub(Duration::from_nanos(ns.unsigned_abs())),
            _ => None,
        }
    }

    /// Duration as `std::time::Duration`; `None` for negative durations.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Datum::Duration64Ns(ns) if *ns >= 0 => Some(Duration::from_nanos(*ns as u64)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Datum::Boolean(b) => write!(f, "{b}"),
            Datum::Int64(v) => write!(f, "{v}"),
            Datum::Float64(v) => write!(f, "{v}"),
            Datum::String(s) => f.write_str(s),
            Datum::Time64Ns(v) => write!(f, "{v}ns"),
            Datum::Duration64Ns(v) => write!(f, "{v}ns"),
            Datum::Null(_) => f.write_str("null"),
        }
    }
}

/// One decoded row, values in schema-declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub metadata: Arc<TableMetadata>,
    pub data: Vec<Datum>,
}

impl Record {
    /// Value of the named column.
    pub fn get(&self, column: &str) -> Option<&Datum> {
        self.metadata.column_index(column).and_then(|i| self.data.get(i))
    }

    pub fn table_name(&self) -> &str {
        &self.metadata.name
    }
}
