//! The single message shape of a script's result stream.
//!
//! Each response carries a top-level [`Status`] and at most one result: either
//! a table announcement ([`QueryMetadata`]) or a data payload ([`QueryData`]).

use serde::{Deserialize, Serialize};

use crate::models::frames::relation::QueryMetadata;
use crate::models::frames::row_batch::RowBatchData;
use crate::models::frames::status::Status;

/// Execution statistics reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryExecutionStats {
    #[serde(default)]
    pub execution_time_ns: i64,
    #[serde(default)]
    pub compilation_time_ns: i64,
    #[serde(default)]
    pub bytes_processed: i64,
    #[serde(default)]
    pub records_processed: i64,
}

/// Data payload: a row batch, execution statistics, or both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<RowBatchData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_stats: Option<QueryExecutionStats>,
}

/// Discriminant of a response's payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptResult {
    MetaData(QueryMetadata),
    Data(QueryData),
}

/// One message of the result stream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecuteScriptResponse {
    #[serde(default)]
    pub query_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ScriptResult>,
}

impl ExecuteScriptResponse {
    pub fn metadata(metadata: QueryMetadata) -> Self {
        Self {
            query_id: String::new(),
            status: Some(Status::ok()),
            result: Some(ScriptResult::MetaData(metadata)),
        }
    }

    pub fn batch(batch: RowBatchData) -> Self {
        Self {
            query_id: String::new(),
            status: Some(Status::ok()),
            result: Some(ScriptResult::Data(QueryData {
                batch: Some(batch),
                execution_stats: None,
            })),
        }
    }

    pub fn status(status: Status) -> Self {
        Self {
            query_id: String::new(),
            status: Some(status),
            result: None,
        }
    }

    pub fn with_query_id(mut self, query_id: impl Into<String>) -> Self {
        self.query_id = query_id.into();
        self
    }
}
