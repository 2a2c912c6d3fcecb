//! # Test Helpers - *Schema, Batch and Handler Fixtures*
//!
//! Builders for wire messages and table metadata, plus a recording handler
//! that logs every callback it receives in order.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::enums::DataType;
use crate::error::HandlerError;
use crate::models::frames::relation::{QueryMetadata, Relation, RelationColumn};
use crate::models::frames::row_batch::{Column, ColumnData, RowBatchData};
use crate::models::frames::script_response::{
    ExecuteScriptResponse, QueryData, QueryExecutionStats, ScriptResult,
};
use crate::models::frames::status::{CompilerError, ErrorDetails, Status};
use crate::models::types::record::Record;
use crate::models::types::table_metadata::{ColumnInfo, TableMetadata};
use crate::traits::table_handler::TableRecordHandler;

// -------------------- Schemas -------------------- //

/// Single `INT64` column named `http_status`.
pub(crate) fn int_relation() -> Relation {
    relation_with(&[("http_status", DataType::Int64)])
}

pub(crate) fn relation_with(columns: &[(&str, DataType)]) -> Relation {
    Relation {
        columns: columns
            .iter()
            .map(|(name, dtype)| RelationColumn {
                column_name: (*name).to_string(),
                column_type: *dtype,
                column_semantic_type: None,
                column_desc: String::new(),
            })
            .collect(),
    }
}

pub(crate) fn int_table_metadata(name: &str, id: &str) -> TableMetadata {
    metadata_with(name, id, &[("http_status", DataType::Int64)])
}

pub(crate) fn metadata_with(name: &str, id: &str, columns: &[(&str, DataType)]) -> TableMetadata {
    TableMetadata {
        id: id.to_string(),
        name: name.to_string(),
        columns: columns
            .iter()
            .map(|(col, dtype)| ColumnInfo {
                name: (*col).to_string(),
                data_type: *dtype,
                semantic_type: None,
            })
            .collect(),
    }
}

// -------------------- Columns and Batches -------------------- //

pub(crate) fn int64_column(values: &[i64]) -> Column {
    Column::new(ColumnData::Int64Data(values.to_vec()))
}

pub(crate) fn string_column(values: &[&str]) -> Column {
    Column::new(ColumnData::StringData(values.iter().map(|s| s.to_string()).collect()))
}

pub(crate) fn row_batch(table_id: &str, cols: Vec<Column>, num_rows: i64) -> RowBatchData {
    RowBatchData {
        table_id: table_id.to_string(),
        cols,
        num_rows,
        eow: false,
        eos: false,
    }
}

// -------------------- Responses -------------------- //

/// Emits the messages of one table as the server would.
pub(crate) struct FakeTable {
    pub name: String,
    pub id: String,
    pub relation: Relation,
}

impl FakeTable {
    pub(crate) fn new(name: &str, id: &str, relation: Relation) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            relation,
        }
    }

    pub(crate) fn metadata_response(&self) -> ExecuteScriptResponse {
        ExecuteScriptResponse::metadata(QueryMetadata {
            name: self.name.clone(),
            id: self.id.clone(),
            relation: self.relation.clone(),
        })
    }

    pub(crate) fn row_batch_response(&self, cols: Vec<Column>, num_rows: i64) -> ExecuteScriptResponse {
        ExecuteScriptResponse::batch(row_batch(&self.id, cols, num_rows))
    }

    /// Empty batch with both end-of-window and end-of-stream set.
    pub(crate) fn end_response(&self) -> ExecuteScriptResponse {
        let mut batch = row_batch(&self.id, Vec::new(), 0);
        batch.eow = true;
        batch.eos = true;
        ExecuteScriptResponse::batch(batch)
    }

    pub(crate) fn stats_response(&self, stats: QueryExecutionStats) -> ExecuteScriptResponse {
        ExecuteScriptResponse {
            query_id: String::new(),
            status: Some(Status::ok()),
            result: Some(ScriptResult::Data(QueryData {
                batch: None,
                execution_stats: Some(stats),
            })),
        }
    }
}

pub(crate) fn make_error_response(message: &str) -> ExecuteScriptResponse {
    ExecuteScriptResponse::status(Status {
        code: 3,
        message: message.to_string(),
        error_details: Vec::new(),
    })
}

pub(crate) fn make_compiler_error(line: u64, column: u64, message: &str) -> ExecuteScriptResponse {
    ExecuteScriptResponse::status(Status {
        code: 3,
        message: String::new(),
        error_details: vec![ErrorDetails::CompilerError(CompilerError {
            line,
            column,
            message: message.to_string(),
        })],
    })
}

// -------------------- Handlers -------------------- //

/// Shared, ordered log of handler callbacks.
#[derive(Clone, Default)]
pub(crate) struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    pub(crate) fn push(&self, entry: String) {
        self.0.lock().push(entry);
    }

    pub(crate) fn snapshot(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Logs `init:<table>`, `record:<v1,v2,..>` and `done`.
pub(crate) struct RecordingHandler {
    calls: Calls,
}

impl RecordingHandler {
    pub(crate) fn new(calls: Calls) -> Self {
        Self { calls }
    }
}

impl TableRecordHandler for RecordingHandler {
    fn handle_init(&mut self, metadata: &TableMetadata) -> Result<(), HandlerError> {
        self.calls.push(format!("init:{}", metadata.name));
        Ok(())
    }

    fn handle_record(&mut self, record: Record) -> Result<(), HandlerError> {
        let values: Vec<String> = record.data.iter().map(ToString::to_string).collect();
        self.calls.push(format!("record:{}", values.join(",")));
        Ok(())
    }

    fn handle_done(&mut self) -> Result<(), HandlerError> {
        self.calls.push("done".to_string());
        Ok(())
    }
}
