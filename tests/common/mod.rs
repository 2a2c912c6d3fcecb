//! Fixtures shared by the integration tests: wire-message builders and a
//! registry that only accepts single `INT64` column tables.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use futures_util::stream::{self, Stream, StreamExt};
use parking_lot::Mutex;

use tablemux::enums::DataType;
use tablemux::models::frames::relation::{QueryMetadata, Relation, RelationColumn};
use tablemux::models::frames::row_batch::{Column, ColumnData, RowBatchData};
use tablemux::models::frames::script_response::ExecuteScriptResponse;
use tablemux::models::frames::status::{CompilerError, ErrorDetails, Status};
use tablemux::traits::table_muxer::BoxedTableHandler;
use tablemux::{HandlerError, Record, TableMetadata, TableMuxer, TableRecordHandler};

pub fn int_relation() -> Relation {
    Relation {
        columns: vec![RelationColumn {
            column_name: "http_status".into(),
            column_type: DataType::Int64,
            column_semantic_type: None,
            column_desc: String::new(),
        }],
    }
}

pub fn int64_column(values: &[i64]) -> Column {
    Column::new(ColumnData::Int64Data(values.to_vec()))
}

pub fn string_column(values: &[&str]) -> Column {
    Column::new(ColumnData::StringData(values.iter().map(|s| s.to_string()).collect()))
}

pub struct FakeTable {
    pub name: String,
    pub id: String,
    pub relation: Relation,
}

impl FakeTable {
    pub fn new(name: &str, id: &str, relation: Relation) -> Self {
        Self { name: name.into(), id: id.into(), relation }
    }

    pub fn metadata_response(&self) -> ExecuteScriptResponse {
        ExecuteScriptResponse::metadata(QueryMetadata {
            name: self.name.clone(),
            id: self.id.clone(),
            relation: self.relation.clone(),
        })
    }

    fn row_batch(&self, cols: Vec<Column>, num_rows: i64, eow: bool, eos: bool) -> RowBatchData {
        RowBatchData { table_id: self.id.clone(), cols, num_rows, eow, eos }
    }

    pub fn row_batch_response(&self, cols: Vec<Column>, num_rows: i64) -> ExecuteScriptResponse {
        ExecuteScriptResponse::batch(self.row_batch(cols, num_rows, false, false))
    }

    pub fn end_response(&self) -> ExecuteScriptResponse {
        ExecuteScriptResponse::batch(self.row_batch(Vec::new(), 0, true, true))
    }
}

pub fn make_error_response(message: &str) -> ExecuteScriptResponse {
    ExecuteScriptResponse::status(Status {
        code: 3,
        message: message.into(),
        error_details: Vec::new(),
    })
}

pub fn make_compiler_error(line: u64, column: u64, message: &str) -> ExecuteScriptResponse {
    ExecuteScriptResponse::status(Status {
        code: 3,
        message: String::new(),
        error_details: vec![ErrorDetails::CompilerError(CompilerError {
            line,
            column,
            message: message.into(),
        })],
    })
}

/// A finite, successful message source.
pub fn source(
    messages: Vec<ExecuteScriptResponse>,
) -> impl Stream<Item = io::Result<ExecuteScriptResponse>> + Send + Unpin {
    stream::iter(messages.into_iter().map(Ok))
}

/// Yields `messages` and then never ends.
pub fn stalled_source(
    messages: Vec<ExecuteScriptResponse>,
) -> impl Stream<Item = io::Result<ExecuteScriptResponse>> + Send + Unpin {
    source(messages).chain(stream::pending())
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Int64Table {
    pub column_name: String,
    pub data: Vec<i64>,
    pub done: bool,
}

pub type Int64Tables = Arc<Mutex<HashMap<String, Int64Table>>>;

struct SingleInt64Handler {
    name: String,
    tables: Int64Tables,
}

impl TableRecordHandler for SingleInt64Handler {
    fn handle_init(&mut self, metadata: &TableMetadata) -> Result<(), HandlerError> {
        if metadata.columns.len() != 1 {
            return Err("handler only accepts a single col".into());
        }
        if metadata.columns[0].data_type != DataType::Int64 {
            return Err("handler only int columns".into());
        }
        self.tables.lock().insert(
            self.name.clone(),
            Int64Table { column_name: metadata.columns[0].name.clone(), ..Default::default() },
        );
        Ok(())
    }

    fn handle_record(&mut self, record: Record) -> Result<(), HandlerError> {
        let value = record.data[0].as_i64().ok_or("expected an int64 value")?;
        if let Some(table) = self.tables.lock().get_mut(&self.name) {
            table.data.push(value);
        }
        Ok(())
    }

    fn handle_done(&mut self) -> Result<(), HandlerError> {
        if let Some(table) = self.tables.lock().get_mut(&self.name) {
            table.done = true;
        }
        Ok(())
    }
}

/// Registry handing every table a single-`INT64`-column handler.
#[derive(Default, Clone)]
pub struct Int64TableMux {
    pub tables: Int64Tables,
}

impl TableMuxer for Int64TableMux {
    fn accept_table(
        &mut self,
        metadata: &TableMetadata,
    ) -> Result<Option<BoxedTableHandler>, HandlerError> {
        Ok(Some(Box::new(SingleInt64Handler {
            name: metadata.name.clone(),
            tables: self.tables.clone(),
        })))
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
