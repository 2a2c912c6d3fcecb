//! # Result Stream Errors
//!
//! Unified error type for everything that can terminate a script's result stream.
//!
//! Every variant is terminal: the first one raised aborts further processing and
//! is the value `close()` reports. Opaque sources are held behind `Arc` so the
//! same error can be handed back from the call that raised it and again from
//! `close()`.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::enums::{CancelReason, DataType, HandlerStage};

/// Error type returned by user-supplied handlers and registries.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, ResultsError>;

/// A single compiler diagnostic attached to an upstream failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u64,
    pub column: u64,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} {}", self.line, self.column, self.message)
    }
}

/// Closed classification of [`ResultsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateTableSchema,
    DataBeforeSchema,
    DataAfterCompletion,
    ColumnTypeMismatch,
    RowCountMismatch,
    HandlerRejected,
    HandlerFailure,
    IncompleteStream,
    UpstreamExecutionError,
    Cancelled,
    Transport,
}

/// Terminal error of a result stream.
#[derive(Error, Debug, Clone)]
pub enum ResultsError {
    /// Schema message for a table identifier that is already known.
    #[error("duplicate table metadata for table id '{table_id}'")]
    DuplicateTableSchema { table_id: String },

    /// Schema message whose name collides with a table that is still active.
    #[error("table name '{name}' is already in use by active table '{active_id}'")]
    DuplicateTableName { name: String, active_id: String },

    /// Data message for a table identifier that never sent its schema.
    #[error("received data for table id '{table_id}' before its metadata")]
    DataBeforeSchema { table_id: String },

    /// Data message for a table that already received its end-of-stream batch.
    #[error("received data for table '{table}' after end of stream")]
    DataAfterCompletion { table: String },

    /// Wire column kind disagrees with the schema-declared kind.
    #[error(
        "column {index} ('{column}') of table '{table}': expected {expected}, received {actual}"
    )]
    ColumnTypeMismatch {
        table: String,
        column: String,
        index: usize,
        expected: DataType,
        actual: DataType,
    },

    /// Declared row count disagrees with a column's length, or the batch
    /// carries a different number of columns than the schema.
    #[error("row count mismatch in table '{table}' ({detail}): expected {expected}, found {actual}")]
    RowCountMismatch {
        table: String,
        detail: String,
        expected: usize,
        actual: usize,
    },

    /// The registry declined, or failed, to supply a handler for a table.
    #[error("no handler accepted table '{table}'{}", reason_suffix(.source))]
    HandlerRejected {
        table: String,
        #[source]
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    /// A handler callback returned an error.
    #[error("handler for table '{table}' failed during {stage}: {source}")]
    HandlerFailure {
        table: String,
        stage: HandlerStage,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The stream ended while tables were still active, or ended with no
    /// tables under [`EmptyStreamPolicy::Reject`](crate::enums::EmptyStreamPolicy).
    #[error("stream ended before tables finished: [{}]", .pending.join(", "))]
    IncompleteStream { pending: Vec<String> },

    /// The top-level status reported a failed compile or execution.
    #[error("script execution failed (code {code}): {message}{}", diagnostics_suffix(.diagnostics))]
    UpstreamExecutionError {
        code: i32,
        message: String,
        diagnostics: Vec<Diagnostic>,
    },

    /// Caller cancellation or deadline expiry.
    #[error("result stream {reason}")]
    Cancelled { reason: CancelReason },

    /// The inbound message source failed.
    #[error("transport error: {0}")]
    Transport(#[source] Arc<io::Error>),
}

fn reason_suffix(source: &Option<Arc<dyn std::error::Error + Send + Sync>>) -> String {
    match source {
        Some(e) => format!(": {e}"),
        None => String::new(),
    }
}

fn diagnostics_suffix(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
    format!(" [{}]", rendered.join("; "))
}

impl ResultsError {
    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResultsError::DuplicateTableSchema { .. } | ResultsError::DuplicateTableName { .. } => {
                ErrorKind::DuplicateTableSchema
            }
            ResultsError::DataBeforeSchema { .. } => ErrorKind::DataBeforeSchema,
            ResultsError::DataAfterCompletion { .. } => ErrorKind::DataAfterCompletion,
            ResultsError::ColumnTypeMismatch { .. } => ErrorKind::ColumnTypeMismatch,
            ResultsError::RowCountMismatch { .. } => ErrorKind::RowCountMismatch,
            ResultsError::HandlerRejected { .. } => ErrorKind::HandlerRejected,
            ResultsError::HandlerFailure { .. } => ErrorKind::HandlerFailure,
            ResultsError::IncompleteStream { .. } => ErrorKind::IncompleteStream,
            ResultsError::UpstreamExecutionError { .. } => ErrorKind::UpstreamExecutionError,
            ResultsError::Cancelled { .. } => ErrorKind::Cancelled,
            ResultsError::Transport(_) => ErrorKind::Transport,
        }
    }

    pub(crate) fn handler_failure(table: &str, stage: HandlerStage, source: HandlerError) -> Self {
        ResultsError::HandlerFailure {
            table: table.to_string(),
            stage,
            source: Arc::from(source),
        }
    }
}

impl From<io::Error> for ResultsError {
    fn from(e: io::Error) -> Self {
        ResultsError::Transport(Arc::new(e))
    }
}
