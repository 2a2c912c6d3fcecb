//! Per-table record consumer.
//!
//! A handler receives exactly one table's lifecycle, in order:
//! `handle_init` once, `handle_record` once per row in arrival order, and
//! `handle_done` once after the table's end-of-stream batch. Any error returned
//! from a callback terminates the whole result stream; callbacks are never
//! retried.

use crate::error::HandlerError;
use crate::models::types::record::Record;
use crate::models::types::table_metadata::TableMetadata;

/// Consumer of one result table's records.
pub trait TableRecordHandler: Send {
    /// Called once with the table's metadata before any record.
    fn handle_init(&mut self, metadata: &TableMetadata) -> Result<(), HandlerError>;

    /// Called once per decoded row.
    fn handle_record(&mut self, record: Record) -> Result<(), HandlerError>;

    /// Called once after the table's final batch.
    fn handle_done(&mut self) -> Result<(), HandlerError>;
}

impl<H: TableRecordHandler + ?Sized> TableRecordHandler for Box<H> {
    fn handle_init(&mut self, metadata: &TableMetadata) -> Result<(), HandlerError> {
        (**self).handle_init(metadata)
    }

    fn handle_record(&mut self, record: Record) -> Result<(), HandlerError> {
        (**self).handle_record(record)
    }

    fn handle_done(&mut self) -> Result<(), HandlerError> {
        (**self).handle_done()
    }
}
