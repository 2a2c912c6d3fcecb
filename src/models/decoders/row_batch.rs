//! Row batch decoder and record emitter.
//!
//! A batch is decoded in full before any record is produced, so a batch that
//! fails validation delivers no rows at all. Records are then emitted lazily,
//! one row at a time, in arrival order.

use std::sync::Arc;

use minarrow::Table;

use crate::error::{Result, ResultsError};
use crate::models::decoders::column::{decode_column, DecodedColumn};
use crate::models::frames::row_batch::RowBatchData;
use crate::models::types::record::Record;
use crate::models::types::table_metadata::TableMetadata;

/// A validated batch: one decoded column per schema column, all `n_rows` long.
///
/// A batch with no columns and no rows is valid for any schema; it is how the
/// server usually marks end-of-stream.
#[derive(Debug, Clone)]
pub struct DecodedBatch {
    pub columns: Vec<DecodedColumn>,
    pub n_rows: usize,
}

impl DecodedBatch {
    /// Lazy, single-pass iterator over the batch's records.
    pub fn rows<'a>(&'a self, metadata: &Arc<TableMetadata>) -> RowIter<'a> {
        RowIter {
            batch: self,
            metadata: Arc::clone(metadata),
            row: 0,
        }
    }

    /// Columnar view of the batch as a Minarrow `Table` named after the table.
    pub fn to_table(&self, metadata: &TableMetadata) -> Table {
        let cols = self
            .columns
            .iter()
            .zip(metadata.columns.iter())
            .map(|(col, info)| col.to_field_array(info))
            .collect();
        Table {
            name: metadata.name.clone(),
            n_rows: self.n_rows,
            cols,
        }
    }
}

/// Decodes a wire batch against its table's schema.
///
/// Fails on the first column whose kind disagrees with the schema, and when
/// the declared row count disagrees with the column count or any column length.
pub fn decode_batch(metadata: &TableMetadata, batch: &RowBatchData) -> Result<DecodedBatch> {
    let n_rows = usize::try_from(batch.num_rows).map_err(|_| ResultsError::RowCountMismatch {
        table: metadata.name.clone(),
        detail: format!("negative declared row count {}", batch.num_rows),
        expected: 0,
        actual: 0,
    })?;

    if batch.cols.is_empty() && n_rows == 0 {
        return Ok(DecodedBatch { columns: Vec::new(), n_rows });
    }

    if batch.cols.len() != metadata.num_columns() {
        return Err(ResultsError::RowCountMismatch {
            table: metadata.name.clone(),
            detail: "column count".to_string(),
            expected: metadata.num_columns(),
            actual: batch.cols.len(),
        });
    }

    let mut columns = Vec::with_capacity(batch.cols.len());
    for (index, col) in batch.cols.iter().enumerate() {
        let decoded = decode_column(metadata, index, col)?;
        if decoded.len() != n_rows {
            return Err(ResultsError::RowCountMismatch {
                table: metadata.name.clone(),
                detail: format!("length of column '{}'", metadata.columns[index].name),
                expected: n_rows,
                actual: decoded.len(),
            });
        }
        columns.push(decoded);
    }

    Ok(DecodedBatch { columns, n_rows })
}

/// Iterator yielding one [`Record`] per row of a [`DecodedBatch`].
pub struct RowIter<'a> {
    batch: &'a DecodedBatch,
    metadata: Arc<TableMetadata>,
    row: usize,
}

impl Iterator for RowIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.row >= self.batch.n_rows {
            return None;
        }
        let row = self.row;
        self.row += 1;
        let data = self.batch.columns.iter().map(|c| c.datum(row)).collect();
        Some(Record {
            metadata: Arc::clone(&self.metadata),
            data,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.batch.n_rows - self.row;
        (left, Some(left))
    }
}

impl ExactSizeIterator for RowIter<'_> {}
