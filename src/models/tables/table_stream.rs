//! # Table State Machine
//!
//! Owns one logical table for the duration of a result stream: its metadata,
//! its handler, and its lifecycle (`Active` → `Finished`). The demultiplexer
//! routes every batch carrying this table's identifier here.
//!
//! A table enters `Active` when its schema arrives and a handler has been
//! accepted and initialised. It enters `Finished` after the handler has seen
//! the end-of-stream batch's rows and its completion callback. Any data after
//! that is rejected.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::enums::{HandlerStage, TableState};
use crate::error::{Result, ResultsError};
use crate::models::decoders::row_batch::decode_batch;
use crate::models::frames::row_batch::RowBatchData;
use crate::models::types::table_metadata::TableMetadata;
use crate::traits::table_muxer::{BoxedTableHandler, TableMuxer};

/// Counters for what a table has received so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableProgress {
    /// Row batches accepted, including the terminating one.
    pub batches: u64,
    /// Records delivered to the handler.
    pub rows: u64,
    /// End-of-window markers seen.
    pub windows: u64,
}

/// Per-table lifecycle state and its handler.
pub struct TableStream {
    metadata: Arc<TableMetadata>,
    state: TableState,
    handler: BoxedTableHandler,
    progress: TableProgress,
}

impl TableStream {
    /// Opens a table: asks `muxer` for a handler and initialises it.
    ///
    /// Declining the table, or failing to produce a handler, is
    /// [`ResultsError::HandlerRejected`]. A failing `handle_init` is
    /// [`ResultsError::HandlerFailure`].
    pub fn open<M>(metadata: TableMetadata, muxer: &mut M) -> Result<Self>
    where
        M: TableMuxer + ?Sized,
    {
        let metadata = Arc::new(metadata);
        let mut handler = match muxer.accept_table(&metadata) {
            Ok(Some(handler)) => handler,
            Ok(None) => {
                return Err(ResultsError::HandlerRejected {
                    table: metadata.name.clone(),
                    source: None,
                })
            }
            Err(e) => {
                return Err(ResultsError::HandlerRejected {
                    table: metadata.name.clone(),
                    source: Some(Arc::from(e)),
                })
            }
        };

        handler
            .handle_init(&metadata)
            .map_err(|e| ResultsError::handler_failure(&metadata.name, HandlerStage::Init, e))?;

        debug!(
            table_id = %metadata.id,
            table = %metadata.name,
            columns = metadata.num_columns(),
            "table opened"
        );

        Ok(Self {
            metadata,
            state: TableState::Active,
            handler,
            progress: TableProgress::default(),
        })
    }

    pub fn metadata(&self) -> &Arc<TableMetadata> {
        &self.metadata
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    pub fn progress(&self) -> TableProgress {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.state == TableState::Finished
    }

    /// Decodes `batch`, hands its rows to the handler in order and, on
    /// end-of-stream, completes the handler and finishes the table.
    ///
    /// The whole batch is validated before the first record is delivered.
    pub fn handle_batch(&mut self, batch: &RowBatchData) -> Result<()> {
        if self.state == TableState::Finished {
            return Err(ResultsError::DataAfterCompletion {
                table: self.metadata.name.clone(),
            });
        }

        let decoded = decode_batch(&self.metadata, batch)?;

        for record in decoded.rows(&self.metadata) {
            self.handler.handle_record(record).map_err(|e| {
                ResultsError::handler_failure(&self.metadata.name, HandlerStage::Record, e)
            })?;
            self.progress.rows += 1;
        }

        self.progress.batches += 1;
        if batch.eow {
            self.progress.windows += 1;
        }

        trace!(
            table_id = %self.metadata.id,
            rows = decoded.n_rows,
            eow = batch.eow,
            eos = batch.eos,
            "batch delivered"
        );

        if batch.eos {
            self.handler
                .handle_done()
                .map_err(|e| ResultsError::handler_failure(&self.metadata.name, HandlerStage::Done, e))?;
            self.state = TableState::Finished;
            debug!(
                table_id = %self.metadata.id,
                table = %self.metadata.name,
                rows = self.progress.rows,
                batches = self.progress.batches,
                "table finished"
            );
        }

        Ok(())
    }
}

impl std::fmt::Debug for TableStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableStream")
            .field("metadata", &self.metadata)
            .field("state", &self.state)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}
