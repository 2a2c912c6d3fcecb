//! # Script Result Demultiplexer
//!
//! Consumes the single ordered message stream of one script execution and
//! fans it out to one [`TableStream`] per table identifier.
//!
//! - Top-level failed statuses terminate the stream before anything else.
//! - Schema messages create table state; data messages are routed to it.
//! - The first error of any kind is terminal: it is returned from the call that
//!   raised it, from every later call, and from [`ScriptResults::close`].
//! - Cancellation is cooperative. It is checked while waiting for the next
//!   message and again before each message is processed.
//!
//! One message is in flight at a time. The table map is owned by this value
//! for the lifetime of one execution, so no locking is involved.

use std::collections::HashMap;

use futures_util::StreamExt;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ResultsOptions;
use crate::constants::DEFAULT_TABLE_CAPACITY;
use crate::enums::{CancelReason, EmptyStreamPolicy, TableState};
use crate::error::{Result, ResultsError};
use crate::models::frames::relation::QueryMetadata;
use crate::models::frames::row_batch::RowBatchData;
use crate::models::frames::script_response::{
    ExecuteScriptResponse, QueryExecutionStats, ScriptResult,
};
use crate::models::tables::table_stream::{TableProgress, TableStream};
use crate::traits::message_source::MessageSource;
use crate::traits::table_muxer::TableMuxer;

/// Result stream of one script execution.
///
/// # Examples
///
/// ```rust,no_run
/// use futures_util::stream;
/// use tablemux::config::ResultsOptions;
/// use tablemux::models::frames::script_response::ExecuteScriptResponse;
/// use tablemux::models::readers::script_results::ScriptResults;
/// use tablemux::models::sinks::collector::TableCollector;
///
/// # async fn example(messages: Vec<ExecuteScriptResponse>) -> tablemux::error::Result<()> {
/// let collector = TableCollector::new();
/// let tables = collector.tables();
/// let source = stream::iter(messages.into_iter().map(Ok));
///
/// let mut results = ScriptResults::new(source, collector, ResultsOptions::default());
/// results.stream().await?;
/// results.close()?;
///
/// for name in tables.names() {
///     println!("{name}: {} rows", tables.records(&name).len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ScriptResults<S, M>
where
    S: MessageSource,
    M: TableMuxer,
{
    source: S,
    muxer: M,
    options: ResultsOptions,
    tables: HashMap<String, TableStream>,
    opened: usize,
    finished: usize,
    query_id: Option<String>,
    stats: Option<QueryExecutionStats>,
    first_error: Option<ResultsError>,
    cancel: CancellationToken,
    deadline: Option<Instant>,
    source_ended: bool,
    closed: Option<Result<()>>,
}

impl<S, M> ScriptResults<S, M>
where
    S: MessageSource,
    M: TableMuxer,
{
    /// Create a demultiplexer over `source`, obtaining table handlers from `muxer`.
    pub fn new(source: S, muxer: M, options: ResultsOptions) -> Self {
        Self {
            source,
            muxer,
            options,
            tables: HashMap::with_capacity(DEFAULT_TABLE_CAPACITY),
            opened: 0,
            finished: 0,
            query_id: None,
            stats: None,
            first_error: None,
            cancel: CancellationToken::new(),
            deadline: None,
            source_ended: false,
            closed: None,
        }
    }

    /// Ties this stream to an existing token, e.g. a child of the caller's
    /// request-scoped token.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this stream. Cloning it is cheap.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn options(&self) -> &ResultsOptions {
        &self.options
    }

    /// First non-empty query identifier seen on the stream.
    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    /// Latest execution statistics reported by the server.
    pub fn stats(&self) -> Option<QueryExecutionStats> {
        self.stats
    }

    /// Number of tables announced so far.
    pub fn table_count(&self) -> usize {
        self.opened
    }

    /// Number of tables that reached `Finished`.
    pub fn finished_count(&self) -> usize {
        self.finished
    }

    /// True when at least one table was announced and every announced table finished.
    pub fn is_done(&self) -> bool {
        self.opened > 0 && self.finished == self.opened
    }

    /// Lifecycle state of `table_id`; identifiers never seen are `AwaitingSchema`.
    pub fn table_state(&self, table_id: &str) -> TableState {
        self.tables
            .get(table_id)
            .map_or(TableState::AwaitingSchema, TableStream::state)
    }

    pub fn table_progress(&self, table_id: &str) -> Option<TableProgress> {
        self.tables.get(table_id).map(TableStream::progress)
    }

    /// First terminal error recorded, if any.
    pub fn error(&self) -> Option<&ResultsError> {
        self.first_error.as_ref()
    }

    /// Consumes exactly one message.
    ///
    /// Once any error has been returned, every later call returns that same
    /// error without looking at the message. A cancelled token stops
    /// processing before the message reaches any handler.
    pub fn process_message(&mut self, msg: ExecuteScriptResponse) -> Result<()> {
        if let Some(err) = &self.first_error {
            return Err(err.clone());
        }
        if self.closed.is_some() {
            return Err(ResultsError::Cancelled {
                reason: CancelReason::Caller,
            });
        }
        if self.cancel.is_cancelled() {
            let err = ResultsError::Cancelled {
                reason: CancelReason::Caller,
            };
            self.record_error(err.clone());
            return Err(err);
        }
        let outcome = self.dispatch(msg);
        if let Err(e) = &outcome {
            self.record_error(e.clone());
        }
        outcome
    }

    fn dispatch(&mut self, msg: ExecuteScriptResponse) -> Result<()> {
        if self.query_id.is_none() && !msg.query_id.is_empty() {
            self.query_id = Some(msg.query_id);
        }

        if let Some(err) = msg.status.as_ref().and_then(|s| s.to_error()) {
            return Err(err);
        }

        match msg.result {
            None => Ok(()),
            Some(ScriptResult::MetaData(metadata)) => self.open_table(metadata),
            Some(ScriptResult::Data(data)) => {
                if let Some(stats) = data.execution_stats {
                    self.stats = Some(stats);
                }
                match data.batch {
                    Some(batch) => self.route_batch(batch),
                    None => Ok(()),
                }
            }
        }
    }

    fn open_table(&mut self, metadata: QueryMetadata) -> Result<()> {
        if self.tables.contains_key(&metadata.id) {
            return Err(ResultsError::DuplicateTableSchema {
                table_id: metadata.id,
            });
        }

        if self.options.unique_table_names {
            if let Some(active) = self.tables.values().find(|t| {
                t.state() == TableState::Active && t.metadata().name == metadata.name
            }) {
                return Err(ResultsError::DuplicateTableName {
                    name: metadata.name,
                    active_id: active.metadata().id.clone(),
                });
            }
        }

        let id = metadata.id.clone();
        let table = TableStream::open(metadata.into(), &mut self.muxer)?;
        self.tables.insert(id, table);
        self.opened += 1;
        Ok(())
    }

    fn route_batch(&mut self, batch: RowBatchData) -> Result<()> {
        let Some(table) = self.tables.get_mut(&batch.table_id) else {
            return Err(ResultsError::DataBeforeSchema {
                table_id: batch.table_id,
            });
        };

        table.handle_batch(&batch)?;

        if table.is_finished() {
            self.finished += 1;
        }
        Ok(())
    }

    fn record_error(&mut self, err: ResultsError) {
        if self.first_error.is_none() {
            warn!(kind = ?err.kind(), error = %err, "result stream aborted");
            self.first_error = Some(err);
            self.cancel.cancel();
        }
    }

    /// Pulls and processes messages until the source ends, an error occurs,
    /// or the stream is cancelled.
    ///
    /// A clean end of the source returns `Ok(())` even if tables are still
    /// active; [`close`](Self::close) reports that.
    pub async fn stream(&mut self) -> Result<()> {
        if let Some(err) = &self.first_error {
            return Err(err.clone());
        }
        if self.deadline.is_none() {
            self.deadline = self.options.deadline().map(|d| Instant::now() + d);
        }
        let deadline = self.deadline;

        loop {
            let next = tokio::select! {
                biased;

                _ = self.cancel.cancelled() => Err(ResultsError::Cancelled {
                    reason: CancelReason::Caller,
                }),

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    Err(ResultsError::Cancelled {
                        reason: CancelReason::Deadline,
                    })
                }

                item = self.source.next() => Ok(item),
            };

            match next {
                Err(e) => {
                    self.record_error(e.clone());
                    return Err(e);
                }
                Ok(None) => {
                    self.source_ended = true;
                    debug!(
                        tables = self.opened,
                        finished = self.finished,
                        "result stream ended"
                    );
                    return Ok(());
                }
                Ok(Some(Err(io_err))) => {
                    let e = ResultsError::from(io_err);
                    self.record_error(e.clone());
                    return Err(e);
                }
                Ok(Some(Ok(msg))) => self.process_message(msg)?,
            }
        }
    }

    /// Finalizes the stream and releases all per-table state.
    ///
    /// Reports, in order of precedence: the first recorded error; cancellation
    /// before the source ended while tables were still active; any other end
    /// with tables still active; a clean end with no tables under
    /// [`EmptyStreamPolicy::Reject`].
    ///
    /// Calling it again returns the same outcome and touches no handler.
    pub fn close(&mut self) -> Result<()> {
        if let Some(outcome) = &self.closed {
            return outcome.clone();
        }

        let outcome = self.finalize();
        self.tables.clear();
        self.cancel.cancel();

        if let Err(e) = &outcome {
            debug!(kind = ?e.kind(), "result stream closed with error");
        } else {
            debug!(tables = self.opened, "result stream closed");
        }
        self.closed = Some(outcome.clone());
        outcome
    }

    fn finalize(&self) -> Result<()> {
        if let Some(err) = &self.first_error {
            return Err(err.clone());
        }

        let mut pending: Vec<String> = self
            .tables
            .values()
            .filter(|t| t.state() == TableState::Active)
            .map(|t| t.metadata().name.clone())
            .collect();
        pending.sort();

        if !pending.is_empty() {
            if !self.source_ended && self.cancel.is_cancelled() {
                return Err(ResultsError::Cancelled {
                    reason: CancelReason::Caller,
                });
            }
            return Err(ResultsError::IncompleteStream { pending });
        }

        if self.opened == 0 && self.options.empty_stream == EmptyStreamPolicy::Reject {
            return Err(ResultsError::IncompleteStream { pending });
        }

        Ok(())
    }
}

impl<S, M> Drop for ScriptResults<S, M>
where
    S: MessageSource,
    M: TableMuxer,
{
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
