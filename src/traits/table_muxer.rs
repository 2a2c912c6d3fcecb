use crate::error::HandlerError;
use crate::models::types::table_metadata::TableMetadata;
use crate::traits::table_handler::TableRecordHandler;

/// Handler produced by a [`TableMuxer`].
pub type BoxedTableHandler = Box<dyn TableRecordHandler>;

/// Registry that decides which handler consumes each table.
///
/// Called exactly once per new table identifier, when its schema arrives.
/// Returning `Ok(None)` declines the table; since a table without a consumer
/// cannot be dropped silently, that terminates the stream just like an `Err`.
pub trait TableMuxer: Send {
    fn accept_table(
        &mut self,
        metadata: &TableMetadata,
    ) -> Result<Option<BoxedTableHandler>, HandlerError>;
}

impl<F> TableMuxer for F
where
    F: FnMut(&TableMetadata) -> Result<Option<BoxedTableHandler>, HandlerError> + Send,
{
    fn accept_table(
        &mut self,
        metadata: &TableMetadata,
    ) -> Result<Option<BoxedTableHandler>, HandlerError> {
        self(metadata)
    }
}
