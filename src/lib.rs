pub mod traits {
    pub mod message_source;
    pub mod table_handler;
    pub mod table_muxer;
}

pub mod models {

    pub mod frames {
        pub mod relation;
        pub mod row_batch;
        pub mod script_response;
        pub mod status;
    }
    pub mod types {
        pub mod record;
        pub mod table_metadata;
    }
    pub mod decoders {
        pub mod column;
        pub mod row_batch;
    }
    pub mod tables {
        pub mod table_stream;
    }
    pub mod readers {
        pub mod script_results;
    }
    pub mod sinks {
        pub mod collector;
    }
}

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use crate::config::ResultsOptions;
pub use crate::error::{ErrorKind, HandlerError, Result, ResultsError};
pub use crate::models::readers::script_results::ScriptResults;
pub use crate::models::types::record::{Datum, Record};
pub use crate::models::types::table_metadata::TableMetadata;
pub use crate::traits::table_handler::TableRecordHandler;
pub use crate::traits::table_muxer::TableMuxer;
