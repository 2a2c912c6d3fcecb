//! Options for consuming one script's result stream.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_UNIQUE_TABLE_NAMES;
use crate::enums::EmptyStreamPolicy;

/// Behaviour knobs for [`ScriptResults`](crate::models::readers::script_results::ScriptResults).
///
/// # Example
///
/// ```rust
/// use tablemux::config::ResultsOptions;
/// use tablemux::enums::EmptyStreamPolicy;
///
/// let options = ResultsOptions::default()
///     .with_empty_stream(EmptyStreamPolicy::Reject)
///     .with_deadline_ms(Some(30_000));
/// assert_eq!(options.deadline().map(|d| d.as_secs()), Some(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsOptions {
    /// Outcome of a stream that ends cleanly without announcing any table.
    /// Default: `Allow`.
    #[serde(default)]
    pub empty_stream: EmptyStreamPolicy,

    /// Deadline for the whole pull loop, in milliseconds from the first call
    /// to `stream()`. Default: `None` (no deadline).
    #[serde(default)]
    pub deadline_ms: Option<u64>,

    /// Reject a schema message whose name is already used by an active table.
    /// Default: `true`.
    #[serde(default = "default_unique_table_names")]
    pub unique_table_names: bool,
}

fn default_unique_table_names() -> bool {
    DEFAULT_UNIQUE_TABLE_NAMES
}

impl Default for ResultsOptions {
    fn default() -> Self {
        Self {
            empty_stream: EmptyStreamPolicy::default(),
            deadline_ms: None,
            unique_table_names: DEFAULT_UNIQUE_TABLE_NAMES,
        }
    }
}

impl ResultsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_stream(mut self, policy: EmptyStreamPolicy) -> Self {
        self.empty_stream = policy;
        self
    }

    pub fn with_deadline_ms(mut self, deadline_ms: Option<u64>) -> Self {
        self.deadline_ms = deadline_ms;
        self
    }

    pub fn with_unique_table_names(mut self, unique: bool) -> Self {
        self.unique_table_names = unique;
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
