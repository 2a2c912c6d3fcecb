//! Top-level execution status carried by every response.

use serde::{Deserialize, Serialize};

use crate::constants::{STATUS_CANCELLED, STATUS_OK};
use crate::enums::CancelReason;
use crate::error::{Diagnostic, ResultsError};

/// A compiler diagnostic as sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerError {
    pub line: u64,
    pub column: u64,
    pub message: String,
}

/// Structured detail attached to a failed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDetails {
    CompilerError(CompilerError),
}

/// Status of the whole script execution.
///
/// A code of [`STATUS_OK`] means the accompanying result, if any, should be
/// processed. Any other code terminates the stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_details: Vec<ErrorDetails>,
}

impl Status {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn is_ok(&self) -> bool {
        self.code == STATUS_OK
    }

    /// Converts a failed status into the stream's terminal error.
    ///
    /// Returns `None` for a successful status. A server-side cancellation is
    /// [`ResultsError::Cancelled`]; every other failure is an upstream error.
    pub fn to_error(&self) -> Option<ResultsError> {
        if self.is_ok() {
            return None;
        }
        if self.code == STATUS_CANCELLED {
            return Some(ResultsError::Cancelled {
                reason: CancelReason::Upstream,
            });
        }
        let diagnostics = self
            .error_details
            .iter()
            .map(|d| match d {
                ErrorDetails::CompilerError(ce) => Diagnostic {
                    line: ce.line,
                    column: ce.column,
                    message: ce.message.clone(),
                },
            })
            .collect();
        Some(ResultsError::UpstreamExecutionError {
            code: self.code,
            message: self.message.clone(),
            diagnostics,
        })
    }
}
