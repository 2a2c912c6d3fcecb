use futures_core::Stream;
use std::io;

use crate::models::frames::script_response::ExecuteScriptResponse;

/// Universal trait alias for any pull-based source of result messages.
///
/// Implemented automatically for any [`Stream`] yielding
/// `Result<ExecuteScriptResponse, io::Error>` that is `Send + Unpin`. The
/// stream ending (`None`) is a clean end of the result stream; an `Err` item is
/// a transport failure.
///
/// Because it is (only) a set of bounds, a transport adapter plugs in without
/// dynamic dispatch.
pub trait MessageSource: Stream<Item = Result<ExecuteScriptResponse, io::Error>> + Send + Unpin {}

impl<T> MessageSource for T where
    T: Stream<Item = Result<ExecuteScriptResponse, io::Error>> + Send + Unpin
{
}
