use serde::{Deserialize, Serialize};

/// Lifecycle of a single logical result table.
///
/// An identifier that has never been announced is `AwaitingSchema`; it moves to
/// `Active` on its schema message and to `Finished` on its end-of-stream batch.
/// Both transitions happen exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    /// No schema message has been seen for this identifier.
    AwaitingSchema,

    /// Schema received, handler attached, batches may arrive.
    Active,

    /// End-of-stream batch received. Any further message is an error.
    Finished,
}

/// Scalar kind of a result column.
///
/// Every wire column carries exactly one of these, and every schema column
/// declares one. The decoder refuses to pair two different kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// Boolean values.
    Boolean,

    /// 64-bit signed integers.
    Int64,

    /// 64-bit IEEE floats.
    Float64,

    /// UTF-8 strings.
    String,

    /// Wall-clock timestamp, nanoseconds since the unix epoch.
    #[serde(rename = "TIME64NS")]
    Time64Ns,

    /// Signed duration in nanoseconds.
    #[serde(rename = "DURATION64NS")]
    Duration64Ns,
}

impl DataType {
    /// Short lowercase name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::String => "string",
            DataType::Time64Ns => "time64ns",
            DataType::Duration64Ns => "duration64ns",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic subtype attached to a column.
///
/// Purely informational for this crate: it never affects decoding, but
/// handlers may use it to format or group values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticType {
    #[default]
    Unspecified,
    None,
    TimeNs,
    AgentUid,
    Asid,
    Upid,
    ServiceName,
    PodName,
    PodPhase,
    PodStatus,
    NodeName,
    ContainerName,
    ContainerState,
    ContainerStatus,
    NamespaceName,
    Bytes,
    Percent,
    DurationNs,
    ThroughputPerNs,
    ThroughputBytesPerNs,
    Quantiles,
    DurationNsQuantiles,
    IpAddress,
    Port,
    HttpReqMethod,
    HttpRespStatus,
    HttpRespMessage,
    ScriptReference,
}

/// Why a result stream stopped before its natural end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller cancelled the token or dropped the results handle.
    Caller,

    /// The configured deadline expired while waiting for the next message.
    Deadline,

    /// The server reported the execution as cancelled.
    Upstream,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Caller => f.write_str("cancelled by caller"),
            CancelReason::Deadline => f.write_str("deadline exceeded"),
            CancelReason::Upstream => f.write_str("cancelled by server"),
        }
    }
}

/// What `close()` reports for a stream that ended cleanly without ever
/// announcing a table.
///
/// An empty script legitimately produces no tables, so the default is `Allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyStreamPolicy {
    /// Zero tables is success.
    #[default]
    Allow,

    /// Zero tables is reported as an incomplete stream.
    Reject,
}

/// Callback stage of a table handler, carried by handler failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerStage {
    Init,
    Record,
    Done,
}

impl std::fmt::Display for HandlerStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerStage::Init => f.write_str("init"),
            HandlerStage::Record => f.write_str("record"),
            HandlerStage::Done => f.write_str("done"),
        }
    }
}
