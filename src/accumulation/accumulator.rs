use std::fmt::Display;

use serde_json::Value;

/// The per-group running state.
/// The grouping stage will:
///   1) evaluate the statement's expression per document into a Value
///   2) call `accumulate` with it
///   3) optionally fold in state from another execution (shard or spill)
///      via `merge(other.partial())`
///   4) after the last document of the group, call `finalize()`
pub trait Accumulator: Send {
    /// Fold one evaluated input into the running state.
    fn accumulate(&mut self, input: Value) -> Result<(), AccumulationError>;

    /// Fold in a partial produced by `partial()` on another instance of the
    /// same operator.
    fn merge(&mut self, partial: Value) -> Result<(), AccumulationError>;

    /// Intermediate state for the merge protocol.
    fn partial(&self) -> Value;

    /// Produce the final result as a document value.
    fn finalize(&self) -> Value;
}

/// Execution-time accumulator failures. Propagated unchanged to the
/// execution engine; never reinterpreted or retried at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccumulationError {
    MemoryLimitExceeded {
        operator: &'static str,
        limit_bytes: usize,
    },
    MalformedPartial {
        operator: &'static str,
        reason: String,
    },
}

impl Display for AccumulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccumulationError::MemoryLimitExceeded {
                operator,
                limit_bytes,
            } => {
                write!(f, "{operator} used too much memory (limit {limit_bytes} bytes)")
            }
            AccumulationError::MalformedPartial { operator, reason } => {
                write!(f, "{operator} received a malformed partial: {reason}")
            }
        }
    }
}
