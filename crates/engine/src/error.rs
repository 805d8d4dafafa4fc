use thiserror::Error;

/// Validation failures at request-build time. Both are user-correctable and
/// are reported before any transport activity; no partial state is created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("no indicators found in input")]
    EmptyInput,

    #[error("no lookup services selected")]
    NoServices,
}

/// Stream-level failures. These terminate the aggregation as a whole, unlike
/// per-cell errors, which stay isolated to one (ioc, service) pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("record buffer exceeded {limit} bytes without a record boundary")]
    BufferOverflow { limit: usize },
}

/// Failures produced by a per-service summarizer. Summarizers are required to
/// be pure and total, but the engine does not trust that: any error here is
/// converted into a cell-level error, never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizeError {
    #[error("unexpected payload shape: {0}")]
    UnexpectedPayload(String),

    #[error("invalid severity value: {0}")]
    InvalidSeverity(String),
}
