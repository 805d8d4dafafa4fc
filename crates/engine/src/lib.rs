//! Bulk IOC lookup aggregation: request construction, stream decoding, and
//! per-(ioc, service) state merging.
//!
//! The engine is push-based and single-writer: the transport (out of scope
//! here) delivers byte chunks, the [`RecordDecoder`] reassembles event
//! records across arbitrary chunk boundaries, and [`MergeEngine`] applies
//! each decoded event to exactly one cell, recomputing the owning record's
//! overall severity as it goes. Renderers read via [`MergeEngine::view`].

mod build;
mod decode;
mod error;
mod merge;
mod order;
mod state;
mod summarize;

pub use build::build_request;
pub use decode::RecordDecoder;
pub use error::{BuildError, StreamError, SummarizeError};
pub use merge::MergeEngine;
pub use order::ordered_types;
pub use state::{AggregationState, AggregationView, CellStatus, IocRecord, ServiceCell};
pub use summarize::{Summarizer, SummarizerRegistry};
