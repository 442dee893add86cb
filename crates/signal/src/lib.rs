//! Telemetry batch payload types for the teletap pipeline.
//!
//! One batch type per signal kind (traces, metrics, logs). The store and
//! tap treat batches as opaque values: they are stored, evicted, forwarded,
//! and returned, never inspected or modified. `Clone` on a batch is a deep
//! copy of its contents.

mod batch;
mod kind;

pub use batch::{LogBatch, LogRecord, MetricBatch, MetricPoint, Severity, Span, TraceBatch};
pub use kind::SignalKind;
