use std::sync::Arc;

use teletap_signal::{LogBatch, MetricBatch, TraceBatch};
use teletap_store::TelemetryStore;

/// The buffering contract the tap requires from a discovered store.
///
/// This is the tap's own view of the store surface: adds only, no reads.
/// Adds are total — they cannot fail, block on I/O, or reject a batch.
pub trait TelemetrySink: Send + Sync {
    fn add_traces(&self, batch: Arc<TraceBatch>);
    fn add_metrics(&self, batch: Arc<MetricBatch>);
    fn add_logs(&self, batch: Arc<LogBatch>);
}

impl TelemetrySink for TelemetryStore {
    fn add_traces(&self, batch: Arc<TraceBatch>) {
        TelemetryStore::add_traces(self, batch);
    }

    fn add_metrics(&self, batch: Arc<MetricBatch>) {
        TelemetryStore::add_metrics(self, batch);
    }

    fn add_logs(&self, batch: Arc<LogBatch>) {
        TelemetryStore::add_logs(self, batch);
    }
}
