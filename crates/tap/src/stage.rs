use std::sync::Arc;

use teletap_registry::{ComponentRegistry, TELEMETRY_STORE_ID};
use teletap_signal::{LogBatch, MetricBatch, SignalKind, TraceBatch};
use teletap_store::TelemetryStore;

use crate::consumer::{Capabilities, Consumer};
use crate::sink::TelemetrySink;
use crate::ConsumeError;

/// A wired downstream consumer with its capability cached at wiring time.
struct Wired<T> {
    next: Arc<dyn Consumer<T>>,
    next_mutates: bool,
}

impl<T> Wired<T> {
    fn new(next: Arc<dyn Consumer<T>>) -> Self {
        let next_mutates = next.capabilities().mutates_data;
        Self { next, next_mutates }
    }
}

/// Pass-through stage that mirrors traffic into the telemetry store.
///
/// A deployment wires zero to three signal kinds through one stage. Per
/// batch the stage buffers first (clone when the downstream consumer
/// declared `mutates_data`, share otherwise), then forwards the original
/// batch and returns the downstream result unchanged.
///
/// Store discovery happens exactly once, in [`start`](Self::start). If the
/// store component is registered after the stage starts, this stage runs
/// pass-through-only for its whole lifetime — there is no re-discovery.
/// Hosts that control start order can bypass discovery with
/// [`attach_sink`](Self::attach_sink).
#[derive(Default)]
pub struct TapStage {
    traces: Option<Wired<TraceBatch>>,
    metrics: Option<Wired<MetricBatch>>,
    logs: Option<Wired<LogBatch>>,
    sink: Option<Arc<dyn TelemetrySink>>,
}

impl TapStage {
    /// Create a stage with no wired consumers and no sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the downstream trace consumer. Its capability is queried once,
    /// here, and cached.
    pub fn with_traces(mut self, next: Arc<dyn Consumer<TraceBatch>>) -> Self {
        self.traces = Some(Wired::new(next));
        self
    }

    /// Wire the downstream metric consumer.
    pub fn with_metrics(mut self, next: Arc<dyn Consumer<MetricBatch>>) -> Self {
        self.metrics = Some(Wired::new(next));
        self
    }

    /// Wire the downstream log consumer.
    pub fn with_logs(mut self, next: Arc<dyn Consumer<LogBatch>>) -> Self {
        self.logs = Some(Wired::new(next));
        self
    }

    /// One-shot store discovery against the host registry.
    ///
    /// A missing store is not an error: the stage logs a warning once and
    /// keeps forwarding without buffering for the rest of its lifetime.
    pub fn start(&mut self, registry: &ComponentRegistry) {
        tracing::info!("starting tap stage, looking up telemetry store");
        match registry.find::<TelemetryStore>(TELEMETRY_STORE_ID) {
            Some(store) => {
                tracing::info!("telemetry store found, buffering enabled");
                self.sink = Some(store);
            }
            None => {
                tracing::warn!("telemetry store not found, buffering disabled");
            }
        }
    }

    /// Inject a sink directly, bypassing registry discovery.
    pub fn attach_sink(&mut self, sink: Arc<dyn TelemetrySink>) {
        self.sink = Some(sink);
    }

    /// Whether batches are currently mirrored into a sink.
    pub fn is_buffering(&self) -> bool {
        self.sink.is_some()
    }

    /// The stage's own declared capabilities: it never mutates traffic.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities { mutates_data: false }
    }

    /// Stateless shutdown. Buffered history is owned by the store, not the
    /// stage, and is dropped when the store's owner stops.
    pub fn shutdown(&self) {
        tracing::info!("tap stage shut down");
    }

    /// Buffer and forward one trace batch.
    pub fn consume_traces(&self, batch: Arc<TraceBatch>) -> Result<(), ConsumeError> {
        self.buffer(&batch, self.mutates(SignalKind::Trace), |sink, copy| {
            sink.add_traces(copy);
        });
        match &self.traces {
            Some(wired) => wired.next.consume(batch),
            None => Ok(()),
        }
    }

    /// Buffer and forward one metric batch.
    pub fn consume_metrics(&self, batch: Arc<MetricBatch>) -> Result<(), ConsumeError> {
        self.buffer(&batch, self.mutates(SignalKind::Metric), |sink, copy| {
            sink.add_metrics(copy);
        });
        match &self.metrics {
            Some(wired) => wired.next.consume(batch),
            None => Ok(()),
        }
    }

    /// Buffer and forward one log batch.
    pub fn consume_logs(&self, batch: Arc<LogBatch>) -> Result<(), ConsumeError> {
        self.buffer(&batch, self.mutates(SignalKind::Log), |sink, copy| {
            sink.add_logs(copy);
        });
        match &self.logs {
            Some(wired) => wired.next.consume(batch),
            None => Ok(()),
        }
    }

    /// Cached capability of the wired consumer for `kind`; an unwired kind
    /// cannot mutate anything.
    fn mutates(&self, kind: SignalKind) -> bool {
        match kind {
            SignalKind::Trace => self.traces.as_ref().is_some_and(|w| w.next_mutates),
            SignalKind::Metric => self.metrics.as_ref().is_some_and(|w| w.next_mutates),
            SignalKind::Log => self.logs.as_ref().is_some_and(|w| w.next_mutates),
        }
    }

    /// Mirror one batch into the sink, if any.
    ///
    /// When the downstream consumer mutates data the stored handle is a
    /// fresh deep copy; otherwise it shares the forwarded allocation (the
    /// `mutates_data == false` declaration is the downstream's promise
    /// never to modify the batch).
    fn buffer<T: Clone>(
        &self,
        batch: &Arc<T>,
        next_mutates: bool,
        add: impl FnOnce(&dyn TelemetrySink, Arc<T>),
    ) {
        if let Some(sink) = &self.sink {
            let stored = if next_mutates {
                Arc::new(batch.as_ref().clone())
            } else {
                Arc::clone(batch)
            };
            add(sink.as_ref(), stored);
        }
    }
}
