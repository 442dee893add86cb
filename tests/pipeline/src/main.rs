fn main() {
    println!("Run `cargo test -p teletap-pipeline-tests` to execute pipeline integration tests.");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;

    use teletap_registry::{ComponentRegistry, TELEMETRY_STORE_ID};
    use teletap_signal::{
        LogBatch, LogRecord, MetricBatch, MetricPoint, Severity, SignalKind, Span, TraceBatch,
    };
    use teletap_store::{SignalStats, StoreConfig, TelemetryStore};
    use teletap_tap::{Capabilities, ConsumeError, Consumer, TapStage};

    /// Terminal pipeline stage that counts what reaches it.
    struct Terminal<T> {
        mutates_data: bool,
        delivered: AtomicUsize,
        last: Mutex<Option<Arc<T>>>,
    }

    impl<T> Terminal<T> {
        fn new(mutates_data: bool) -> Arc<Self> {
            Arc::new(Self {
                mutates_data,
                delivered: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn delivered(&self) -> usize {
            self.delivered.load(Ordering::SeqCst)
        }

        fn last(&self) -> Option<Arc<T>> {
            self.last.lock().unwrap().clone()
        }
    }

    impl<T: Send + Sync> Consumer<T> for Terminal<T> {
        fn capabilities(&self) -> Capabilities {
            Capabilities {
                mutates_data: self.mutates_data,
            }
        }

        fn consume(&self, batch: Arc<T>) -> Result<(), ConsumeError> {
            self.delivered.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(batch);
            Ok(())
        }
    }

    /// Terminal stage that rejects every batch.
    struct Rejecting;

    impl Consumer<MetricBatch> for Rejecting {
        fn capabilities(&self) -> Capabilities {
            Capabilities { mutates_data: false }
        }

        fn consume(&self, _batch: Arc<MetricBatch>) -> Result<(), ConsumeError> {
            Err(ConsumeError::Downstream {
                kind: SignalKind::Metric,
                reason: "exporter unavailable".into(),
            })
        }
    }

    fn registered_store(config: &StoreConfig) -> (ComponentRegistry, Arc<TelemetryStore>) {
        let store = Arc::new(TelemetryStore::new(config));
        let registry = ComponentRegistry::new();
        registry.register(TELEMETRY_STORE_ID, store.clone());
        (registry, store)
    }

    fn trace_batch(marker: u64) -> Arc<TraceBatch> {
        Arc::new(TraceBatch {
            resource: "frontend".into(),
            spans: vec![Span {
                trace_id: format!("{marker:032x}"),
                span_id: format!("{marker:016x}"),
                name: format!("request-{marker}"),
                start_unix_nano: marker,
                end_unix_nano: marker + 1,
                attributes: Default::default(),
            }],
        })
    }

    #[test]
    fn full_wire_up_buffers_and_forwards_all_kinds() {
        let (registry, store) = registered_store(&StoreConfig::default());
        let traces = Terminal::<TraceBatch>::new(false);
        let metrics = Terminal::<MetricBatch>::new(false);
        let logs = Terminal::<LogBatch>::new(false);

        let mut stage = TapStage::new()
            .with_traces(traces.clone())
            .with_metrics(metrics.clone())
            .with_logs(logs.clone());
        stage.start(&registry);
        assert!(stage.is_buffering());

        stage.consume_traces(trace_batch(1)).unwrap();
        stage
            .consume_metrics(Arc::new(MetricBatch {
                resource: "frontend".into(),
                points: vec![MetricPoint {
                    name: "http.requests".into(),
                    value: 1.0,
                    ..MetricPoint::default()
                }],
            }))
            .unwrap();
        stage
            .consume_logs(Arc::new(LogBatch {
                resource: "frontend".into(),
                records: vec![LogRecord {
                    severity: Severity::Info,
                    body: "request handled".into(),
                    ..LogRecord::default()
                }],
            }))
            .unwrap();

        assert_eq!(traces.delivered(), 1);
        assert_eq!(metrics.delivered(), 1);
        assert_eq!(logs.delivered(), 1);

        let stats = store.stats();
        for kind_stats in [stats.traces, stats.metrics, stats.logs] {
            assert_eq!(kind_stats.count, 1);
        }
        assert_eq!(store.recent_logs(1, 0)[0].records[0].body, "request handled");
    }

    #[test]
    fn eviction_through_the_full_surface() {
        let (registry, store) = registered_store(&StoreConfig {
            traces_capacity: 3,
            metrics_capacity: 3,
            logs_capacity: 3,
        });
        let traces = Terminal::<TraceBatch>::new(false);
        let mut stage = TapStage::new().with_traces(traces.clone());
        stage.start(&registry);

        for marker in 0..5 {
            stage.consume_traces(trace_batch(marker)).unwrap();
        }

        // Downstream saw everything; the store kept only the newest three.
        assert_eq!(traces.delivered(), 5);
        let markers: Vec<u64> = store
            .recent_traces(10, 0)
            .iter()
            .map(|b| b.spans[0].start_unix_nano)
            .collect();
        assert_eq!(markers, vec![2, 3, 4]);
        assert_eq!(
            store.kind_stats(SignalKind::Trace),
            SignalStats { count: 3, capacity: 3 }
        );
    }

    #[test]
    fn read_only_downstream_shares_the_buffered_allocation() {
        let (registry, store) = registered_store(&StoreConfig::default());
        let traces = Terminal::<TraceBatch>::new(false);
        let mut stage = TapStage::new().with_traces(traces.clone());
        stage.start(&registry);

        let batch = trace_batch(7);
        stage.consume_traces(batch.clone()).unwrap();

        let buffered = store.recent_traces(1, 0).remove(0);
        let forwarded = traces.last().unwrap();
        assert!(Arc::ptr_eq(&buffered, &forwarded));
        assert!(Arc::ptr_eq(&buffered, &batch));
    }

    #[test]
    fn mutating_downstream_gets_an_isolated_buffer_copy() {
        let (registry, store) = registered_store(&StoreConfig::default());
        let logs = Terminal::<LogBatch>::new(true);
        let mut stage = TapStage::new().with_logs(logs.clone());
        stage.start(&registry);

        stage
            .consume_logs(Arc::new(LogBatch {
                resource: "db".into(),
                records: vec![LogRecord {
                    body: "original".into(),
                    ..LogRecord::default()
                }],
            }))
            .unwrap();

        let buffered = store.recent_logs(1, 0).remove(0);
        let mut forwarded = logs.last().unwrap();
        assert!(!Arc::ptr_eq(&buffered, &forwarded));

        Arc::make_mut(&mut forwarded).records[0].body = "scrubbed".into();
        assert_eq!(buffered.records[0].body, "original");
    }

    #[test]
    fn missing_store_runs_pass_through_only() {
        let registry = ComponentRegistry::new();
        let traces = Terminal::<TraceBatch>::new(false);
        let mut stage = TapStage::new().with_traces(traces.clone());
        stage.start(&registry);
        assert!(!stage.is_buffering());

        for marker in 0..10 {
            stage.consume_traces(trace_batch(marker)).unwrap();
        }
        assert_eq!(traces.delivered(), 10);

        // Registering the store afterwards does not revive this stage:
        // discovery is one-shot.
        registry.register(
            TELEMETRY_STORE_ID,
            Arc::new(TelemetryStore::new(&StoreConfig::default())),
        );
        stage.consume_traces(trace_batch(10)).unwrap();
        assert!(!stage.is_buffering());
        assert_eq!(traces.delivered(), 11);
    }

    #[test]
    fn downstream_rejection_reaches_caller_after_buffering() {
        let (registry, store) = registered_store(&StoreConfig::default());
        let mut stage = TapStage::new().with_metrics(Arc::new(Rejecting));
        stage.start(&registry);

        let err = stage
            .consume_metrics(Arc::new(MetricBatch::default()))
            .unwrap_err();
        assert!(err.to_string().contains("exporter unavailable"));

        // Buffering happened before the forwarding failure.
        assert_eq!(store.kind_stats(SignalKind::Metric).count, 1);
    }

    #[test]
    fn concurrent_pipeline_and_readers() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 100;

        let (registry, store) = registered_store(&StoreConfig {
            traces_capacity: THREADS * PER_THREAD,
            metrics_capacity: THREADS * PER_THREAD,
            logs_capacity: THREADS * PER_THREAD,
        });
        let traces = Terminal::<TraceBatch>::new(false);
        let mut stage = TapStage::new().with_traces(traces.clone());
        stage.start(&registry);
        let stage = Arc::new(stage);

        let mut handles = Vec::new();
        for t in 0..THREADS {
            let stage = Arc::clone(&stage);
            handles.push(thread::spawn(move || {
                for i in 0..PER_THREAD {
                    stage
                        .consume_traces(trace_batch((t * PER_THREAD + i) as u64))
                        .unwrap();
                }
            }));
        }
        for _ in 0..4 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for _ in 0..200 {
                    let stats = store.kind_stats(SignalKind::Trace);
                    assert!(stats.count <= THREADS * PER_THREAD);
                    let window = store.recent_traces(50, 0);
                    assert!(window.len() <= 50);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(traces.delivered(), THREADS * PER_THREAD);
        assert_eq!(
            store.kind_stats(SignalKind::Trace).count,
            THREADS * PER_THREAD
        );
    }

    #[test]
    fn shutdown_is_stateless() {
        let (registry, store) = registered_store(&StoreConfig::default());
        let mut stage = TapStage::new();
        stage.start(&registry);

        stage.consume_traces(trace_batch(1)).unwrap();
        stage.shutdown();

        // The store outlives the stage; history is still readable.
        assert_eq!(store.kind_stats(SignalKind::Trace).count, 1);
    }
}
