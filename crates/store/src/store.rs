use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use teletap_signal::{LogBatch, MetricBatch, SignalKind, TraceBatch};

use crate::config::StoreConfig;
use crate::ring::RingBuffer;

/// Bounded recent-history store for all three signal kinds.
///
/// Each kind has its own [`RingBuffer`] behind its own `RwLock`: writes on
/// one buffer are mutually exclusive with everything else on that buffer,
/// reads share the lock with other reads, and the three kinds never contend
/// with each other. Batches are held as `Arc` handles, so a read returns a
/// cheap snapshot without copying batch contents.
///
/// One store instance lives for the lifetime of its owning host component;
/// nothing is persisted on drop.
#[derive(Debug)]
pub struct TelemetryStore {
    traces: RwLock<RingBuffer<Arc<TraceBatch>>>,
    metrics: RwLock<RingBuffer<Arc<MetricBatch>>>,
    logs: RwLock<RingBuffer<Arc<LogBatch>>>,
}

/// Count and capacity for one signal kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalStats {
    pub count: usize,
    pub capacity: usize,
}

/// Point-in-time statistics for every buffer in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub traces: SignalStats,
    pub metrics: SignalStats,
    pub logs: SignalStats,
}

impl TelemetryStore {
    /// Create a store with the configured per-kind capacities.
    ///
    /// The config is assumed to have passed
    /// [`StoreConfig::validate`](crate::StoreConfig::validate); a zero
    /// capacity still panics via [`RingBuffer::new`].
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            traces: RwLock::new(RingBuffer::new(config.traces_capacity)),
            metrics: RwLock::new(RingBuffer::new(config.metrics_capacity)),
            logs: RwLock::new(RingBuffer::new(config.logs_capacity)),
        }
    }

    /// Store a trace batch, evicting the oldest when at capacity.
    pub fn add_traces(&self, batch: Arc<TraceBatch>) {
        write_lock(&self.traces).push(batch);
    }

    /// Store a metric batch, evicting the oldest when at capacity.
    pub fn add_metrics(&self, batch: Arc<MetricBatch>) {
        write_lock(&self.metrics).push(batch);
    }

    /// Store a log batch, evicting the oldest when at capacity.
    pub fn add_logs(&self, batch: Arc<LogBatch>) {
        write_lock(&self.logs).push(batch);
    }

    /// Up to `limit` trace batches starting at `offset` (0 = oldest),
    /// oldest → newest. Out-of-range inputs clamp; never an error.
    pub fn recent_traces(&self, limit: usize, offset: usize) -> Vec<Arc<TraceBatch>> {
        read_lock(&self.traces).page(limit, offset)
    }

    /// Up to `limit` metric batches starting at `offset`, oldest → newest.
    pub fn recent_metrics(&self, limit: usize, offset: usize) -> Vec<Arc<MetricBatch>> {
        read_lock(&self.metrics).page(limit, offset)
    }

    /// Up to `limit` log batches starting at `offset`, oldest → newest.
    pub fn recent_logs(&self, limit: usize, offset: usize) -> Vec<Arc<LogBatch>> {
        read_lock(&self.logs).page(limit, offset)
    }

    /// Count and capacity for every kind.
    ///
    /// Each kind is read under its own lock; the three numbers are each
    /// internally consistent but not taken under one global lock.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            traces: self.kind_stats(SignalKind::Trace),
            metrics: self.kind_stats(SignalKind::Metric),
            logs: self.kind_stats(SignalKind::Log),
        }
    }

    /// Count and capacity for one kind.
    pub fn kind_stats(&self, kind: SignalKind) -> SignalStats {
        match kind {
            SignalKind::Trace => {
                let buf = read_lock(&self.traces);
                SignalStats { count: buf.len(), capacity: buf.capacity() }
            }
            SignalKind::Metric => {
                let buf = read_lock(&self.metrics);
                SignalStats { count: buf.len(), capacity: buf.capacity() }
            }
            SignalKind::Log => {
                let buf = read_lock(&self.logs);
                SignalStats { count: buf.len(), capacity: buf.capacity() }
            }
        }
    }
}

// Buffer operations are single push/page calls on opaque values, so a
// poisoned lock never guards half-applied state; recover the inner value
// instead of propagating poison to every later caller.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
