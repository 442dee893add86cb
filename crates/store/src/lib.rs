//! Bounded in-memory telemetry history.
//!
//! [`TelemetryStore`] keeps the most recent batches per signal kind in three
//! independent [`RingBuffer`]s with drop-oldest eviction. Writers (the
//! ingestion tap) and any number of concurrent readers (inspection tooling)
//! share the store; each kind has its own lock, so buffering traces never
//! contends with metric or log traffic.

mod config;
mod ring;
mod store;

pub use config::{ConfigError, DEFAULT_CAPACITY, StoreConfig};
pub use ring::RingBuffer;
pub use store::{SignalStats, StoreStats, TelemetryStore};
