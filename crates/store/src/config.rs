use serde::Deserialize;

use teletap_signal::SignalKind;

/// Default number of retained batches per signal kind.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Per-kind buffer capacities for a [`TelemetryStore`](crate::TelemetryStore).
///
/// Deserialized by the host's configuration layer, which is responsible for
/// calling [`validate`](Self::validate) before constructing a store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct StoreConfig {
    /// Number of recent trace batches to keep in memory.
    #[serde(default = "default_capacity")]
    pub traces_capacity: usize,
    /// Number of recent metric batches to keep in memory.
    #[serde(default = "default_capacity")]
    pub metrics_capacity: usize,
    /// Number of recent log batches to keep in memory.
    #[serde(default = "default_capacity")]
    pub logs_capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            traces_capacity: DEFAULT_CAPACITY,
            metrics_capacity: DEFAULT_CAPACITY,
            logs_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Reject capacities that would make a buffer unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, capacity) in [
            (SignalKind::Trace, self.traces_capacity),
            (SignalKind::Metric, self.metrics_capacity),
            (SignalKind::Log, self.logs_capacity),
        ] {
            if capacity == 0 {
                return Err(ConfigError::InvalidCapacity(kind));
            }
        }
        Ok(())
    }

    /// The configured capacity for one signal kind.
    pub fn capacity(&self, kind: SignalKind) -> usize {
        match kind {
            SignalKind::Trace => self.traces_capacity,
            SignalKind::Metric => self.metrics_capacity,
            SignalKind::Log => self.logs_capacity,
        }
    }
}

/// Errors produced by store configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} buffer capacity must be positive")]
    InvalidCapacity(SignalKind),
}
