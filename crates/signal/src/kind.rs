use std::fmt;

use serde::{Deserialize, Serialize};

/// The three telemetry signal kinds, each buffered independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Trace,
    Metric,
    Log,
}

impl SignalKind {
    /// All kinds, in a fixed order (useful for iterating stats).
    pub const ALL: [SignalKind; 3] = [SignalKind::Trace, SignalKind::Metric, SignalKind::Log];
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Trace => write!(f, "trace"),
            SignalKind::Metric => write!(f, "metric"),
            SignalKind::Log => write!(f, "log"),
        }
    }
}
