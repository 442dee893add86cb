//! Pass-through ingestion stage for the teletap pipeline.
//!
//! A [`TapStage`] sits between an upstream producer and a downstream
//! [`Consumer`] for each wired signal kind. Every batch is mirrored into a
//! discovered [`TelemetrySink`] (clone or share, depending on the declared
//! downstream capability) and then forwarded unchanged. Buffering never
//! blocks, transforms, or drops forwarded traffic.

mod consumer;
mod sink;
mod stage;

pub use consumer::{Capabilities, Consumer};
pub use sink::TelemetrySink;
pub use stage::TapStage;

use teletap_signal::SignalKind;

/// Errors surfaced by `consume_*` calls.
///
/// The stage itself never fails; the only error source is the downstream
/// consumer, whose rejection is handed back to the caller unchanged. The
/// batch has already been buffered by then (at-least-buffered, not
/// exactly-once-with-delivery).
#[derive(Debug, thiserror::Error)]
pub enum ConsumeError {
    #[error("downstream consumer rejected {kind} batch: {reason}")]
    Downstream { kind: SignalKind, reason: String },
}
