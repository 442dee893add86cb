use std::sync::Arc;

use crate::ConsumeError;

/// Declared, lifetime-fixed properties of a pipeline component.
///
/// `mutates_data` is a binding promise: a consumer declaring `false` must
/// never modify a batch after receiving it, which is what lets the tap
/// share the buffered handle instead of deep-copying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub mutates_data: bool,
}

/// A downstream pipeline stage that accepts batches of one signal kind.
///
/// [`capabilities`](Self::capabilities) is queried once when the consumer
/// is wired into a [`TapStage`](crate::TapStage) and cached for the
/// stage's lifetime — it must return the same value on every call.
pub trait Consumer<T>: Send + Sync {
    /// The consumer's declared capabilities.
    fn capabilities(&self) -> Capabilities;

    /// Accept one batch. An `Err` is reported to the upstream caller but
    /// does not undo any buffering that already happened.
    fn consume(&self, batch: Arc<T>) -> Result<(), ConsumeError>;
}
