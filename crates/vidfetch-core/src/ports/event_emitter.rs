//! Event emitter trait for progress broadcasting.
//!
//! Implementations handle transport details (SSE connections, channels, etc.).

use crate::events::ProgressEvent;

/// Trait for emitting progress events to whoever is listening.
///
/// # Implementations
///
/// - `NoopEmitter` - For tests and CLI contexts that don't need events
/// - `ConnectionRegistry` in the axum adapter - fans out to SSE clients
pub trait ProgressEmitter: Send + Sync {
    /// Emit an event.
    ///
    /// Delivery is best effort. Implementations must swallow per-recipient
    /// failures and return promptly.
    fn emit(&self, event: ProgressEvent);
}

/// A no-op emitter that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    pub const fn new() -> Self {
        Self
    }
}

impl ProgressEmitter for NoopEmitter {
    fn emit(&self, _event: ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_noop_emitter() {
        let emitter = NoopEmitter::new();
        emitter.emit(ProgressEvent::progress(10));
        emitter.emit(ProgressEvent::done(true));
    }

    #[test]
    fn test_emitter_as_trait_object() {
        let emitter: Arc<dyn ProgressEmitter> = Arc::new(NoopEmitter::new());
        emitter.emit(ProgressEvent::done(false));
    }
}
