//! Shared application state type.

use crate::bootstrap::AxumContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// Holds the connection registry and the downloader behind its port.
pub type AppState = Arc<AxumContext>;
