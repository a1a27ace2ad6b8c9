//! Progress stream handler.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures_util::stream::Stream;

use crate::state::AppState;

/// `GET /progress`: stream progress and completion frames as SSE.
///
/// Every frame is `data: <json>`; see `ProgressEvent` for the payloads.
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    Arc::clone(&state.registry).sse_response()
}
