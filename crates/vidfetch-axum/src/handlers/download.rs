//! Download handler.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use tracing::{debug, info};
use vidfetch_core::{DownloadOutcome, DownloadRequest, ProgressEmitter};

use crate::error::HttpError;
use crate::state::AppState;

/// Body of `POST /download`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartDownloadBody {
    pub url: Option<String>,
    pub format: Option<String>,
    pub audio_quality: Option<String>,
}

/// `POST /download`: run one download and reply with its outcome.
///
/// The request is held open until yt-dlp exits. A body that cannot be parsed
/// is treated like one without a URL.
pub async fn start(
    State(state): State<AppState>,
    body: Result<Json<StartDownloadBody>, JsonRejection>,
) -> Result<Json<DownloadOutcome>, HttpError> {
    let body = body.unwrap_or_else(|rejection| {
        debug!(target: "vidfetch.download", error = %rejection, "Unreadable download body");
        Json(StartDownloadBody::default())
    });
    let Json(StartDownloadBody {
        url,
        format,
        audio_quality,
    }) = body;

    let request = DownloadRequest::from_parts(url, format, audio_quality)?;
    let emitter: Arc<dyn ProgressEmitter> = state.registry.clone();
    let outcome = state.downloader.download(request, emitter).await?;

    info!(target: "vidfetch.download", success = outcome.success, "Download request finished");
    Ok(Json(outcome))
}
