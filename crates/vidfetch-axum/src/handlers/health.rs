//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;
use vidfetch_core::platform_name;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum HealthBody {
    #[serde(rename_all = "camelCase")]
    Ok {
        platform: &'static str,
        binary_path: String,
    },
    Error {
        message: String,
    },
}

/// `GET /health`: report whether yt-dlp resolves on this host.
pub async fn check(State(state): State<AppState>) -> Response {
    match state.downloader.resolve_binary() {
        Ok(path) => (
            StatusCode::OK,
            Json(HealthBody::Ok {
                platform: platform_name(),
                binary_path: path.display().to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            warn!(target: "vidfetch.ytdlp", error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthBody::Error {
                    message: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
