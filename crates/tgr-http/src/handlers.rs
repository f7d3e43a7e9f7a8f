use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use tgr_core::errors::Error;

use crate::{error::ApiError, form::SendMessageForm, AppState};

pub async fn send_message(
    State(state): State<AppState>,
    Path(channel_name): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let multipart = multipart.map_err(|e| {
        tracing::warn!(channel = %channel_name, "rejected form: {}", e.body_text());
        Error::InvalidForm(e.body_text())
    })?;

    let form = SendMessageForm::read(multipart).await.map_err(|e| {
        tracing::error!("Error processing files: {e}");
        e
    })?;
    let request = form.into_request(channel_name, &state.relay).map_err(|e| {
        tracing::warn!("{e}");
        e
    })?;

    let body = state.relay.relay(request).await.map_err(|e| {
        if e.is_client_error() {
            tracing::warn!(status = e.status_code(), "relay rejected: {e}");
        } else {
            tracing::error!(status = e.status_code(), "relay failed: {e}");
        }
        e
    })?;
    Ok(Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
