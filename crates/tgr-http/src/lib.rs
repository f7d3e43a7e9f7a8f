//! HTTP surface (axum).
//!
//! One relay route plus a health probe:
//! - `POST /send_message/{channel_name}`: multipart `token`, `files`*, `caption`?
//! - `GET /healthz`

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use tgr_core::relay::Relay;

pub mod error;
pub mod form;
mod handlers;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

pub fn router(relay: Relay, max_upload_bytes: usize) -> Router {
    let state = AppState {
        relay: Arc::new(relay),
    };

    Router::new()
        .route("/send_message/{channel_name}", post(handlers::send_message))
        .route("/healthz", get(handlers::healthz))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
