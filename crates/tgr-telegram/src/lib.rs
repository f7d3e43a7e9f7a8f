//! Telegram Bot API adapter (reqwest).
//!
//! Implements the `tgr-core` MediaGroupSender port over `sendMediaGroup`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use tgr_core::{domain::MediaGroup, errors::Error, ports::MediaGroupSender, Result};

#[derive(Clone, Debug)]
pub struct TelegramClient {
    api_base: String,
    http: reqwest::Client,
}

impl TelegramClient {
    /// Build a client. Without `timeout` an outbound call may wait indefinitely.
    pub fn new(api_base: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn method_url(&self, credential: &str, method: &str) -> String {
        format!("{}/bot{credential}/{method}", self.api_base)
    }

    fn form(group: MediaGroup) -> Result<Form> {
        let media = group.media_json()?;
        let mut form = Form::new()
            .text("chat_id", group.chat_id)
            .text("media", media);

        for att in group.attachments {
            let mut part = Part::bytes(att.content)
                .mime_str(&att.mime_type)
                .map_err(|e| Error::Internal(format!("multipart error: {}", e.without_url())))?;
            if let Some(name) = att.filename {
                part = part.file_name(name);
            }
            form = form.part(att.key, part);
        }

        Ok(form)
    }
}

/// Map a reqwest failure. The URL embeds the bot credential and is stripped.
fn map_send_err(e: reqwest::Error) -> Error {
    if e.is_builder() {
        return Error::Internal(format!("telegram request error: {}", e.without_url()));
    }
    Error::Transport(format!("telegram request error: {}", e.without_url()))
}

#[async_trait]
impl MediaGroupSender for TelegramClient {
    async fn send_media_group(
        &self,
        credential: &str,
        group: MediaGroup,
    ) -> Result<serde_json::Value> {
        let form = Self::form(group)?;

        let resp = self
            .http
            .post(self.method_url(credential, "sendMediaGroup"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                let err = map_send_err(e);
                tracing::error!("Request error to Telegram API: {err}");
                err
            })?;

        let status = resp.status();
        if !status.is_success() {
            let headers = resp.headers().clone();
            let body = resp.text().await.map_err(|e| {
                let err = map_send_err(e);
                tracing::error!("Failed reading Telegram error body: {err}");
                err
            })?;
            tracing::error!("HTTPStatusError: {}", status.as_u16());
            tracing::error!("Response headers: {headers:?}");
            tracing::error!("Response body: {body}");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(map_send_err)?;
        tracing::debug!("{}", String::from_utf8_lossy(&bytes));

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Exception: {e}");
            Error::Json(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, sync::Arc};

    use axum::{
        extract::{Multipart, Path, State},
        http::StatusCode,
        response::IntoResponse,
        routing::post,
        Router,
    };
    use serde_json::{json, Value};
    use tokio::{net::TcpListener, sync::Mutex};

    use tgr_core::{
        config::DEFAULT_TELEGRAM_API_BASE,
        domain::{Attachment, MediaItem},
        media::MediaCategory,
    };

    use super::*;

    #[derive(Clone, Debug, Default)]
    struct Captured {
        token: String,
        fields: Vec<(String, Option<String>, Option<String>, Vec<u8>)>,
    }

    #[derive(Clone)]
    struct Mock {
        status: StatusCode,
        body: &'static str,
        seen: Arc<Mutex<Option<Captured>>>,
    }

    async fn mock_send(
        State(mock): State<Mock>,
        Path(bot): Path<String>,
        mut multipart: Multipart,
    ) -> impl IntoResponse {
        let mut captured = Captured {
            token: bot.trim_start_matches("bot").to_string(),
            ..Default::default()
        };
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.unwrap().to_vec();
            captured.fields.push((name, file_name, content_type, data));
        }
        *mock.seen.lock().await = Some(captured);
        (mock.status, mock.body)
    }

    async fn spawn_mock(status: StatusCode, body: &'static str) -> (SocketAddr, Mock) {
        let mock = Mock {
            status,
            body,
            seen: Arc::new(Mutex::new(None)),
        };
        let app = Router::new()
            .route("/{bot}/sendMediaGroup", post(mock_send))
            .with_state(mock.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, mock)
    }

    fn sample_group() -> MediaGroup {
        MediaGroup {
            chat_id: "@my_channel".to_string(),
            media: vec![
                MediaItem {
                    category: MediaCategory::Photo,
                    media: "attach://file0".to_string(),
                    caption: Some("hello".to_string()),
                },
                MediaItem {
                    category: MediaCategory::Video,
                    media: "attach://file1".to_string(),
                    caption: None,
                },
            ],
            attachments: vec![
                Attachment {
                    key: "file0".to_string(),
                    filename: Some("a.jpg".to_string()),
                    mime_type: "image/jpeg".to_string(),
                    content: b"jpeg-bytes".to_vec(),
                },
                Attachment {
                    key: "file1".to_string(),
                    filename: Some("b.mp4".to_string()),
                    mime_type: "video/mp4".to_string(),
                    content: b"mp4-bytes".to_vec(),
                },
            ],
        }
    }

    #[test]
    fn builds_method_url() {
        let client = TelegramClient::new("https://api.telegram.org/", None).unwrap();
        assert_eq!(
            client.method_url("123:abc", "sendMediaGroup"),
            "https://api.telegram.org/bot123:abc/sendMediaGroup"
        );

        let client = TelegramClient::new(DEFAULT_TELEGRAM_API_BASE, None).unwrap();
        assert_eq!(
            client.method_url("t", "sendMediaGroup"),
            "https://api.telegram.org/bott/sendMediaGroup"
        );
    }

    #[tokio::test]
    async fn forwards_fields_and_files() {
        let (addr, mock) =
            spawn_mock(StatusCode::OK, r#"{"ok":true,"result":[{"message_id":1}]}"#).await;
        let client = TelegramClient::new(format!("http://{addr}"), None).unwrap();

        let body = client
            .send_media_group("123:abc", sample_group())
            .await
            .unwrap();
        assert_eq!(body, json!({ "ok": true, "result": [{ "message_id": 1 }] }));

        let seen = mock.seen.lock().await.clone().unwrap();
        assert_eq!(seen.token, "123:abc");

        let field = |name: &str| {
            seen.fields
                .iter()
                .find(|f| f.0 == name)
                .cloned()
                .unwrap_or_else(|| panic!("missing field {name}"))
        };
        assert_eq!(field("chat_id").3, b"@my_channel");
        let media: Value = serde_json::from_slice(&field("media").3).unwrap();
        assert_eq!(
            media,
            json!([
                { "type": "photo", "media": "attach://file0", "caption": "hello" },
                { "type": "video", "media": "attach://file1" }
            ])
        );

        let f0 = field("file0");
        assert_eq!(f0.1.as_deref(), Some("a.jpg"));
        assert_eq!(f0.2.as_deref(), Some("image/jpeg"));
        assert_eq!(f0.3, b"jpeg-bytes");
        let f1 = field("file1");
        assert_eq!(f1.2.as_deref(), Some("video/mp4"));
        assert_eq!(f1.3, b"mp4-bytes");
    }

    #[tokio::test]
    async fn relays_upstream_rejection_verbatim() {
        let raw = r#"{"ok":false,"description":"Forbidden"}"#;
        let (addr, _) = spawn_mock(StatusCode::FORBIDDEN, raw).await;
        let client = TelegramClient::new(format!("http://{addr}"), None).unwrap();

        let err = client
            .send_media_group("123:abc", sample_group())
            .await
            .unwrap_err();
        match err {
            Error::Upstream { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, raw);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_refused_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = TelegramClient::new(format!("http://{addr}"), None).unwrap();
        let err = client
            .send_media_group("secret-token", sample_group())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "{err:?}");
        assert_eq!(err.status_code(), 503);
        assert!(!err.to_string().contains("secret-token"));
    }

    #[tokio::test]
    async fn upstream_timeout_is_transport_failure() {
        let app = Router::new().route(
            "/{bot}/sendMediaGroup",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client =
            TelegramClient::new(format!("http://{addr}"), Some(Duration::from_millis(200)))
                .unwrap();
        let err = client
            .send_media_group("123:abc", sample_group())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "{err:?}");
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.detail(), "Service unavailable");
    }

    #[tokio::test]
    async fn non_json_success_is_internal_error() {
        let (addr, _) = spawn_mock(StatusCode::OK, "<html>ok</html>").await;
        let client = TelegramClient::new(format!("http://{addr}"), None).unwrap();

        let err = client
            .send_media_group("123:abc", sample_group())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn invalid_mime_fails_before_sending() {
        let (addr, mock) = spawn_mock(StatusCode::OK, "{}").await;
        let client = TelegramClient::new(format!("http://{addr}"), None).unwrap();

        let mut group = sample_group();
        group.attachments[0].mime_type = "not a mime".to_string();
        let err = client.send_media_group("t", group).await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        assert!(mock.seen.lock().await.is_none());
    }
}
