//! Relay handler: validate uploads, assemble one media group, forward it once.
//!
//! The flow is linear: validating → assembling → calling → done, with an early
//! exit from validating (bad upload) or calling (upstream/transport failure).
//! Nothing is retried and nothing outlives the call.

use std::sync::Arc;

use crate::{
    domain::{
        attachment_key, attachment_reference, channel_chat_id, Attachment, InboundRequest,
        MediaGroup, MediaItem, UploadedFile,
    },
    errors::Error,
    media::classify,
    ports::MediaGroupSender,
    Result,
};

/// Either the upstream success body or the error to report to the caller.
pub type RelayOutcome = Result<serde_json::Value>;

#[derive(Clone)]
pub struct Relay {
    sender: Arc<dyn MediaGroupSender>,
    default_credential: Option<String>,
}

impl Relay {
    pub fn new(sender: Arc<dyn MediaGroupSender>) -> Self {
        Self {
            sender,
            default_credential: None,
        }
    }

    /// Credential used for requests that do not carry one.
    pub fn with_default_credential(mut self, credential: Option<String>) -> Self {
        self.default_credential = credential.filter(|c| !c.trim().is_empty());
        self
    }

    /// Pick the request's own credential, falling back to the configured one.
    pub fn resolve_credential(&self, supplied: Option<String>) -> Result<String> {
        supplied
            .filter(|c| !c.trim().is_empty())
            .or_else(|| self.default_credential.clone())
            .ok_or(Error::MissingField("token"))
    }

    /// Relay one request. Performs at most one upstream call; none if any
    /// upload fails validation.
    pub async fn relay(&self, req: InboundRequest) -> RelayOutcome {
        let InboundRequest {
            destination,
            credential,
            files,
            caption,
        } = req;

        let group = match build_media_group(&destination, files, caption) {
            Ok(g) => g,
            Err(e) => {
                tracing::error!("Error processing files: {e}");
                return Err(e);
            }
        };

        let media = group.media_json()?;
        tracing::info!(chat_id = %group.chat_id, media = %media, "Request payload");
        tracing::info!("Number of files: {}", group.attachments.len());

        self.sender.send_media_group(&credential, group).await
    }
}

/// Turn uploads into a media group, failing on the first unusable file.
///
/// Each accepted file `i` becomes attachment `file{i}` and a descriptor
/// pointing at `attach://file{i}`, in input order. A non-empty caption is put
/// on the first descriptor only.
pub fn build_media_group(
    destination: &str,
    files: Vec<UploadedFile>,
    caption: Option<String>,
) -> Result<MediaGroup> {
    let mut media = Vec::with_capacity(files.len());
    let mut attachments = Vec::with_capacity(files.len());

    for (idx, file) in files.into_iter().enumerate() {
        let mime_type = file.mime_type.unwrap_or_default();
        let Some(category) = classify(&mime_type) else {
            let shown = if mime_type.is_empty() {
                "none".to_string()
            } else {
                mime_type
            };
            return Err(Error::UnsupportedContentType(shown));
        };
        tracing::info!("   {category}");

        if file.content.is_empty() {
            let name = file.filename.unwrap_or_else(|| "<unnamed>".to_string());
            return Err(Error::EmptyFile(name));
        }

        let key = attachment_key(idx);
        media.push(MediaItem {
            category,
            media: attachment_reference(&key),
            caption: None,
        });
        attachments.push(Attachment {
            key,
            filename: file.filename,
            mime_type,
            content: file.content,
        });
    }

    if let (Some(caption), Some(first)) = (caption.filter(|c| !c.is_empty()), media.first_mut()) {
        first.caption = Some(caption);
    }

    Ok(MediaGroup {
        chat_id: channel_chat_id(destination),
        media,
        attachments,
    })
}
