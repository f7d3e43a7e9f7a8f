use serde::Serialize;

use crate::media::MediaCategory;

/// One relay request as received from the caller.
#[derive(Clone, Debug)]
pub struct InboundRequest {
    /// Public channel or group username, without the leading `@`.
    pub destination: String,
    pub credential: String,
    pub files: Vec<UploadedFile>,
    pub caption: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub content: Vec<u8>,
}

/// Descriptor serialized into the `media` field of `sendMediaGroup`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub category: MediaCategory,
    /// `attach://<key>` pointing at a binary part of the same request.
    pub media: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Binary part uploaded alongside the descriptors.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub key: String,
    pub filename: Option<String>,
    pub mime_type: String,
    pub content: Vec<u8>,
}

/// A validated, ready-to-send media group.
#[derive(Clone, Debug)]
pub struct MediaGroup {
    /// `@<destination>`.
    pub chat_id: String,
    pub media: Vec<MediaItem>,
    pub attachments: Vec<Attachment>,
}

impl MediaGroup {
    pub fn media_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(&self.media)?)
    }
}

pub fn attachment_key(index: usize) -> String {
    format!("file{index}")
}

pub fn attachment_reference(key: &str) -> String {
    format!("attach://{key}")
}

pub fn channel_chat_id(destination: &str) -> String {
    format!("@{destination}")
}
