//! MIME type → Bot API media kind.

use serde::Serialize;

/// Media kinds accepted by `sendMediaGroup` descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Audio,
    Document,
    Photo,
    Video,
    Animation,
    Voice,
    WebPage,
}

impl MediaCategory {
    /// Lookup order. The first category listing a MIME type wins, so `voice`
    /// is shadowed by `audio` and `animation` by `photo`.
    pub const ALL: [MediaCategory; 7] = [
        MediaCategory::Audio,
        MediaCategory::Document,
        MediaCategory::Photo,
        MediaCategory::Video,
        MediaCategory::Animation,
        MediaCategory::Voice,
        MediaCategory::WebPage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaCategory::Audio => "audio",
            MediaCategory::Document => "document",
            MediaCategory::Photo => "photo",
            MediaCategory::Video => "video",
            MediaCategory::Animation => "animation",
            MediaCategory::Voice => "voice",
            MediaCategory::WebPage => "web_page",
        }
    }

    pub fn mime_types(self) -> &'static [&'static str] {
        match self {
            MediaCategory::Audio => &[
                "audio/mpeg",
                "audio/wav",
                "audio/ogg",
                "audio/aac",
                "audio/mp3",
            ],
            MediaCategory::Document => &[
                "application/pdf",
                "application/msword",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "application/vnd.ms-excel",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "application/vnd.ms-powerpoint",
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            ],
            MediaCategory::Photo => &[
                "image/jpeg",
                "image/png",
                "image/gif",
                "image/bmp",
                "image/webp",
            ],
            MediaCategory::Video => &[
                "video/mp4",
                "video/mpeg",
                "video/quicktime",
                "video/x-msvideo",
                "video/x-ms-wmv",
            ],
            MediaCategory::Animation => &["image/gif"],
            MediaCategory::Voice => &["audio/ogg", "audio/mpeg", "audio/wav"],
            MediaCategory::WebPage => &[],
        }
    }
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a MIME type. Matching is exact; unknown or empty input yields `None`.
pub fn classify(mime_type: &str) -> Option<MediaCategory> {
    MediaCategory::ALL
        .into_iter()
        .find(|category| category.mime_types().contains(&mime_type))
}
