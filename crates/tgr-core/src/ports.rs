use async_trait::async_trait;

use crate::{domain::MediaGroup, Result};

/// Hexagonal port for the upstream Bot API.
///
/// Implementations perform exactly one outbound call per invocation and return
/// the upstream success body verbatim. Failures must be mapped into
/// `Error::Upstream` (non-2xx), `Error::Transport` (never reached upstream) or
/// one of the internal variants.
#[async_trait]
pub trait MediaGroupSender: Send + Sync {
    async fn send_media_group(
        &self,
        credential: &str,
        group: MediaGroup,
    ) -> Result<serde_json::Value>;
}
