//! Multipart form → `InboundRequest`.

use axum::extract::{multipart::MultipartError, Multipart};

use tgr_core::{
    domain::{InboundRequest, UploadedFile},
    errors::Error,
    relay::Relay,
    Result,
};

/// Fields read from the upload form, before the credential is resolved.
#[derive(Debug, Default)]
pub struct SendMessageForm {
    pub token: Option<String>,
    pub files: Vec<UploadedFile>,
    pub caption: Option<String>,
}

impl SendMessageForm {
    /// Drain the whole body. Unknown fields are skipped.
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(form_err)? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("token") => form.token = Some(field.text().await.map_err(form_err)?),
                Some("caption") => form.caption = Some(field.text().await.map_err(form_err)?),
                Some("files") => {
                    let filename = field.file_name().map(str::to_string);
                    let mime_type = field.content_type().map(str::to_string);
                    let content = field.bytes().await.map_err(form_err)?.to_vec();
                    form.files.push(UploadedFile {
                        filename,
                        mime_type,
                        content,
                    });
                }
                _ => {}
            }
        }

        Ok(form)
    }

    pub fn into_request(self, destination: String, relay: &Relay) -> Result<InboundRequest> {
        let credential = relay.resolve_credential(self.token)?;
        Ok(InboundRequest {
            destination,
            credential,
            files: self.files,
            caption: self.caption,
        })
    }
}

fn form_err(e: MultipartError) -> Error {
    Error::InvalidForm(e.body_text())
}
