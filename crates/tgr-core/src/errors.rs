/// Core error type for the relay.
///
/// Adapter crates map their failures into this type; the HTTP adapter turns it
/// into exactly one terminal response via `status_code` and `detail`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("File {0} is empty")]
    EmptyFile(String),

    #[error("invalid form: {0}")]
    InvalidForm(String),

    #[error("missing required form field: {0}")]
    MissingField(&'static str),

    #[error("upstream rejected request with status {status}")]
    Upstream { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub const SERVICE_UNAVAILABLE: &str = "Service unavailable";

impl Error {
    /// HTTP status reported to the original caller.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::UnsupportedContentType(_) | Error::EmptyFile(_) | Error::InvalidForm(_) => 400,
            Error::MissingField(_) => 422,
            Error::Upstream { status, .. } => *status,
            Error::Transport(_) => 503,
            Error::Config(_) | Error::Json(_) | Error::Internal(_) => 500,
        }
    }

    /// Caller-facing detail text.
    ///
    /// Upstream rejections are relayed verbatim; transport failures are
    /// collapsed to a generic message (the cause is only logged).
    pub fn detail(&self) -> String {
        match self {
            Error::Upstream { body, .. } => body.clone(),
            Error::Transport(_) => SERVICE_UNAVAILABLE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Whether the caller may sensibly retry the identical request later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
