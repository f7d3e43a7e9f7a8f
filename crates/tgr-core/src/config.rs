use std::{env, net::SocketAddr, path::Path, time::Duration};

use crate::{errors::Error, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
/// Bot API upload ceiling for `sendMediaGroup` files.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Typed configuration for the relay process.
#[derive(Clone, Debug)]
pub struct Config {
    /// Credential used when a request does not carry its own `token`.
    pub bot_token: Option<String>,
    pub bind_addr: SocketAddr,
    pub telegram_api_base: String,
    /// `None` means outbound calls may wait indefinitely.
    pub upstream_timeout: Option<Duration>,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            upstream_timeout: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Load from the process environment, seeding it from `./.env` first.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let bot_token = get("BOT_TOKEN");

        let raw_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("BIND_ADDR {raw_addr:?} is invalid: {e}")))?;

        let telegram_api_base = get("TELEGRAM_API_BASE")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string());
        if !(telegram_api_base.starts_with("http://") || telegram_api_base.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "TELEGRAM_API_BASE must be an http(s) URL, got {telegram_api_base:?}"
            )));
        }

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_MS") {
            Some(v) => Some(Duration::from_millis(parse_number("UPSTREAM_TIMEOUT_MS", &v)?)),
            None => None,
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(v) => parse_number::<usize>("MAX_UPLOAD_BYTES", &v)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        if max_upload_bytes == 0 {
            return Err(Error::Config(
                "MAX_UPLOAD_BYTES must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            bot_token,
            bind_addr,
            telegram_api_base,
            upstream_timeout,
            max_upload_bytes,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}

/// Seed the process environment from a dotenv file. Existing variables win.
fn load_dotenv_if_present(path: &Path) {
    match dotenvy::from_path(path) {
        Ok(()) => tracing::debug!("loaded {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring {}: {e}", path.display()),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
