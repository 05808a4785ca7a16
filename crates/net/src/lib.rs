//! Blocking HTTP fetch for image previews.
use std::io::Read;
use std::time::{Duration, Instant};

use thiserror::Error;
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    /// Responses longer than this are rejected rather than truncated.
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_bytes: 20 * 1024 * 1024,
            user_agent: concat!("htmledit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),
    #[error("server answered {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("response larger than {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Parses `raw` and accepts only http(s) URLs.
pub fn parse_http_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

/// GETs `raw_url` and returns the body. Blocks; call it off the UI thread.
pub fn fetch_bytes(raw_url: &str, config: &FetchConfig) -> Result<Vec<u8>, FetchError> {
    let url = parse_http_url(raw_url)?;
    let start = Instant::now();

    let agent = ureq::AgentBuilder::new()
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .build();

    let response = agent.get(url.as_str()).call().map_err(|e| match e {
        ureq::Error::Status(code, _) => FetchError::Status(code),
        ureq::Error::Transport(transport) => FetchError::Transport(transport.to_string()),
    })?;

    let content_type = response.content_type().to_string();
    let mut body = Vec::new();
    response
        .into_reader()
        .take(config.max_bytes.saturating_add(1))
        .read_to_end(&mut body)?;
    if body.len() as u64 > config.max_bytes {
        return Err(FetchError::TooLarge {
            limit: config.max_bytes,
        });
    }

    log::debug!(
        target: "net",
        "GET {url}: {} bytes ({content_type}) in {} ms",
        body.len(),
        start.elapsed().as_millis()
    );
    Ok(body)
}
