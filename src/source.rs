//! Upstream post sources.
//!
//! Everything that talks to the network or disk lives behind [`PostSource`]
//! so the watch logic only ever sees an in-memory, newest-first window.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::model::Post;

const TIMELINE_PATH: &str = "1.1/statuses/user_timeline.json";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("missing API bearer token")]
    MissingCredentials,
    #[error("invalid API base URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed post payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait PostSource: Send + Sync {
    /// Up to `limit` most recent posts of `account`, newest first.
    async fn recent_posts(&self, account: &str, limit: usize) -> Result<Vec<Post>, SourceError>;
}

/// Timeline client for the platform's REST API.
#[derive(Clone)]
pub struct HttpSource {
    http: Client,
    base_url: Url,
    token: String,
}

impl fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSource")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TimelineItem {
    created_at: String,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl From<TimelineItem> for Post {
    fn from(item: TimelineItem) -> Self {
        let text = item.full_text.or(item.text).unwrap_or_default();
        Post::new(text, item.created_at)
    }
}

async fn read_error_body(res: reqwest::Response) -> String {
    match res.text().await {
        Ok(body) => body,
        Err(err) => {
            warn!(?err, "failed to read error response body");
            String::new()
        }
    }
}

/// Decode a timeline response body into posts, preserving order.
pub fn decode_timeline(body: &str) -> Result<Vec<Post>, SourceError> {
    let items: Vec<TimelineItem> = serde_json::from_str(body)?;
    Ok(items.into_iter().map(Post::from).collect())
}

impl HttpSource {
    pub fn new(token: String, base_url: &str) -> Result<Self, SourceError> {
        if token.trim().is_empty() {
            return Err(SourceError::MissingCredentials);
        }
        let base_url = Url::parse(base_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        let http = Client::builder()
            .user_agent(concat!("status-watchbot/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, SourceError> {
        Self::new(cfg.x.bearer_token.clone(), &cfg.x.api_base)
    }

    pub fn build_request(&self, account: &str, limit: usize) -> Result<reqwest::Request, SourceError> {
        let mut endpoint = self
            .base_url
            .join(TIMELINE_PATH)
            .map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        endpoint
            .query_pairs_mut()
            .append_pair("screen_name", account)
            .append_pair("count", &limit.to_string())
            .append_pair("tweet_mode", "extended");
        Ok(self
            .http
            .get(endpoint)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .build()?)
    }
}

#[async_trait]
impl PostSource for HttpSource {
    async fn recent_posts(&self, account: &str, limit: usize) -> Result<Vec<Post>, SourceError> {
        let request = self.build_request(account, limit)?;
        info!(url=%request.url(), "fetching timeline");

        let res = self.http.execute(request).await?;
        let status = res.status();
        debug!(%status, "timeline response");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = read_error_body(res).await;
            warn!("rate limited by upstream: {}", body);
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            let body = read_error_body(res).await;
            warn!(%status, "timeline request failed: {}", body);
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = res.text().await?;
        let posts = decode_timeline(&body)?;
        info!(count = posts.len(), "received posts");
        Ok(posts)
    }
}

/// Reads a JSON array of `{"text", "created_at"}` records, newest first.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl PostSource for FileSource {
    async fn recent_posts(&self, account: &str, limit: usize) -> Result<Vec<Post>, SourceError> {
        debug!(path=%self.path.display(), account, "reading posts from file");
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut posts: Vec<Post> = serde_json::from_str(&content)?;
        posts.truncate(limit);
        Ok(posts)
    }
}
