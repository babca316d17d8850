use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::classifier;
use crate::config::Config;
use crate::elapsed::{self, TimestampError};
use crate::filter;
use crate::model::{Analysis, ElapsedDuration, Post};
use crate::source::{PostSource, SourceError};

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to retrieve posts: {0}")]
    Source(#[from] SourceError),
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

/// Result of examining one window of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The newest original post that mentions server status.
    Matched {
        text: String,
        analysis: Analysis,
        elapsed: ElapsedDuration,
    },
    /// Nothing relevant; age of the newest post of any kind.
    NoMatch { newest_elapsed: ElapsedDuration },
    /// The source returned no posts.
    Empty,
}

/// First non-repost relevant post in `posts` (newest first), if any.
pub fn first_relevant(posts: &[Post]) -> Option<&Post> {
    posts.iter().find(|p| {
        if p.is_repost() {
            debug!(text = %p.text, "skipping repost");
            return false;
        }
        filter::is_relevant(&p.text)
    })
}

/// Examine a newest-first window against the reference time `now`.
///
/// Scanning stops at the first relevant original post. Only the timestamp that
/// ends up reported is parsed.
pub fn scan(posts: &[Post], now: DateTime<Utc>) -> Result<Outcome, WatchError> {
    let Some(newest) = posts.first() else {
        return Ok(Outcome::Empty);
    };

    if let Some(post) = first_relevant(posts) {
        let elapsed = elapsed::elapsed_between(now, post.created_at()?);
        let (analysis, rule) = classifier::classify_with_rule(&post.text);
        info!(
            status = %analysis.status,
            rule = rule.unwrap_or("none"),
            %elapsed,
            "found status post"
        );
        return Ok(Outcome::Matched {
            text: post.text.clone(),
            analysis,
            elapsed,
        });
    }

    let newest_elapsed = elapsed::elapsed_between(now, newest.created_at()?);
    info!(%newest_elapsed, "no status post in window");
    Ok(Outcome::NoMatch { newest_elapsed })
}

/// Fetch the configured window from `source` and scan it.
#[instrument(skip_all, fields(account = cfg.app.account(), window = cfg.app.window_size))]
pub async fn run(
    source: &dyn PostSource,
    cfg: &Config,
    now: DateTime<Utc>,
) -> Result<Outcome, WatchError> {
    let window = cfg.app.window_size;
    let mut posts = match source.recent_posts(cfg.app.account(), window).await {
        Ok(posts) => posts,
        Err(err) => {
            warn!(?err, "post retrieval failed");
            return Err(err.into());
        }
    };
    posts.truncate(window);
    scan(&posts, now)
}
