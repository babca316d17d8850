use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use status_watchbot::config::{self, Config};
use status_watchbot::model::{Post, Status};
use status_watchbot::source::{FileSource, PostSource, SourceError};
use status_watchbot::watch::{self, Outcome, WatchError};
use tokio::sync::Mutex;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 10, 15, 33, 11).unwrap()
}

fn test_config() -> Config {
    serde_yaml::from_str(config::example()).unwrap()
}

#[derive(Clone, Default)]
struct RecordingSource {
    posts: Vec<Post>,
    fail: bool,
    calls: Arc<Mutex<Vec<(String, usize)>>>,
}

impl RecordingSource {
    fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    async fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl PostSource for RecordingSource {
    async fn recent_posts(&self, account: &str, limit: usize) -> Result<Vec<Post>, SourceError> {
        self.calls.lock().await.push((account.to_string(), limit));
        if self.fail {
            return Err(SourceError::Status {
                status: 401,
                body: "unauthorized".into(),
            });
        }
        // Ignore `limit` on purpose so the caller's own truncation is exercised.
        Ok(self.posts.clone())
    }
}

#[tokio::test]
async fn run_requests_configured_window() {
    let source = RecordingSource::with_posts(vec![]);
    let mut cfg = test_config();
    cfg.app.target_account = "@huntshowdown".into();
    cfg.app.window_size = 3;

    let outcome = watch::run(&source, &cfg, now()).await.unwrap();
    assert_eq!(outcome, Outcome::Empty);
    assert_eq!(source.calls().await, vec![("huntshowdown".to_string(), 3)]);
}

#[tokio::test]
async fn run_classifies_first_relevant_post() {
    let source = RecordingSource::with_posts(vec![
        Post::new("RT @news: servers down everywhere", "Thu Jul 10 15:00:00 +0000 2025"),
        Post::new(
            "Scheduled maintenance tomorrow, servers offline for ~4 hours",
            "Thu Jul 10 14:32:10 +0000 2025",
        ),
        Post::new("Servers back online", "Wed Jul 09 10:00:00 +0000 2025"),
    ]);

    let outcome = watch::run(&source, &test_config(), now()).await.unwrap();
    match outcome {
        Outcome::Matched { text, analysis, elapsed } => {
            assert!(text.starts_with("Scheduled maintenance"));
            assert_eq!(analysis.status, Status::Scheduled);
            assert_eq!(analysis.duration.unwrap().to_string(), "~4 hours");
            assert_eq!(elapsed.to_string(), "0d 1h 1m ago");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn run_ignores_posts_beyond_window() {
    let mut posts: Vec<Post> = (0..5)
        .map(|_| Post::new("GG everyone", "Thu Jul 10 14:32:10 +0000 2025"))
        .collect();
    posts.push(Post::new("Servers are down", "Thu Jul 10 14:00:00 +0000 2025"));
    let source = RecordingSource::with_posts(posts);

    let outcome = watch::run(&source, &test_config(), now()).await.unwrap();
    assert!(matches!(outcome, Outcome::NoMatch { .. }));
}

#[tokio::test]
async fn run_propagates_source_failure() {
    let source = RecordingSource::failing();
    let err = watch::run(&source, &test_config(), now()).await.unwrap_err();
    match err {
        WatchError::Source(SourceError::Status { status, .. }) => assert_eq!(status, 401),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn run_surfaces_bad_timestamp() {
    let source = RecordingSource::with_posts(vec![Post::new("Servers offline", "09/07/2025 14:32")]);
    let err = watch::run(&source, &test_config(), now()).await.unwrap_err();
    assert!(matches!(err, WatchError::Timestamp(_)));
    assert!(err.to_string().contains("09/07/2025 14:32"));
}

#[tokio::test]
async fn file_source_feeds_watch() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("posts.json");
    let body = serde_json::json!([
        {"text": "Patch notes are live", "created_at": "Thu Jul 10 14:32:10 +0000 2025"},
        {"text": "Servers are down right now", "created_at": "Wed Jul 09 14:32:10 +0000 2025"}
    ]);
    std::fs::write(&path, body.to_string()).unwrap();

    let source = FileSource::new(&path);
    let outcome = watch::run(&source, &test_config(), now()).await.unwrap();
    match outcome {
        Outcome::Matched { analysis, elapsed, .. } => {
            assert_eq!(analysis.status, Status::DownNow);
            assert!(analysis.duration.is_none());
            assert_eq!(elapsed.to_string(), "1d 1h 1m ago");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn file_source_truncates_and_reports_errors() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("posts.json");
    let body = serde_json::json!([
        {"text": "a", "created_at": "Thu Jul 10 14:32:10 +0000 2025"},
        {"text": "b", "created_at": "Thu Jul 10 14:32:10 +0000 2025"},
        {"text": "c", "created_at": "Thu Jul 10 14:32:10 +0000 2025"}
    ]);
    std::fs::write(&path, body.to_string()).unwrap();

    let posts = FileSource::new(&path).recent_posts("x", 2).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1].text, "b");

    let missing = FileSource::new(td.path().join("absent.json"));
    assert!(matches!(missing.recent_posts("x", 5).await, Err(SourceError::Io(_))));

    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(
        FileSource::new(&path).recent_posts("x", 5).await,
        Err(SourceError::Decode(_))
    ));
}
