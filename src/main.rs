use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use status_watchbot::config::{self, Config};
use status_watchbot::report;
use status_watchbot::source::{FileSource, HttpSource, PostSource};
use status_watchbot::watch;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Infer game server status from an account's recent posts"
)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Read posts from a JSON file instead of the API
    #[arg(long)]
    posts_file: Option<PathBuf>,

    /// Override `app.target_account`
    #[arg(long)]
    account: Option<String>,

    /// Override `app.window_size`
    #[arg(long)]
    window: Option<usize>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

fn resolve_config(args: &Args) -> Result<Config> {
    // A posts file plus an explicit account is enough to run without a config file.
    let mut cfg = match (&args.posts_file, &args.account) {
        (Some(_), Some(account)) if !args.config.exists() => Config::for_account(account.clone()),
        _ => config::load(Some(&args.config))
            .with_context(|| format!("failed to load {}", args.config.display()))?,
    };
    if let Some(account) = &args.account {
        cfg.app.target_account = account.clone();
    }
    if let Some(window) = args.window {
        cfg.app.window_size = window;
    }
    config::validate(&cfg)?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = resolve_config(&args)?;

    let source: Box<dyn PostSource> = match &args.posts_file {
        Some(path) => {
            info!(path=%path.display(), "using posts file");
            Box::new(FileSource::new(path))
        }
        None => Box::new(HttpSource::from_config(&cfg).context("failed to set up API client")?),
    };

    let outcome = watch::run(source.as_ref(), &cfg, Utc::now()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        for line in report::render(cfg.app.account(), cfg.app.window_size, &outcome) {
            println!("{line}");
        }
    }

    Ok(())
}
