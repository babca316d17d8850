//! Console rendering of a watch [`Outcome`].

use crate::model::{Analysis, Status};
use crate::watch::Outcome;

const RULE: &str = "----------------";

fn status_lines(analysis: &Analysis) -> Vec<String> {
    let mut lines = Vec::new();
    match analysis.status {
        Status::Completed => {
            lines.push("✅ Status: Servers should be back online. Maintenance appears to be finished.".into());
        }
        Status::Scheduled => {
            lines.push("🗓️ Status: Scheduled maintenance has been announced.".into());
            if let Some(d) = &analysis.duration {
                lines.push(format!("   - Estimated Downtime: {d}"));
            }
            lines.push("   - This is a future event. Check the post for the exact date and time.".into());
        }
        Status::DownNow => {
            lines.push("🚨 Status: Servers appear to be down currently.".into());
            if let Some(d) = &analysis.duration {
                lines.push(format!("   - Mentioned Duration: {d}"));
            }
        }
        Status::Unknown => {
            lines.push(
                "❓ Status: A server-related post was found, but the status is unclear. Please read the post."
                    .into(),
            );
        }
    }
    lines
}

/// Human-readable lines describing `outcome` for `account`.
pub fn render(account: &str, window: usize, outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::Matched {
            text,
            analysis,
            elapsed,
        } => {
            let mut lines = vec![
                format!("Found a potential server status update from @{account}:"),
                format!("-> Post: \"{text}\""),
                format!("   Posted: {elapsed}"),
                String::new(),
                "--- Analysis ---".to_string(),
            ];
            lines.extend(status_lines(analysis));
            lines.push(RULE.to_string());
            lines
        }
        Outcome::NoMatch { newest_elapsed } => vec![
            format!("No server status updates found in the last {window} original posts from @{account}."),
            format!("The last post (of any kind) was {newest_elapsed}."),
        ],
        Outcome::Empty => vec![format!("Could not retrieve posts for @{account}.")],
    }
}
