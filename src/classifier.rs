//! Status inference for a post already judged relevant.
//!
//! Classification is a priority ladder: the "resolved" check runs first and
//! short-circuits everything, then the status rules in [`STATUS_RULES`] are
//! tried in order and the first hit wins. Duration extraction runs after the
//! ladder for every outcome except `Completed`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::filter;
use crate::model::{Analysis, ApproxDuration, Status};

const COMPLETED_PHRASES: &[&str] = &["back online", "maintenance has concluded", "completed"];
const COMPLETED_RULE: &str = "completed_phrase";
const SCHEDULED_PHRASES: &[&str] = &["will be taken offline", "scheduled maintenance", "tomorrow"];

// Loose: any one/two digit run followed by a word, e.g. "9 july".
static DATE_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}\s+\w+").expect("valid date pattern"));

static HOURS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"~?(\d+)\s*hours?").expect("valid duration pattern"));

/// A named step of the ladder. `matches` receives lower-cased text.
#[derive(Clone, Copy)]
pub struct StatusRule {
    pub name: &'static str,
    pub status: Status,
    pub matches: fn(&str) -> bool,
}

/// Rules consulted after the completed check, highest priority first.
pub const STATUS_RULES: &[StatusRule] = &[
    StatusRule {
        name: "scheduled_phrase",
        status: Status::Scheduled,
        matches: announces_schedule,
    },
    StatusRule {
        name: "date_mention",
        status: Status::Scheduled,
        matches: mentions_date,
    },
    StatusRule {
        name: "keyword_mention",
        status: Status::DownNow,
        matches: filter::is_relevant,
    },
];

pub fn reports_completion(lowered: &str) -> bool {
    COMPLETED_PHRASES.iter().any(|p| lowered.contains(p))
}

pub fn announces_schedule(lowered: &str) -> bool {
    SCHEDULED_PHRASES.iter().any(|p| lowered.contains(p))
}

pub fn mentions_date(lowered: &str) -> bool {
    DATE_MENTION.is_match(lowered)
}

/// First "N hours" mention, with an optional leading `~`.
pub fn extract_duration(lowered: &str) -> Option<ApproxDuration> {
    HOURS
        .captures(lowered)
        .and_then(|caps| caps.get(1))
        .map(|m| ApproxDuration::new(m.as_str()))
}

/// Classify `text`. Total over all inputs; `Unknown` is the fallback.
pub fn classify(text: &str) -> Analysis {
    classify_with_rule(text).0
}

/// Like [`classify`], also naming the ladder step that decided the status.
pub fn classify_with_rule(text: &str) -> (Analysis, Option<&'static str>) {
    let lowered = text.to_lowercase();

    if reports_completion(&lowered) {
        let analysis = Analysis {
            status: Status::Completed,
            duration: None,
        };
        return (analysis, Some(COMPLETED_RULE));
    }

    let rule = STATUS_RULES.iter().find(|rule| (rule.matches)(&lowered));
    let analysis = Analysis {
        status: rule.map(|rule| rule.status).unwrap_or_default(),
        duration: extract_duration(&lowered),
    };
    (analysis, rule.map(|rule| rule.name))
}
