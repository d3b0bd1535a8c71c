// src/session/messages.rs

//! User-facing texts derived from helper output.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::UserMessage;

/// Shown when a lookup legitimately has no answer.
pub const NO_MAPPING: &str = "No local mapping found";

static FOUND_FEED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Found feed:\s*(\S+)").expect("static regex"));

/// URLs announced on `Found feed: <url>` lines, in output order.
pub fn reported_feeds(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| FOUND_FEED.captures(line))
        .map(|caps| caps[1].to_string())
        .collect()
}

pub fn count_reported_feeds(stdout: &str) -> usize {
    stdout.lines().filter(|line| FOUND_FEED.is_match(line)).count()
}

/// "2 feeds reported." / "1 feed reported."
pub fn feeds_summary(count: usize) -> UserMessage {
    let text = match count {
        1 => "1 feed reported.".to_string(),
        n => format!("{n} feeds reported."),
    };
    UserMessage::info(text)
}

/// "<name> failed (status N)." followed by a blank line and stderr, if any.
pub fn helper_failed(name: &str, status: i32, stderr: &str) -> UserMessage {
    let stderr = stderr.trim_end();
    let text = if stderr.is_empty() {
        format!("{name} failed (status {status}).")
    } else {
        format!("{name} failed (status {status}).\n\n{stderr}")
    };
    UserMessage::error(text)
}

/// The helper could not be started at all.
pub fn launch_failed(name: &str, cause: &str) -> UserMessage {
    UserMessage::error(format!("Could not run {name}: {cause}"))
}

pub fn no_mapping() -> UserMessage {
    UserMessage::info(NO_MAPPING)
}
