// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-level heuristics applied to captured pane output: does this line
//! look like a question aimed at the user, and does this line look like a
//! subagent announcing it is done.

use regex::Regex;
use std::sync::OnceLock;

fn question_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)(?:Do you want|Would you like|Should I|Can I|May I)\s+.+\?").unwrap(),
            Regex::new(r"\?\s*$").unwrap(),
            Regex::new(r"(?i)(?:y/n|yes/no)\s*[:>]?\s*$").unwrap(),
            Regex::new(r"(?i)(?:confirm|proceed|continue)\s*\?").unwrap(),
            Regex::new(r"(?i)Press Enter to continue").unwrap(),
        ]
    })
}

/// Does this line of pane output look like a question the liaison should
/// consider escalating? Fuzzy by design — see the escalation policy for
/// how false positives are contained.
pub fn looks_like_question(line: &str) -> bool {
    question_patterns().iter().any(|re| re.is_match(line))
}

const COMPLETION_MARKERS: &[&str] = &["task completed", "done.", "finished.", "all tasks complete"];

/// Does this line announce that a subagent believes its task is over?
/// Captain's-chair mode decides separately whether to act on this.
pub fn is_completion_marker(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    COMPLETION_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
#[path = "questions_tests.rs"]
mod tests;
