// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classifies agent questions into escalate/auto-answer, and assigns urgency.

use crate::model::Urgency;
use regex::Regex;
use std::sync::Arc;

/// What to do with a detected question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    Escalate,
    Auto,
    None,
}

/// A decider supplied by a backend or caller, consulted after the two
/// built-in pattern families and before the default-escalate fallback.
pub type CustomDecider = Arc<dyn Fn(&str) -> Escalation + Send + Sync>;

/// Ordered pattern families governing whether a sub-agent's question is
/// surfaced to the human or auto-answered. The first matching family wins;
/// `always_escalate` is checked before `auto_approve` so a line matching
/// both is escalated.
#[derive(Clone)]
pub struct EscalationPolicy {
    always_escalate: Vec<Regex>,
    auto_approve: Vec<Regex>,
    custom_decider: Option<CustomDecider>,
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).unwrap_or_else(|e| {
            panic!("built-in escalation pattern {p:?} failed to compile: {e}")
        }))
        .collect()
}

fn default_always_escalate() -> Vec<&'static str> {
    vec![
        r"delete|remove|destroy|drop|truncate",
        r"production|prod\b|live\b",
        r"api[-_]?key|secret|password|credential|token",
        r"billing|payment|cost|charge",
        r"force|--force|-f\b",
        r"push|merge.*(main|master)",
    ]
}

fn default_auto_approve() -> Vec<&'static str> {
    vec![
        r"mkdir|create.*directory",
        r"install.*dev.*dep|dev[-_]?depend",
        r"run.*test|pytest|cargo test|go test",
        r"format|lint|fmt|eslint|clippy",
        r"build|compile",
        r"^(read|view|show|list|ls|cat)\b",
    ]
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            always_escalate: compile_all(&default_always_escalate()),
            auto_approve: compile_all(&default_auto_approve()),
            custom_decider: None,
        }
    }
}

impl EscalationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a policy from caller-supplied regex source strings, for
    /// configuration-driven customization. Patterns are compiled
    /// case-insensitively.
    pub fn from_patterns(
        always_escalate: &[String],
        auto_approve: &[String],
    ) -> Result<Self, regex::Error> {
        let always_escalate = always_escalate
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")))
            .collect::<Result<Vec<_>, _>>()?;
        let auto_approve = auto_approve
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            always_escalate,
            auto_approve,
            custom_decider: None,
        })
    }

    pub fn with_custom_decider(mut self, decider: CustomDecider) -> Self {
        self.custom_decider = Some(decider);
        self
    }

    fn matches_any(patterns: &[Regex], text: &str) -> bool {
        patterns.iter().any(|re| re.is_match(text))
    }

    fn full_text(question: &str, context: Option<&str>) -> String {
        format!("{question} {}", context.unwrap_or(""))
    }

    /// First-match-wins: always_escalate, then auto_approve, then the
    /// custom decider, then escalate-by-default (safety bias). Patterns are
    /// matched against the question plus any surrounding context, since a
    /// sensitive word can appear in context without being in the question
    /// itself.
    pub fn should_escalate(&self, question: &str, context: Option<&str>) -> bool {
        let full_text = Self::full_text(question, context);
        if Self::matches_any(&self.always_escalate, &full_text) {
            return true;
        }
        if Self::matches_any(&self.auto_approve, &full_text) {
            return false;
        }
        if let Some(decider) = &self.custom_decider {
            return match decider(question) {
                Escalation::Escalate => true,
                Escalation::Auto => false,
                Escalation::None => true,
            };
        }
        true
    }

    /// The automatic response for a non-escalated question, or `None` if
    /// the question should be escalated after all (callers that already
    /// checked `should_escalate` will never see `None` here, but the check
    /// is repeated so this method is safe to call on its own).
    pub fn auto_response(&self, question: &str, context: Option<&str>) -> Option<String> {
        if self.should_escalate(question, context) {
            return None;
        }

        let lower = question.to_lowercase();
        if lower.contains("y/n") || lower.contains("(y/n)") {
            return Some("y".to_string());
        }
        if lower.contains("confirm") || lower.contains("proceed") || lower.contains("continue") {
            return Some("yes".to_string());
        }
        if lower.contains("press enter") {
            return Some(String::new());
        }
        Some("yes".to_string())
    }

    pub fn assess_urgency(&self, question: &str, context: Option<&str>) -> Urgency {
        let lower = Self::full_text(question, context).to_lowercase();
        if lower.contains("production")
            || lower.contains("billing")
            || lower.contains("credential")
            || lower.contains("api key")
            || lower.contains("api-key")
            || lower.contains("secret")
            || lower.contains("password")
            || lower.contains("token")
            || lower.contains("payment")
        {
            Urgency::Critical
        } else if lower.contains("destructive")
            || lower.contains("force")
            || lower.contains("overwrite")
            || lower.contains("delete")
        {
            Urgency::High
        } else if lower.contains("mkdir") || lower.contains("install") || lower.contains("format")
        {
            Urgency::Low
        } else {
            Urgency::Normal
        }
    }
}

#[cfg(test)]
#[path = "escalation_tests.rs"]
mod tests;
