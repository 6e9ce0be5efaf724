#![deny(missing_docs)]

//! # Summary Quality
//!
//! Checks on the `summary` of operations and path items: it should be a short,
//! single line of plain text that is shorter than the accompanying
//! `description`.

use crate::document::RuleContext;
use crate::error::AppResult;
use crate::functions::RuleFunction;
use crate::violation::Violation;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn markdown_patterns() -> &'static [Regex] {
    static MARKDOWN_RE: OnceLock<Vec<Regex>> = OnceLock::new();
    MARKDOWN_RE.get_or_init(|| {
        [
            r"\*\*.*\*\*",         // bold
            r"\*.*\*",             // italic
            r"`[^`]+`",            // code
            r"\[.*?\]\(.*?\)",     // link
            r"^#{1,6}\s",          // heading
            r"^\s*[-*+]\s",        // bullet list
            r"^\s*\d+\.\s",        // numbered list
            r"^>\s",               // quote
            r"!\[.*?\]\(.*?\)",    // image
            r"<.*?>.*?</.*?>",     // html
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex"))
        .collect()
    })
}

/// True if `text` contains common Markdown or HTML markup.
pub fn contains_markdown(text: &str) -> bool {
    markdown_patterns().iter().any(|re| re.is_match(text))
}

/// Violation when the trimmed summary is at least as long as the description.
///
/// Both fields must be non-blank strings for the check to apply.
pub fn summary_not_shorter(target: &Value) -> Option<Violation> {
    let summary = target.get("summary")?.as_str()?.trim();
    let description = target.get("description")?.as_str()?.trim();
    if summary.is_empty() || description.is_empty() {
        return None;
    }

    let summary_len = summary.chars().count();
    let description_len = description.chars().count();
    (summary_len >= description_len).then(|| {
        Violation::new(format!(
            "Summary ({} chars) is not shorter than description ({} chars)",
            summary_len, description_len
        ))
    })
}

/// Newline and Markdown violations for a summary string.
pub fn summary_markup_violations(summary: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    if summary.contains(['\n', '\r']) {
        violations.push(Violation::new(
            "Summary must be a single line (no newlines allowed)",
        ));
    }
    if contains_markdown(summary) {
        violations.push(Violation::new(
            "Summary must not contain Markdown formatting (plain text only)",
        ));
    }
    violations
}

/// `summary-shorter-than-description`; runs on the object owning both fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryShorterThanDescription;

impl RuleFunction for SummaryShorterThanDescription {
    fn name(&self) -> &'static str {
        "summary-shorter-than-description"
    }

    fn run(&self, target: &Value, _: &Value, _: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        Ok(summary_not_shorter(target).into_iter().collect())
    }
}

/// `summary-no-markdown-single-line`; runs on the `summary` value.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryNoMarkdownSingleLine;

impl RuleFunction for SummaryNoMarkdownSingleLine {
    fn name(&self) -> &'static str {
        "summary-no-markdown-single-line"
    }

    fn run(&self, target: &Value, _: &Value, _: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        match target.as_str() {
            Some(summary) if !summary.is_empty() => Ok(summary_markup_violations(summary)),
            _ => Ok(Vec::new()),
        }
    }
}
