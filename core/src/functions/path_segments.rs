#![deny(missing_docs)]

//! # Path Segment Naming
//!
//! Resource-oriented naming checks for path templates (`/users/{id}/orders`).
//! These run on a key under `paths`; the template is the last segment of the
//! rule context path. Parameter segments (`{id}`) are never inspected.

use crate::document::RuleContext;
use crate::error::AppResult;
use crate::functions::RuleFunction;
use crate::violation::Violation;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn kebab_segment() -> &'static Regex {
    static KEBAB_RE: OnceLock<Regex> = OnceLock::new();
    KEBAB_RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Invalid regex"))
}

/// Action verbs that never belong in a resource path.
pub const BLACKLISTED_VERBS: [&str; 32] = [
    "get", "create", "update", "delete", "patch", "put", "post", "list", "add", "remove", "edit",
    "view", "search", "find", "retrieve", "save", "modify", "archive", "activate", "deactivate",
    "validate", "approve", "reject", "cancel", "send", "run", "execute", "login", "checkout",
    "download", "sync", "refresh",
];

/// Splits a path template into its static (non-parameter) segments.
pub fn static_segments(template: &str) -> impl Iterator<Item = &str> {
    template
        .split('/')
        .filter(|s| !s.is_empty())
        .filter(|s| !(s.starts_with('{') && s.ends_with('}')))
}

/// Splits a segment into lower-case words on `-`, `_` and camel-case humps.
///
/// `createUserOrder` -> `[create, user, order]`, `user-profiles` -> `[user, profiles]`.
pub fn split_into_words(segment: &str) -> Vec<String> {
    let mut words = Vec::new();
    for part in segment.split(['-', '_']) {
        let mut current = String::new();
        for c in part.chars() {
            if c.is_ascii_uppercase() && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words.into_iter().map(|w| w.to_lowercase()).collect()
}

/// Returns the first blacklisted verb contained in `segment`.
pub fn find_blacklisted(segment: &str) -> Option<String> {
    split_into_words(segment)
        .into_iter()
        .find(|w| BLACKLISTED_VERBS.contains(&w.as_str()))
}

/// One violation per static segment that is not kebab-case.
pub fn kebab_case_violations(ctx: &RuleContext<'_>) -> Vec<Violation> {
    let Some(template) = ctx.last_key() else {
        return Vec::new();
    };

    static_segments(template)
        .filter(|s| !kebab_segment().is_match(s))
        .map(|s| {
            Violation::at(
                format!(
                    "Static path segment '{}' should be kebab-case (lowercase letters, numbers, hyphens only)",
                    s
                ),
                ctx.path.clone(),
            )
        })
        .collect()
}

/// One violation per static segment containing a blacklisted verb.
pub fn blacklisted_verb_violations(ctx: &RuleContext<'_>) -> Vec<Violation> {
    let Some(template) = ctx.last_key() else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    for segment in static_segments(template) {
        tracing::trace!(segment, "checking path segment against verb blacklist");
        if let Some(verb) = find_blacklisted(segment) {
            tracing::trace!(segment, verb = %verb, "blacklisted verb found");
            violations.push(Violation::at(
                format!(
                    "Path segment \"{}\" contains blacklisted verb \"{}\". Use nouns only.",
                    segment, verb
                ),
                ctx.path.clone(),
            ));
        }
    }
    violations
}

/// `path-segments-kebab-case`
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSegmentsKebabCase;

impl RuleFunction for PathSegmentsKebabCase {
    fn name(&self) -> &'static str {
        "path-segments-kebab-case"
    }

    fn run(&self, _: &Value, _: &Value, ctx: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        Ok(kebab_case_violations(ctx))
    }
}

/// `path-segments-no-verbs-blacklist`
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSegmentsNoVerbsBlacklist;

impl RuleFunction for PathSegmentsNoVerbsBlacklist {
    fn name(&self) -> &'static str {
        "path-segments-no-verbs-blacklist"
    }

    fn run(&self, _: &Value, _: &Value, ctx: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        Ok(blacklisted_verb_violations(ctx))
    }
}
