#![deny(missing_docs)]

//! # Probable Verbs in Paths
//!
//! Heuristic companion to the verb blacklist: flags path segments whose words are
//! *probably* verbs, using a part-of-speech tagger, a configurable list of
//! disallowed words, and verb-like suffixes (`-ate`, `-ize`, `-ise`, `-ify`, `-en`).
//!
//! Part-of-speech tagging is pluggable through [`PosTagger`]. The bundled
//! [`LexiconTagger`] knows a fixed list of verbs that commonly leak into
//! RPC-style paths and their inflections; callers needing real NLP can
//! register the function with their own tagger.
//!
//! The function produces false positives for words that are both nouns and verbs
//! ("totals"), so rulesets usually run it as a warning.

use crate::document::RuleContext;
use crate::error::AppResult;
use crate::functions::path_segments::{find_blacklisted, split_into_words, static_segments};
use crate::functions::{parse_options, RuleFunction};
use crate::violation::Violation;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// Penn Treebank tags relevant to verb detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// Verb, base form (`create`).
    Vb,
    /// Verb, non-3rd person singular present (`create`).
    Vbp,
    /// Verb, 3rd person singular present (`creates`).
    Vbz,
    /// Verb, past tense (`created`).
    Vbd,
    /// Verb, past participle (`taken`).
    Vbn,
    /// Verb, gerund (`creating`).
    Vbg,
    /// Noun, singular.
    Nn,
    /// Noun, plural.
    Nns,
    /// Adjective.
    Jj,
}

impl PosTag {
    /// VB, VBP and VBZ: the forms that read as an instruction.
    pub fn is_active_verb(self) -> bool {
        matches!(self, PosTag::Vb | PosTag::Vbp | PosTag::Vbz)
    }
}

/// Tags a single lower-case word.
pub trait PosTagger: Send + Sync {
    /// The most likely tag of `word` out of context, if known.
    fn tag(&self, word: &str) -> Option<PosTag>;
}

const VERB_LEXICON: &[&str] = &[
    "assign", "calculate", "compute", "convert", "generate", "merge", "notify", "publish",
    "recalculate", "render", "resend", "reset", "restore", "revoke", "start", "stop", "submit",
    "total", "transfer", "trigger", "unlock", "verify",
];

/// Lexicon based tagger for common action verbs.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    verbs: HashSet<String>,
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::new(VERB_LEXICON.iter().copied())
    }
}

impl LexiconTagger {
    /// Creates a tagger that knows `verbs` (base forms).
    pub fn new<'a>(verbs: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            verbs: verbs.into_iter().map(str::to_lowercase).collect(),
        }
    }

    fn knows(&self, stem: &str) -> bool {
        self.verbs.contains(stem)
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, word: &str) -> Option<PosTag> {
        if self.knows(word) {
            return Some(PosTag::Vb);
        }
        if let Some(stem) = word.strip_suffix("ing") {
            if self.knows(stem) || self.knows(&format!("{stem}e")) {
                return Some(PosTag::Vbg);
            }
        }
        if let Some(stem) = word.strip_suffix("ed") {
            if self.knows(stem) || self.knows(&format!("{stem}e")) {
                return Some(PosTag::Vbd);
            }
        }
        if let Some(stem) = word.strip_suffix("es") {
            if self.knows(stem) {
                return Some(PosTag::Vbz);
            }
        }
        if let Some(stem) = word.strip_suffix('s') {
            if self.knows(stem) {
                return Some(PosTag::Vbz);
            }
            return Some(PosTag::Nns);
        }
        None
    }
}

const VERB_LIKE_SUFFIXES: [&str; 5] = ["ate", "ize", "ise", "ify", "en"];

/// True if `word` ends with a verb-forming suffix and is long enough for that to
/// be meaningful.
pub fn has_verb_like_suffix(word: &str) -> bool {
    let lower = word.to_lowercase();
    let len = lower.chars().count();
    VERB_LIKE_SUFFIXES
        .iter()
        .any(|suffix| lower.ends_with(suffix) && len > suffix.len() + 2)
}

/// Options of `path-segments-no-verbs-probable`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProbableVerbOptions {
    /// Skip segments already caught by the blacklist. Defaults to `true`.
    pub skip_blacklisted: bool,
    /// Words never flagged (e.g. nouns the tagger mistakes for verbs).
    pub allowed: Vec<String>,
    /// Words always flagged when the tagger does not catch them.
    pub disallowed: Vec<String>,
}

impl Default for ProbableVerbOptions {
    fn default() -> Self {
        Self {
            skip_blacklisted: true,
            allowed: Vec::new(),
            disallowed: Vec::new(),
        }
    }
}

/// Why a word was judged a probable verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbReason {
    /// Tagged VB/VBP/VBZ.
    Tagged,
    /// Listed in `disallowed`.
    Disallowed,
    /// Ends with a verb-like suffix.
    Suffix,
}

impl VerbReason {
    fn describe(self) -> &'static str {
        match self {
            VerbReason::Tagged => "NLP tagged as active verb (VB/VBP/VBZ)",
            VerbReason::Disallowed => "disallowed word",
            VerbReason::Suffix => "verb-like suffix",
        }
    }
}

/// `path-segments-no-verbs-probable`
pub struct PathSegmentsNoVerbsProbable {
    tagger: Box<dyn PosTagger>,
}

impl Default for PathSegmentsNoVerbsProbable {
    fn default() -> Self {
        Self::with_tagger(LexiconTagger::default())
    }
}

impl PathSegmentsNoVerbsProbable {
    /// Uses `tagger` for part-of-speech decisions.
    pub fn with_tagger<T: PosTagger + 'static>(tagger: T) -> Self {
        Self {
            tagger: Box::new(tagger),
        }
    }

    /// Finds the first probable verb of `segment`.
    pub fn probable_verb(
        &self,
        segment: &str,
        allowed: &HashSet<String>,
        disallowed: &HashSet<String>,
    ) -> Option<(VerbReason, String)> {
        for word in split_into_words(segment) {
            if word.chars().count() < 3 {
                continue;
            }
            if allowed.contains(&word) {
                tracing::trace!(word = %word, "skipping allowed word");
                continue;
            }

            let tag = self.tagger.tag(&word);
            tracing::trace!(word = %word, ?tag, "tagged path word");
            if tag.is_some_and(PosTag::is_active_verb) {
                return Some((VerbReason::Tagged, word));
            }
            if disallowed.contains(&word) {
                return Some((VerbReason::Disallowed, word));
            }
            if has_verb_like_suffix(&word) {
                return Some((VerbReason::Suffix, word));
            }
        }
        None
    }

    /// One violation per static segment of the template at `ctx.path` that
    /// probably contains a verb.
    pub fn check(&self, options: &ProbableVerbOptions, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let Some(template) = ctx.last_key() else {
            tracing::trace!(path = ?ctx.path, "no path template at rule location");
            return Vec::new();
        };

        let lower = |words: &[String]| -> HashSet<String> {
            words.iter().map(|w| w.to_lowercase()).collect()
        };
        let allowed = lower(&options.allowed);
        let disallowed = lower(&options.disallowed);

        let mut violations = Vec::new();
        for segment in static_segments(template) {
            if options.skip_blacklisted && find_blacklisted(segment).is_some() {
                tracing::trace!(segment, "skipped: blacklisted verb");
                continue;
            }
            if let Some((reason, word)) = self.probable_verb(segment, &allowed, &disallowed) {
                violations.push(Violation::at(
                    format!(
                        "Path segment \"{}\" is likely a verb or action ({}: \"{}\"). Prefer nouns for resources.",
                        segment,
                        reason.describe(),
                        word
                    ),
                    ctx.path.clone(),
                ));
            }
        }
        violations
    }
}

impl RuleFunction for PathSegmentsNoVerbsProbable {
    fn name(&self) -> &'static str {
        "path-segments-no-verbs-probable"
    }

    fn run(&self, _: &Value, options: &Value, ctx: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        let options: ProbableVerbOptions = parse_options(self.name(), options)?;
        Ok(self.check(&options, ctx))
    }
}
