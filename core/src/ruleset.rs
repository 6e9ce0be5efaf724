#![deny(missing_docs)]

//! # Rulesets
//!
//! The YAML ruleset model: which functions run where, at which severity, and
//! on which document formats.
//!
//! A ruleset may `extend` another. Entries of the extending ruleset either
//! redefine a rule completely or only override the severity of an inherited
//! one:
//!
//! ```yaml
//! extends: [basic]
//! rules:
//!   path-segments-no-verbs-probable: error
//! ```
//!
//! Two rulesets are built in: `basic` and `strict`.

use crate::document::SpecFormat;
use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const BASIC_RULESET: &str = include_str!("../rulesets/basic-ruleset.yaml");
const STRICT_RULESET: &str = include_str!("../rulesets/strict-ruleset.yaml");

/// How serious a finding is. `Off` disables a rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed.
    Error,
    /// Should be fixed.
    #[default]
    Warn,
    /// Worth knowing.
    Info,
    /// Suggestion.
    Hint,
    /// Rule disabled.
    Off,
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Severity::Error),
            "warn" | "warning" => Ok(Severity::Warn),
            "info" | "information" => Ok(Severity::Info),
            "hint" => Ok(Severity::Hint),
            "off" => Ok(Severity::Off),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(true) => Ok(Severity::default()),
            Repr::Flag(false) => Ok(Severity::Off),
            Repr::Name(name) => name.parse().map_err(de::Error::custom),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
            Severity::Hint => "hint",
            Severity::Off => "off",
        };
        f.write_str(name)
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}

fn default_resolved() -> bool {
    true
}

/// One `then` action of a rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThenAction {
    /// Child key of the matched node to pass as target; `@key` passes the
    /// matched node's own key.
    #[serde(default)]
    pub field: Option<String>,
    /// Registered function name.
    pub function: String,
    /// Options handed to the function.
    #[serde(default)]
    pub function_options: Value,
}

/// A full rule definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    /// What the rule enforces.
    #[serde(default)]
    pub description: Option<String>,
    /// Message template overriding the function's message. Supports the
    /// `{{error}}`, `{{description}}`, `{{property}}` and `{{path}}` placeholders.
    #[serde(default)]
    pub message: Option<String>,
    /// Reported severity.
    #[serde(default)]
    pub severity: Severity,
    /// JSONPath selectors of the nodes this rule runs on.
    #[serde(deserialize_with = "one_or_many")]
    pub given: Vec<String>,
    /// Whether the rule sees the `$ref`-resolved document.
    #[serde(default = "default_resolved")]
    pub resolved: bool,
    /// Formats the rule applies to; empty means all.
    #[serde(default)]
    pub formats: Vec<SpecFormat>,
    /// Actions run on every matched node.
    #[serde(deserialize_with = "one_or_many")]
    pub then: Vec<ThenAction>,
}

impl RuleDefinition {
    /// Whether this rule applies to a document of `formats`.
    pub fn applies_to(&self, formats: &[SpecFormat]) -> bool {
        self.formats.is_empty() || self.formats.iter().any(|f| formats.contains(f))
    }
}

/// A ruleset entry: a definition or a severity override of an inherited rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleEntry {
    /// `code: warn`
    Override(Severity),
    /// `code: { given, then, ... }`
    Definition(RuleDefinition),
}

/// A ruleset, possibly extending others.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ruleset {
    /// Names of rulesets this one builds on, applied in order.
    #[serde(default, deserialize_with = "one_or_many")]
    pub extends: Vec<String>,
    /// Rules by code, in declaration order.
    #[serde(default)]
    pub rules: IndexMap<String, RuleEntry>,
}

impl Ruleset {
    /// Parses a ruleset without resolving `extends`.
    pub fn from_yaml(source: &str) -> AppResult<Self> {
        serde_yaml::from_str(source)
            .map_err(|e| AppError::Config(format!("Failed to parse ruleset YAML: {}", e)))
    }

    /// Parses a ruleset and resolves its `extends` chain.
    pub fn load(source: &str) -> AppResult<Self> {
        Self::from_yaml(source)?.resolve()
    }

    /// A built-in ruleset by name (`basic` or `strict`), fully resolved.
    pub fn builtin(name: &str) -> AppResult<Self> {
        let source = match name {
            "basic" => BASIC_RULESET,
            "strict" => STRICT_RULESET,
            other => {
                return Err(AppError::Config(format!("Unknown ruleset '{}'", other)));
            }
        };
        Self::load(source)
    }

    /// Flattens `extends`: inherited rules first, then this ruleset's entries
    /// merged over them.
    pub fn resolve(self) -> AppResult<Self> {
        let mut resolved = Ruleset::default();
        for name in &self.extends {
            tracing::debug!(ruleset = %name, "extending ruleset");
            resolved.extend(Self::builtin(name)?)?;
        }
        resolved.extend(Ruleset {
            extends: Vec::new(),
            rules: self.rules,
        })?;
        Ok(resolved)
    }

    /// Merges `overrides` into this ruleset.
    ///
    /// Definitions replace (or add) rules; severity overrides must target a
    /// rule already defined here.
    pub fn extend(&mut self, overrides: Ruleset) -> AppResult<()> {
        for (code, entry) in overrides.rules {
            match entry {
                RuleEntry::Override(severity) => match self.rules.get_mut(&code) {
                    Some(RuleEntry::Definition(def)) => def.severity = severity,
                    _ => {
                        return Err(AppError::Config(format!(
                            "Cannot override severity of undefined rule '{}'",
                            code
                        )));
                    }
                },
                definition => {
                    self.rules.insert(code, definition);
                }
            }
        }
        Ok(())
    }

    /// The definition of `code`, if defined.
    pub fn rule(&self, code: &str) -> Option<&RuleDefinition> {
        match self.rules.get(code) {
            Some(RuleEntry::Definition(def)) => Some(def),
            _ => None,
        }
    }

    /// Defined rules in declaration order.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &RuleDefinition)> {
        self.rules.iter().filter_map(|(code, entry)| match entry {
            RuleEntry::Definition(def) => Some((code.as_str(), def)),
            RuleEntry::Override(_) => None,
        })
    }
}
