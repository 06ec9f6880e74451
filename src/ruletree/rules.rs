//! Rules and the rule compiler
//!
//!     A rule is a named pattern used to classify a prefix of the remaining input. Rules come in
//!     three shapes, all normalized to a regex anchored at the start of the haystack:
//!
//!         "["                          literal text, matched verbatim
//!         { pattern: "<(\w+)>", flags } a regular expression
//!         ["<", "&lt;"]                any one of several literals
//!
//!     The order of a [RuleSet] is the order rules are tried in by the tokenizer, and the first
//!     rule that matches wins. Callers put more specific rules first.
//!
//! Anchoring
//!
//!     Every pattern is wrapped as `\A(?:...)`, so alternations in a caller pattern cannot escape
//!     the anchor and the `m` flag does not turn it into a line anchor. Alternatives are wrapped
//!     in a capturing group instead, which reports the matched alternative as the token's only
//!     param.

pub mod files;

use crate::ruletree::error::ConfigurationError;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::debug;

/// One rule specification, before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSpec {
    Literal(String),
    /// Regular expression source plus flag letters. `g` is ignored.
    Pattern {
        source: String,
        flags: String,
    },
    Alternatives(Vec<String>),
}

impl RuleSpec {
    /// Read a rule from untyped data.
    ///
    /// Strings are literals, arrays of strings are alternatives and objects with a `pattern`
    /// (or `source`) string and optional `flags` string are patterns. Anything else is rejected.
    pub fn from_value(name: &str, value: &Value) -> Result<Self, ConfigurationError> {
        let invalid = || ConfigurationError::InvalidRule {
            name: name.to_string(),
        };

        match value {
            Value::String(text) => Ok(RuleSpec::Literal(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()
                .map(RuleSpec::Alternatives),
            Value::Object(fields) => {
                let source = fields
                    .get("pattern")
                    .or_else(|| fields.get("source"))
                    .and_then(Value::as_str)
                    .ok_or_else(invalid)?;
                let flags = match fields.get("flags") {
                    None | Some(Value::Null) => "",
                    Some(Value::String(flags)) => flags.as_str(),
                    Some(_) => return Err(invalid()),
                };
                Ok(RuleSpec::Pattern {
                    source: source.to_string(),
                    flags: flags.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }
}

/// Ordered mapping from rule name to rule spec.
///
/// Adding a rule under a name that already exists replaces its spec but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<(String, RuleSpec)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a rule set from a JSON-like mapping, keeping key order.
    pub fn from_value(value: &Value) -> Result<Self, ConfigurationError> {
        let fields = value.as_object().ok_or(ConfigurationError::NotAMapping)?;
        let mut set = RuleSet::new();
        for (name, spec) in fields {
            set.insert(name.clone(), RuleSpec::from_value(name, spec)?);
        }
        Ok(set)
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: RuleSpec) {
        let name = name.into();
        match self.rules.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = spec,
            None => self.rules.push((name, spec)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, spec: RuleSpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn literal(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.with(name, RuleSpec::Literal(text.into()))
    }

    pub fn pattern(
        self,
        name: impl Into<String>,
        source: impl Into<String>,
        flags: impl Into<String>,
    ) -> Self {
        self.with(
            name,
            RuleSpec::Pattern {
                source: source.into(),
                flags: flags.into(),
            },
        )
    }

    pub fn alternatives<I, S>(self, name: impl Into<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(
            name,
            RuleSpec::Alternatives(texts.into_iter().map(Into::into).collect()),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.rules.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A rule name paired with its anchored matcher.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub name: String,
    pub pattern: Regex,
    /// The literals of an array rule, in order
    pub alternatives: Option<Vec<String>>,
}

impl CompiledRule {
    /// Whether matches carry params (capture groups past the full match)
    pub fn has_params(&self) -> bool {
        self.pattern.captures_len() > 1
    }

    /// Index of `matched` among the literals of an array rule.
    ///
    /// Duplicate literals resolve to their first position.
    pub fn alternative_index(&self, matched: &str) -> Option<usize> {
        self.alternatives
            .as_ref()?
            .iter()
            .position(|literal| literal == matched)
    }
}

/// Compile every rule, preserving order.
pub fn compile_rules(rules: &RuleSet) -> Result<Vec<CompiledRule>, ConfigurationError> {
    let compiled = rules
        .iter()
        .map(|(name, spec)| compile_rule(name, spec))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(rules = compiled.len(), "compiled rules");
    Ok(compiled)
}

pub fn compile_rule(name: &str, spec: &RuleSpec) -> Result<CompiledRule, ConfigurationError> {
    let pattern = match spec {
        RuleSpec::Literal(text) => build_regex(name, &anchored(&regex::escape(text)), "")?,
        RuleSpec::Pattern { source, flags } => build_regex(name, &anchored(source), flags)?,
        RuleSpec::Alternatives(texts) => {
            let alternation = texts
                .iter()
                .map(|text| regex::escape(text))
                .collect::<Vec<_>>()
                .join("|");
            build_regex(name, &format!(r"\A({alternation})"), "")?
        }
    };

    let alternatives = match spec {
        RuleSpec::Alternatives(texts) => Some(texts.clone()),
        _ => None,
    };

    Ok(CompiledRule {
        name: name.to_string(),
        pattern,
        alternatives,
    })
}

fn anchored(source: &str) -> String {
    format!(r"\A(?:{source})")
}

fn build_regex(name: &str, source: &str, flags: &str) -> Result<Regex, ConfigurationError> {
    let mut builder = RegexBuilder::new(source);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            // Matching is always single-shot, anchored and Unicode-aware.
            'g' | 'y' | 'u' => {}
            other => {
                return Err(ConfigurationError::UnsupportedFlag {
                    name: name.to_string(),
                    flag: other,
                })
            }
        }
    }

    builder
        .build()
        .map_err(|err| ConfigurationError::InvalidPattern {
            name: name.to_string(),
            message: err.to_string(),
        })
}
