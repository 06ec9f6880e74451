//! Named document formats
//!
//! A [Formatter] turns a [Document] into text. The [FormatRegistry] maps format names to
//! formatters and keeps them ordered by name, which is the order they are listed in.

use crate::ruletree::ast::Document;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("unknown format \"{0}\"")]
    UnknownFormat(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait Formatter: Send + Sync {
    /// Lookup name, e.g. `treeviz`
    fn name(&self) -> &'static str;

    /// One line shown when listing formats
    fn description(&self) -> &'static str;

    fn serialize(&self, doc: &Document) -> Result<String, FormatError>;
}

pub struct FormatRegistry {
    formatters: BTreeMap<&'static str, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// An empty registry. [FormatRegistry::default] has the built-in formats.
    pub fn new() -> Self {
        Self {
            formatters: BTreeMap::new(),
        }
    }

    /// Add `formatter` under its name. A formatter already registered under that name is
    /// returned.
    pub fn register<F: Formatter + 'static>(
        &mut self,
        formatter: F,
    ) -> Option<Box<dyn Formatter>> {
        self.formatters.insert(formatter.name(), Box::new(formatter))
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|formatter| formatter.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Serialize `doc` with the formatter registered as `name`.
    pub fn render(&self, doc: &Document, name: &str) -> Result<String, FormatError> {
        match self.get(name) {
            Some(formatter) => formatter.serialize(doc),
            None => Err(FormatError::UnknownFormat(name.to_string())),
        }
    }

    /// `(name, description)` pairs in name order
    pub fn descriptions(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.formatters
            .values()
            .map(|formatter| (formatter.name(), formatter.description()))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(super::JsonFormatter::pretty());
        registry.register(super::JsonFormatter::compact());
        registry.register(super::TreevizFormatter);
        registry
    }
}
