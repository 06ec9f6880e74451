//! Document loading utilities
//!
//! `DocumentLoader` loads source text from a file or a string and runs the tokenizer or the
//! full build on it. The CLI and the integration tests go through it.
//!
//! ```rust
//! use ruletree::ruletree::loader::DocumentLoader;
//! use ruletree::{BuildOptions, RuleSet};
//!
//! let rules = RuleSet::from_path("rules.yaml")?;
//! let doc = DocumentLoader::from_path("page.txt")?.build(&rules, &BuildOptions::default())?;
//! ```

use crate::ruletree::ast::Document;
use crate::ruletree::building::BuildOptions;
use crate::ruletree::error::{ConfigurationError, Error};
use crate::ruletree::lexing;
use crate::ruletree::rules::{compile_rules, RuleSet};
use crate::ruletree::token::Token;
use std::fs;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Build(#[from] Error),
}

impl From<ConfigurationError> for LoaderError {
    fn from(err: ConfigurationError) -> Self {
        LoaderError::Build(err.into())
    }
}

pub struct DocumentLoader {
    source: String,
}

impl DocumentLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let source = fs::read_to_string(path)?;
        Ok(DocumentLoader { source })
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
        }
    }

    /// Read all of standard input
    pub fn from_stdin() -> Result<Self, LoaderError> {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(DocumentLoader { source })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Compile `rules` and return the flat token stream
    pub fn tokenize(&self, rules: &RuleSet) -> Result<Vec<Token>, LoaderError> {
        let compiled = compile_rules(rules)?;
        Ok(lexing::tokenize(&self.source, &compiled))
    }

    pub fn build(&self, rules: &RuleSet, options: &BuildOptions) -> Result<Document, LoaderError> {
        Ok(crate::ruletree::build_with_options(
            &self.source,
            rules,
            options,
        )?)
    }
}
