//! Error types for rule compilation and tree building
//!
//! Tokenization never fails, so there are only two kinds of error: a rule that cannot be
//! compiled, and a token that has no meaning where it appears. Both abort the whole build.

use crate::ruletree::token::Location;

/// A rule specification that cannot be turned into a matcher.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("rules must be a mapping from rule name to rule")]
    NotAMapping,
    #[error("rule \"{name}\" must be either a string, regexp or an array of strings")]
    InvalidRule { name: String },
    #[error("rule \"{name}\" has an invalid pattern: {message}")]
    InvalidPattern { name: String, message: String },
    #[error("rule \"{name}\" uses unsupported flag '{flag}'")]
    UnsupportedFlag { name: String, flag: char },
}

/// A token that cannot appear at its position in the tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    /// Top level only accepts text, markers and opening tokens.
    #[error("unexpected token \"{value}\", expected opening tag, opening block or marker")]
    UnexpectedToken { value: String, loc: Location },
    #[error("unexpected token \"{value}\"")]
    UnexpectedTokenInBlock { value: String, loc: Location },
    /// Only raised with strict close matching.
    #[error("closing token \"{value}\" does not match opening \"{expected}\"")]
    MismatchedClose {
        value: String,
        expected: String,
        loc: Location,
    },
}

impl SyntaxError {
    /// Location of the offending token
    pub fn loc(&self) -> Location {
        match self {
            SyntaxError::UnexpectedToken { loc, .. }
            | SyntaxError::UnexpectedTokenInBlock { loc, .. }
            | SyntaxError::MismatchedClose { loc, .. } => *loc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

pub type Result<T> = std::result::Result<T, Error>;
