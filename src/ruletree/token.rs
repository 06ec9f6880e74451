//! Tokens and their source locations
//!
//! Locations are character offsets into the original input, `end` exclusive. There are no
//! line or column positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token type emitted for characters no rule matched
pub const TEXT: &str = "text";
pub const OPEN: &str = "open";
pub const CLOSE: &str = "close";
pub const MARKER: &str = "marker";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl Location {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width location at `offset`
    pub fn empty_at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Structural meaning of a token in the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    Text,
    Open,
    Close,
    Marker,
    /// A caller rule name with no structural meaning
    Other,
}

/// A classified span of the input.
///
/// Serializes as `{ "type", "value", "params"?, "loc" }`. Leaf nodes in the tree are these
/// tokens, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    /// Capture groups past the full match. `None` entries are groups that did not participate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Option<String>>>,
    pub loc: Location,
    /// Position of the matched literal within an array rule. Strict close matching pairs
    /// opening and closing alternatives by this index. Never serialized.
    #[serde(skip)]
    pub alternative: Option<usize>,
}

impl Token {
    pub fn new(kind: impl Into<String>, value: impl Into<String>, loc: Location) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            params: None,
            loc,
            alternative: None,
        }
    }

    pub fn text(value: impl Into<String>, loc: Location) -> Self {
        Self::new(TEXT, value, loc)
    }

    pub fn with_params(mut self, params: Vec<Option<String>>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_alternative(mut self, index: usize) -> Self {
        self.alternative = Some(index);
        self
    }

    pub fn role(&self) -> TokenRole {
        match self.kind.as_str() {
            TEXT => TokenRole::Text,
            OPEN => TokenRole::Open,
            CLOSE => TokenRole::Close,
            MARKER => TokenRole::Marker,
            _ => TokenRole::Other,
        }
    }

    /// First captured param, if the rule had groups and the first one participated
    pub fn first_param(&self) -> Option<&str> {
        self.params.as_ref()?.first()?.as_deref()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})@{}", self.kind, self.value, self.loc)
    }
}
