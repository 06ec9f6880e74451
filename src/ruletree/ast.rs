//! Document tree
//!
//! Three node shapes:
//!
//!     document    the root, spanning the whole input
//!     block       children between an open token and its close
//!     leaf        a text or marker token, kept exactly as the tokenizer produced it
//!
//! Everything is plain owned data with no parent or sibling links. Dropping a tree and walking
//! its leaves do not recurse, so nesting depth is limited by memory rather than the call stack.
//! Serializing does recurse.
//!
//! Trees serialize to JSON as
//!
//! ```json
//! { "type": "document", "children": [...], "loc": { "start": 0, "end": 7 } }
//! { "type": "block", "children": [...], "loc": {...}, "open": ["b"], "close": ["b"] }
//! { "type": "text", "value": "a", "loc": {...} }
//! ```

use crate::ruletree::token::{Location, Token};
use serde::Serialize;

pub type Params = Vec<Option<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Block(Block),
    Leaf(Token),
}

impl Node {
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Token> {
        match self {
            Node::Leaf(token) => Some(token),
            Node::Block(_) => None,
        }
    }

    pub fn loc(&self) -> Location {
        match self {
            Node::Block(block) => block.loc,
            Node::Leaf(token) => token.loc,
        }
    }

    /// `"block"` for blocks, the token type for leaves
    pub fn node_type(&self) -> &str {
        match self {
            Node::Block(_) => "block",
            Node::Leaf(token) => &token.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "block")]
pub struct Block {
    pub children: Vec<Node>,
    pub loc: Location,
    /// Params of the opening token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Params>,
    /// Params of the closing token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<Params>,
}

impl Block {
    pub fn new(loc: Location) -> Self {
        Self {
            children: Vec::new(),
            loc,
            open: None,
            close: None,
        }
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // Detach descendants onto a work list so each block drops with no children left.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Block(mut block) = node {
                pending.append(&mut block.children);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "document")]
pub struct Document {
    pub children: Vec<Node>,
    pub loc: Location,
}

impl Document {
    /// Concatenated leaf values in document order.
    ///
    /// Open and close tokens do not survive into the tree, so this is the source without its
    /// block delimiters.
    pub fn text(&self) -> String {
        self.leaves()
            .into_iter()
            .map(|token| token.value.as_str())
            .collect()
    }

    /// Every leaf in document order, depth first
    pub fn leaves(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        let mut levels = vec![self.children.iter()];
        while let Some(level) = levels.last_mut() {
            match level.next() {
                Some(Node::Leaf(token)) => out.push(token),
                Some(Node::Block(block)) => levels.push(block.children.iter()),
                None => {
                    levels.pop();
                }
            }
        }
        out
    }

    /// Deepest block nesting, 0 for a flat document
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut pending: Vec<(&Node, usize)> = self.children.iter().map(|n| (n, 0)).collect();
        while let Some((node, level)) = pending.pop() {
            if let Node::Block(block) = node {
                max = max.max(level + 1);
                pending.extend(block.children.iter().map(|child| (child, level + 1)));
            }
        }
        max
    }
}
