//! Treeviz formatter
//!
//! One line per node, nesting drawn with tree connectors, 2 columns per level:
//!
//! <prefix><connector> <icon> <label>     (label truncated to 30 characters)
//!
//! ⧉ document
//! ├─ ◦ a
//! ├─ ▣ block
//! │ ├─ ◦ b
//! │ ├─ • *
//! │ └─ ◦ c
//! └─ ◦ d
//!
//! Icons
//!     Document: ⧉
//!     Block: ▣
//!     Text: ◦
//!     Marker: •
//!     Any other token type: ○
//!
//! Leaf labels are the token value with control characters escaped, so a newline marker shows
//! up as `\n`. Blocks are labelled with the first param of their open token when there is one.

use super::registry::{FormatError, Formatter};
use crate::ruletree::ast::{Document, Node};
use crate::ruletree::token::{MARKER, TEXT};
use std::collections::HashMap;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node: &Node) -> &'static str {
    match node {
        Node::Block(_) => "▣",
        Node::Leaf(token) => match token.kind.as_str() {
            TEXT => "◦",
            MARKER => "•",
            _ => "○",
        },
    }
}

fn label(node: &Node) -> String {
    match node {
        Node::Block(block) => match block.open.as_ref().and_then(|p| p.first().cloned().flatten()) {
            Some(tag) => format!("block {tag}"),
            None => "block".to_string(),
        },
        Node::Leaf(token) => token.value.escape_debug().to_string(),
    }
}

fn format_node(
    node: &Node,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    show_loc: bool,
) -> String {
    let mut output = String::new();

    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };
    let loc_suffix = if show_loc {
        format!(" @{}", node.loc())
    } else {
        String::new()
    };

    output.push_str(&format!(
        "{prefix}{connector} {} {}{loc_suffix}\n",
        get_icon(node),
        truncate(&label(node), 30),
    ));

    if let Node::Block(block) = node {
        let child_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
        let child_count = block.children.len();
        for (i, child) in block.children.iter().enumerate() {
            output.push_str(&format_node(child, &child_prefix, i, child_count, show_loc));
        }
    }

    output
}

pub fn to_treeviz_str(doc: &Document) -> String {
    to_treeviz_str_with_params(doc, &HashMap::new())
}

/// Supported params: `show-loc` (append each node's location)
pub fn to_treeviz_str_with_params(doc: &Document, params: &HashMap<String, String>) -> String {
    let show_loc = params
        .get("show-loc")
        .map(|v| v != "false")
        .unwrap_or(false);

    let mut output = if show_loc {
        format!("⧉ document @{}\n", doc.loc)
    } else {
        "⧉ document\n".to_string()
    };
    let child_count = doc.children.len();
    for (i, child) in doc.children.iter().enumerate() {
        output.push_str(&format_node(child, "", i, child_count, show_loc));
    }
    output
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &'static str {
        "treeviz"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }

    fn description(&self) -> &'static str {
        "Visual tree representation with indentation and Unicode icons"
    }
}
