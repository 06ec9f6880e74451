//! Fluent assertion API for document trees
//!
//!     Tests describe the expected tree instead of walking nodes by hand. Every assertion
//!     carries a context path (`children[1].children[0]`) so failures point at the node.
//!
//!     ```rust,ignore
//!     use ruletree::ruletree::testing::assert_tree;
//!
//!     assert_tree(&doc)
//!         .child_count(3)
//!         .child(0, |c| { c.assert_text("a"); })
//!         .child(1, |c| {
//!             c.assert_block()
//!                 .child_count(3)
//!                 .child(1, |m| { m.assert_marker("*"); });
//!         })
//!         .child(2, |c| { c.assert_text("d"); });
//!     ```

use crate::ruletree::ast::{Block, Document, Node};
use crate::ruletree::token::{Location, Token, MARKER, TEXT};

pub fn assert_tree(doc: &Document) -> DocumentAssertion<'_> {
    DocumentAssertion { doc }
}

fn summarize(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|node| node.node_type())
        .collect::<Vec<_>>()
        .join(", ")
}

fn assert_child_count(nodes: &[Node], expected: usize, context: &str) {
    assert_eq!(
        nodes.len(),
        expected,
        "{context}: Expected {expected} children, found {}: [{}]",
        nodes.len(),
        summarize(nodes)
    );
}

fn child_at<'a>(nodes: &'a [Node], index: usize, context: &str) -> &'a Node {
    assert!(
        index < nodes.len(),
        "{context}: Child index {index} out of bounds ({} children)",
        nodes.len()
    );
    &nodes[index]
}

pub struct DocumentAssertion<'a> {
    doc: &'a Document,
}

impl<'a> DocumentAssertion<'a> {
    pub fn child_count(self, expected: usize) -> Self {
        assert_child_count(&self.doc.children, expected, "document");
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node = child_at(&self.doc.children, index, "document");
        assertion(NodeAssertion {
            node,
            context: format!("children[{index}]"),
        });
        self
    }

    pub fn loc(self, start: usize, end: usize) -> Self {
        assert_eq!(
            self.doc.loc,
            Location::new(start, end),
            "document: Expected location {start}..{end}"
        );
        self
    }

    /// Concatenated leaf text of the whole document
    pub fn text(self, expected: &str) -> Self {
        let actual = self.doc.text();
        assert_eq!(
            actual, expected,
            "document: Expected text '{expected}', but got '{actual}'"
        );
        self
    }
}

pub struct NodeAssertion<'a> {
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn assert_block(self) -> BlockAssertion<'a> {
        match self.node {
            Node::Block(block) => BlockAssertion {
                block,
                context: self.context,
            },
            Node::Leaf(token) => panic!(
                "{}: Expected block, found {} {:?}",
                self.context, token.kind, token.value
            ),
        }
    }

    /// Assert a leaf of the given type and return it for further checks
    pub fn assert_leaf(self, kind: &str, value: &str) -> &'a Token {
        match self.node {
            Node::Leaf(token) => {
                assert_eq!(
                    token.kind, kind,
                    "{}: Expected leaf of type '{kind}', found '{}'",
                    self.context, token.kind
                );
                assert_eq!(
                    token.value, value,
                    "{}: Expected value {value:?}, but got {:?}",
                    self.context, token.value
                );
                token
            }
            Node::Block(_) => panic!("{}: Expected {kind} leaf, found block", self.context),
        }
    }

    pub fn assert_text(self, value: &str) -> &'a Token {
        self.assert_leaf(TEXT, value)
    }

    pub fn assert_marker(self, value: &str) -> &'a Token {
        self.assert_leaf(MARKER, value)
    }
}

pub struct BlockAssertion<'a> {
    block: &'a Block,
    context: String,
}

impl<'a> BlockAssertion<'a> {
    pub fn child_count(self, expected: usize) -> Self {
        assert_child_count(&self.block.children, expected, &self.context);
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node = child_at(&self.block.children, index, &self.context);
        assertion(NodeAssertion {
            node,
            context: format!("{}.children[{index}]", self.context),
        });
        self
    }

    pub fn loc(self, start: usize, end: usize) -> Self {
        assert_eq!(
            self.block.loc,
            Location::new(start, end),
            "{}: Expected block location {start}..{end}, found {}",
            self.context, self.block.loc
        );
        self
    }

    pub fn open_params(self, expected: &[&str]) -> Self {
        assert_params(self.block.open.as_deref(), expected, "open", &self.context);
        self
    }

    pub fn close_params(self, expected: &[&str]) -> Self {
        assert_params(self.block.close.as_deref(), expected, "close", &self.context);
        self
    }

    pub fn no_open_params(self) -> Self {
        assert!(
            self.block.open.is_none(),
            "{}: Expected no open params, found {:?}",
            self.context,
            self.block.open
        );
        self
    }

    pub fn no_close_params(self) -> Self {
        assert!(
            self.block.close.is_none(),
            "{}: Expected no close params, found {:?}",
            self.context,
            self.block.close
        );
        self
    }
}

fn assert_params(actual: Option<&[Option<String>]>, expected: &[&str], which: &str, context: &str) {
    let actual: Option<Vec<Option<&str>>> =
        actual.map(|params| params.iter().map(|p| p.as_deref()).collect());
    let expected: Vec<Option<&str>> = expected.iter().map(|p| Some(*p)).collect();
    assert_eq!(actual, Some(expected), "{context}: Unexpected {which} params");
}
