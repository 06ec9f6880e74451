//! Tree builder
//!
//!     Drains a token stream front to back into document children. Only four token types mean
//!     anything here:
//!
//!         text, marker    leaves, appended unchanged
//!         open            starts a block
//!         close           ends the nearest open block
//!
//!     Any other token type is a syntax error, at the top level and inside blocks alike. A close
//!     at the top level is an error too.
//!
//! Block Locations
//!
//!     A block's location is seeded from the token right after its open token, so it starts
//!     where its content starts and not at the opening delimiter. With the default
//!     [EndOffset::LastText] policy only text children push `loc.end` forward; a trailing
//!     marker or nested block is not covered. [EndOffset::LastChild] extends the end to every
//!     child.
//!
//! Closing
//!
//!     With the default [CloseMatching::Unconditional] policy any close token ends the nearest
//!     block, whatever opened it: `(a]` is a well formed block. [CloseMatching::Strict] pairs
//!     the open and close tokens on a key:
//!
//!         array rules     the index of the matched literal, so `["<", "("]` pairs with
//!                         `[">", ")"]` position by position
//!         other rules     the first param
//!
//!     Tokens without a key, or with keys of different kinds, are accepted.
//!
//!     Running out of tokens inside a block is not an error. Every block still open is closed
//!     implicitly and attached to its parent.
//!
//! Nesting is tracked with an explicit stack of open blocks rather than recursion, and the
//! tree drops iteratively, so depth is bounded by the heap.

use crate::ruletree::ast::{Block, Node};
use crate::ruletree::error::SyntaxError;
use crate::ruletree::token::{Location, Token, TokenRole};
use std::collections::VecDeque;
use tracing::debug;

/// How a close token is paired with the block it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseMatching {
    /// Any close ends the nearest open block.
    #[default]
    Unconditional,
    /// A close whose pairing key differs from the open's is an error.
    Strict,
}

/// Which children move a block's `loc.end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndOffset {
    /// Only text children.
    #[default]
    LastText,
    /// Every child, including markers and nested blocks.
    LastChild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub close_matching: CloseMatching,
    pub end_offset: EndOffset,
}

impl BuildOptions {
    pub fn strict() -> Self {
        Self {
            close_matching: CloseMatching::Strict,
            ..Self::default()
        }
    }
}

/// Owned token queue, drained from the front as the tree is built.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: VecDeque<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }
}

/// A block being filled, with the open token's pairing for strict matching
struct OpenBlock {
    block: Block,
    pairing: Option<Pairing>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PairKey {
    Alternative(usize),
    Param(String),
}

/// Pairing key of an open or close token, with the text reported on a mismatch
#[derive(Debug, Clone)]
struct Pairing {
    key: PairKey,
    label: String,
}

impl Pairing {
    fn of(token: &Token) -> Option<Self> {
        if let Some(index) = token.alternative {
            return Some(Pairing {
                key: PairKey::Alternative(index),
                label: token.value.clone(),
            });
        }
        token.first_param().map(|param| Pairing {
            key: PairKey::Param(param.to_string()),
            label: param.to_string(),
        })
    }

    fn conflicts_with(&self, other: &Pairing) -> bool {
        match (&self.key, &other.key) {
            (PairKey::Alternative(a), PairKey::Alternative(b)) => a != b,
            (PairKey::Param(a), PairKey::Param(b)) => a != b,
            _ => false,
        }
    }
}

/// Drain `stream` into the children of a document.
pub fn build_children(
    mut stream: TokenStream,
    options: &BuildOptions,
) -> Result<Vec<Node>, SyntaxError> {
    let mut root: Vec<Node> = Vec::new();
    let mut open: Vec<OpenBlock> = Vec::new();

    while let Some(token) = stream.next() {
        match token.role() {
            TokenRole::Text => {
                if let Some(current) = open.last_mut() {
                    current.block.loc.end = token.loc.end;
                }
                attach(&mut root, &mut open, Node::Leaf(token), options);
            }
            TokenRole::Marker => attach(&mut root, &mut open, Node::Leaf(token), options),
            TokenRole::Open => {
                let seed = stream
                    .peek()
                    .map(|next| next.loc)
                    .unwrap_or_else(|| Location::empty_at(token.loc.end));
                let mut block = Block::new(seed);
                let pairing = Pairing::of(&token);
                block.open = token.params;
                open.push(OpenBlock { block, pairing });
            }
            TokenRole::Close => {
                let Some(mut current) = open.pop() else {
                    return Err(unexpected(token, true));
                };
                if options.close_matching == CloseMatching::Strict {
                    check_pairing(current.pairing.as_ref(), &token)?;
                }
                current.block.close = token.params;
                attach(&mut root, &mut open, Node::Block(current.block), options);
            }
            TokenRole::Other => return Err(unexpected(token, open.is_empty())),
        }
    }

    if !open.is_empty() {
        debug!(unterminated = open.len(), "closing unterminated blocks");
    }
    while let Some(current) = open.pop() {
        attach(&mut root, &mut open, Node::Block(current.block), options);
    }

    Ok(root)
}

/// Append `node` to the innermost open block, or to the document when none is open.
fn attach(root: &mut Vec<Node>, open: &mut [OpenBlock], node: Node, options: &BuildOptions) {
    match open.last_mut() {
        Some(parent) => {
            if options.end_offset == EndOffset::LastChild {
                parent.block.loc.end = parent.block.loc.end.max(node.loc().end);
            }
            parent.block.children.push(node);
        }
        None => root.push(node),
    }
}

fn check_pairing(opening: Option<&Pairing>, close: &Token) -> Result<(), SyntaxError> {
    match (opening, Pairing::of(close)) {
        (Some(opening), Some(closing)) if opening.conflicts_with(&closing) => {
            Err(SyntaxError::MismatchedClose {
                value: close.value.clone(),
                expected: opening.label.clone(),
                loc: close.loc,
            })
        }
        _ => Ok(()),
    }
}

fn unexpected(token: Token, top_level: bool) -> SyntaxError {
    if top_level {
        SyntaxError::UnexpectedToken {
            value: token.value,
            loc: token.loc,
        }
    } else {
        SyntaxError::UnexpectedTokenInBlock {
            value: token.value,
            loc: token.loc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruletree::token::{CLOSE, MARKER, OPEN};

    fn tok(kind: &str, value: &str, start: usize) -> Token {
        Token::new(kind, value, Location::new(start, start + value.chars().count()))
    }

    fn build(tokens: Vec<Token>) -> Result<Vec<Node>, SyntaxError> {
        build_children(TokenStream::new(tokens), &BuildOptions::default())
    }

    #[test]
    fn test_flat_leaves() {
        let tokens = vec![tok("text", "a", 0), tok(MARKER, "*", 1)];
        let nodes = build(tokens.clone()).unwrap();
        assert_eq!(
            nodes,
            vec![Node::Leaf(tokens[0].clone()), Node::Leaf(tokens[1].clone())]
        );
    }

    #[test]
    fn test_block_seeded_from_next_token() {
        let nodes = build(vec![
            tok(OPEN, "[", 0),
            tok("text", "bc", 1),
            tok(CLOSE, "]", 3),
        ])
        .unwrap();
        let block = nodes[0].as_block().unwrap();
        assert_eq!(block.loc, Location::new(1, 3));
        assert_eq!(block.children.len(), 1);
    }

    #[test]
    fn test_empty_block_takes_close_location() {
        let nodes = build(vec![tok(OPEN, "<", 0), tok(CLOSE, ">", 1)]).unwrap();
        let block = nodes[0].as_block().unwrap();
        assert!(block.children.is_empty());
        assert_eq!(block.loc, Location::new(1, 2));
    }

    #[test]
    fn test_trailing_open_is_empty_block() {
        let nodes = build(vec![tok("text", "a", 0), tok(OPEN, "[", 1)]).unwrap();
        let block = nodes[1].as_block().unwrap();
        assert!(block.children.is_empty());
        assert_eq!(block.loc, Location::empty_at(2));
    }

    #[test]
    fn test_marker_does_not_extend_end() {
        let nodes = build(vec![
            tok(OPEN, "[", 0),
            tok("text", "a", 1),
            tok(MARKER, "**", 2),
            tok(CLOSE, "]", 4),
        ])
        .unwrap();
        assert_eq!(nodes[0].as_block().unwrap().loc, Location::new(1, 2));
    }

    #[test]
    fn test_last_child_policy_extends_to_marker() {
        let options = BuildOptions {
            end_offset: EndOffset::LastChild,
            ..BuildOptions::default()
        };
        let nodes = build_children(
            TokenStream::new(vec![
                tok(OPEN, "[", 0),
                tok("text", "a", 1),
                tok(MARKER, "**", 2),
                tok(CLOSE, "]", 4),
            ]),
            &options,
        )
        .unwrap();
        assert_eq!(nodes[0].as_block().unwrap().loc, Location::new(1, 4));
    }

    #[test]
    fn test_nested_unterminated_blocks_unwind() {
        let nodes = build(vec![
            tok(OPEN, "[", 0),
            tok("text", "a", 1),
            tok(OPEN, "[", 2),
            tok("text", "b", 3),
        ])
        .unwrap();
        assert_eq!(nodes.len(), 1);
        let outer = nodes[0].as_block().unwrap();
        assert_eq!(outer.children.len(), 2);
        let inner = outer.children[1].as_block().unwrap();
        assert_eq!(inner.children[0].as_leaf().unwrap().value, "b");
        assert_eq!(outer.loc, Location::new(1, 2));
    }

    #[test]
    fn test_close_params_recorded() {
        let open = tok(OPEN, "<b>", 0).with_params(vec![Some("b".to_string())]);
        let close = tok(CLOSE, "</i>", 3).with_params(vec![Some("i".to_string())]);
        let nodes = build(vec![open, close]).unwrap();
        let block = nodes[0].as_block().unwrap();
        assert_eq!(block.open, Some(vec![Some("b".to_string())]));
        assert_eq!(block.close, Some(vec![Some("i".to_string())]));
    }

    #[test]
    fn test_strict_rejects_mismatch() {
        let open = tok(OPEN, "<b>", 0).with_params(vec![Some("b".to_string())]);
        let close = tok(CLOSE, "</i>", 3).with_params(vec![Some("i".to_string())]);
        let err = build_children(TokenStream::new(vec![open, close]), &BuildOptions::strict())
            .unwrap_err();
        assert_eq!(
            err,
            SyntaxError::MismatchedClose {
                value: "</i>".to_string(),
                expected: "b".to_string(),
                loc: Location::new(3, 7),
            }
        );
    }

    #[test]
    fn test_strict_pairs_alternatives_by_index() {
        let open = tok(OPEN, "(", 0)
            .with_params(vec![Some("(".to_string())])
            .with_alternative(1);
        let close = tok(CLOSE, ")", 2)
            .with_params(vec![Some(")".to_string())])
            .with_alternative(1);
        let nodes = build_children(
            TokenStream::new(vec![open.clone(), tok("text", "a", 1), close]),
            &BuildOptions::strict(),
        )
        .unwrap();
        assert_eq!(nodes[0].as_block().unwrap().children.len(), 1);

        let wrong = tok(CLOSE, ">", 2)
            .with_params(vec![Some(">".to_string())])
            .with_alternative(0);
        let err = build_children(TokenStream::new(vec![open, wrong]), &BuildOptions::strict())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "closing token \">\" does not match opening \"(\""
        );
    }

    #[test]
    fn test_strict_accepts_mixed_pairing_kinds() {
        let open = tok(OPEN, "(", 0).with_alternative(0);
        let close = tok(CLOSE, "</b>", 1).with_params(vec![Some("b".to_string())]);
        let nodes =
            build_children(TokenStream::new(vec![open, close]), &BuildOptions::strict()).unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_strict_without_params_accepts_any_close() {
        let nodes = build_children(
            TokenStream::new(vec![tok(OPEN, "(", 0), tok(CLOSE, "]", 1)]),
            &BuildOptions::strict(),
        )
        .unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_stray_close_at_top_level() {
        let err = build(vec![tok("text", "a", 0), tok(CLOSE, "]", 1)]).unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnexpectedToken {
                value: "]".to_string(),
                loc: Location::new(1, 2),
            }
        );
    }

    #[test]
    fn test_unknown_type_inside_block() {
        let err = build(vec![tok(OPEN, "[", 0), tok("emphasis", "_", 1)]).unwrap_err();
        assert_eq!(err.to_string(), "unexpected token \"_\"");
    }

    #[test]
    fn test_deep_nesting_without_recursion() {
        let depth = 10_000;
        let mut tokens = Vec::new();
        for i in 0..depth {
            tokens.push(tok(OPEN, "[", i));
        }
        for i in 0..depth {
            tokens.push(tok(CLOSE, "]", depth + i));
        }
        let nodes = build(tokens).unwrap();
        assert_eq!(nodes.len(), 1);
        drop(nodes);
    }

    #[test]
    fn test_stream_drains_front_to_back() {
        let mut stream = TokenStream::new(vec![tok("text", "a", 0), tok(MARKER, "*", 1)]);
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.peek().unwrap().value, "a");
        assert_eq!(stream.next().unwrap().value, "a");
        assert_eq!(stream.next().unwrap().value, "*");
        assert!(stream.is_empty());
    }
}
