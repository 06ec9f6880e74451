//! # ruletree
//!
//! A rule-driven tokenizer and tree builder for markup-like mini-languages.
//!
//! There is no built-in grammar. The caller hands over an ordered set of named rules, and the
//! input is turned into a flat token stream and then into a tree of blocks. Three rule names
//! carry structural meaning:
//!
//!   open      begins a block
//!   close     ends the nearest open block
//!   marker    a standalone leaf
//!
//! Everything no rule matches becomes `text`.
//!
//! File Layout
//!
//! src/ruletree
//!   ├── rules      Rule specs and the rule compiler
//!   ├── lexing     The tokenizer
//!   ├── building   The tree builder
//!   ├── ast        Document, block and leaf nodes
//!   ├── formats    treeviz and detokenizer output
//!   ├── loader     Loading sources and rule files
//!   └── testing    Fluent assertions used by the test suites
//!
//! The pipeline is one way: rules -> compiled matchers -> tokens -> tree. See [ruletree::build].

pub mod ruletree;

pub use ruletree::ast::{Block, Document, Node};
pub use ruletree::building::{BuildOptions, CloseMatching, EndOffset};
pub use ruletree::error::{ConfigurationError, Error, SyntaxError};
pub use ruletree::rules::{RuleSet, RuleSpec};
pub use ruletree::token::{Location, Token};
pub use ruletree::{build, build_with_options};
