//! Main module for ruletree library functionality

pub mod ast;
pub mod building;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod loader;
pub mod rules;
pub mod testing;
pub mod token;

use ast::Document;
use building::{BuildOptions, TokenStream};
use error::Error;
use rules::RuleSet;
use token::Location;

/// Build a document tree from `text` using the default build options.
///
/// Rules are compiled, the text is tokenized in one pass and the token stream is drained into
/// the tree. The document spans the whole input.
pub fn build(text: &str, rules: &RuleSet) -> Result<Document, Error> {
    build_with_options(text, rules, &BuildOptions::default())
}

/// Same as [build], with explicit close matching and end offset policies.
pub fn build_with_options(
    text: &str,
    rules: &RuleSet,
    options: &BuildOptions,
) -> Result<Document, Error> {
    let compiled = rules::compile_rules(rules)?;
    let tokens = lexing::tokenize(text, &compiled);
    let children = building::build_children(TokenStream::new(tokens), options)?;

    Ok(Document {
        children,
        loc: Location::new(0, text.chars().count()),
    })
}
