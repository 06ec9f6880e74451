//! Detokenizer
//!
//! Turns a token stream back into source text. The tokenizer covers every character exactly
//! once, so this is the inverse of tokenizing with any rule set.

use crate::ruletree::token::Token;

pub fn detokenize(tokens: &[Token]) -> String {
    let mut result = String::new();
    for token in tokens {
        result.push_str(&token.value);
    }
    result
}
