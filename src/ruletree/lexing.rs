//! Tokenizer
//!
//!     Scans the source left to right. At each position the compiled rules are tried in order and
//!     the first one that matches wins, even if a later rule would match more text. There is no
//!     backtracking and no longest-match search.
//!
//!     Characters no rule matches are buffered and flushed as a single `text` token right before
//!     the next rule token, and once more at the end of input. Tokenizing never fails:
//!
//!         - concatenating the token values gives back the source
//!         - token locations are contiguous and cover `[0, len)` in characters
//!
//!     A rule that matches the empty string at a position is treated as not matching there, so
//!     the cursor always advances.

use crate::ruletree::rules::CompiledRule;
use crate::ruletree::token::{Location, Token};
use tracing::{debug, trace};

/// Tokenize `source` with already compiled rules.
pub fn tokenize(source: &str, rules: &[CompiledRule]) -> Vec<Token> {
    let tokens = Tokenizer::new(source, rules).run();
    debug!(tokens = tokens.len(), bytes = source.len(), "tokenized source");
    tokens
}

struct Tokenizer<'a> {
    source: &'a str,
    rules: &'a [CompiledRule],
    /// Byte position of the unconsumed suffix
    cursor: usize,
    /// Character offset matching `cursor`
    offset: usize,
    /// Pending plain text, as a byte position and character offset where it began
    pending: Option<(usize, usize)>,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str, rules: &'a [CompiledRule]) -> Self {
        Self {
            source,
            rules,
            cursor: 0,
            offset: 0,
            pending: None,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.cursor < self.source.len() {
            if !self.match_rule() {
                self.buffer_char();
            }
        }
        self.flush_text();
        self.tokens
    }

    /// Try every rule at the cursor and emit a token for the first non-empty match.
    fn match_rule(&mut self) -> bool {
        let (source, rules) = (self.source, self.rules);
        let rest = &source[self.cursor..];

        for rule in rules {
            let (value, params) = if rule.has_params() {
                let Some(caps) = rule.pattern.captures(rest) else {
                    continue;
                };
                let params = caps
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str().to_string()))
                    .collect::<Vec<_>>();
                (caps[0].to_string(), Some(params))
            } else {
                let Some(found) = rule.pattern.find(rest) else {
                    continue;
                };
                (found.as_str().to_string(), None)
            };

            if value.is_empty() {
                continue;
            }

            self.flush_text();
            let start = self.offset;
            self.cursor += value.len();
            self.offset += value.chars().count();

            let alternative = rule.alternative_index(&value);
            let token = Token {
                kind: rule.name.clone(),
                value,
                params,
                loc: Location::new(start, self.offset),
                alternative,
            };
            trace!(%token, "rule token");
            self.tokens.push(token);
            return true;
        }

        false
    }

    fn buffer_char(&mut self) {
        if self.pending.is_none() {
            self.pending = Some((self.cursor, self.offset));
        }
        let width = self.source[self.cursor..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(1);
        self.cursor += width;
        self.offset += 1;
    }

    fn flush_text(&mut self) {
        if let Some((byte_start, start)) = self.pending.take() {
            let token = Token::text(
                &self.source[byte_start..self.cursor],
                Location::new(start, self.offset),
            );
            trace!(%token, "text token");
            self.tokens.push(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruletree::rules::{compile_rules, RuleSet};

    fn lex(source: &str, rules: RuleSet) -> Vec<Token> {
        tokenize(source, &compile_rules(&rules).unwrap())
    }

    fn summary(tokens: &[Token]) -> Vec<(&str, &str, usize, usize)> {
        tokens
            .iter()
            .map(|t| (t.kind.as_str(), t.value.as_str(), t.loc.start, t.loc.end))
            .collect()
    }

    #[test]
    fn test_brackets_and_marker() {
        let rules = RuleSet::new()
            .literal("open", "[")
            .literal("close", "]")
            .literal("marker", "*");
        let tokens = lex("a[b*c]d", rules);

        assert_eq!(
            summary(&tokens),
            vec![
                ("text", "a", 0, 1),
                ("open", "[", 1, 2),
                ("text", "b", 2, 3),
                ("marker", "*", 3, 4),
                ("text", "c", 4, 5),
                ("close", "]", 5, 6),
                ("text", "d", 6, 7),
            ]
        );
        assert!(tokens.iter().all(|t| t.params.is_none()));
    }

    #[test]
    fn test_empty_source() {
        assert!(lex("", RuleSet::new().literal("open", "[")).is_empty());
    }

    #[test]
    fn test_no_rules_is_one_text_token() {
        let tokens = lex("plain text", RuleSet::new());
        assert_eq!(summary(&tokens), vec![("text", "plain text", 0, 10)]);
    }

    #[test]
    fn test_first_rule_wins_over_longer_match() {
        let rules = RuleSet::new()
            .literal("marker", "<")
            .literal("open", "<b>");
        let tokens = lex("<b>", rules);
        assert_eq!(summary(&tokens), vec![("marker", "<", 0, 1), ("text", "b>", 1, 3)]);
    }

    #[test]
    fn test_pattern_params() {
        let rules = RuleSet::new()
            .pattern("close", r"</(\w+)>", "")
            .pattern("open", r"<(\w+)(?: (\w+))?>", "g");
        let tokens = lex("<p>x</p>", rules);

        assert_eq!(tokens[0].params, Some(vec![Some("p".to_string()), None]));
        assert_eq!(tokens[1], Token::text("x", Location::new(3, 4)));
        assert_eq!(tokens[2].kind, "close");
        assert_eq!(tokens[2].params, Some(vec![Some("p".to_string())]));
        assert_eq!(tokens[2].loc, Location::new(4, 8));
    }

    #[test]
    fn test_alternatives_report_matched_literal() {
        let rules = RuleSet::new().alternatives("open", ["<", "("]);
        let tokens = lex("(", rules);
        assert_eq!(tokens[0].params, Some(vec![Some("(".to_string())]));
        assert_eq!(tokens[0].alternative, Some(1));
    }

    #[test]
    fn test_only_array_rules_record_alternative() {
        let rules = RuleSet::new()
            .pattern("open", r"<(\w+)>", "")
            .literal("close", "]");
        let tokens = lex("<b>x]", rules);
        assert!(tokens.iter().all(|t| t.alternative.is_none()));
    }

    #[test]
    fn test_empty_match_does_not_stall() {
        let rules = RuleSet::new()
            .pattern("marker", "x*", "")
            .literal("open", "[");
        let tokens = lex("ab[xx", rules);
        assert_eq!(
            summary(&tokens),
            vec![("text", "ab", 0, 2), ("open", "[", 2, 3), ("marker", "xx", 3, 5)]
        );
    }

    #[test]
    fn test_offsets_are_characters() {
        let rules = RuleSet::new().literal("marker", "→");
        let tokens = lex("héllo→wörld", rules);
        assert_eq!(
            summary(&tokens),
            vec![
                ("text", "héllo", 0, 5),
                ("marker", "→", 5, 6),
                ("text", "wörld", 6, 11),
            ]
        );
    }

    #[test]
    fn test_round_trip() {
        let rules = RuleSet::new()
            .pattern("open", r"\{\{(\w+)", "")
            .literal("close", "}}")
            .alternatives("marker", ["\n", "--"]);
        let source = "intro {{note body -- more\n}} tail";
        let tokens = lex(source, rules);
        let joined: String = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(joined, source);
    }
}
