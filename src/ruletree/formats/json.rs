//! JSON output for documents and token streams

use super::registry::{FormatError, Formatter};
use crate::ruletree::ast::Document;
use crate::ruletree::token::Token;

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        if self.pretty {
            "json"
        } else {
            "json-compact"
        }
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        to_json(doc, self.pretty)
    }

    fn description(&self) -> &'static str {
        if self.pretty {
            "Document tree as indented JSON"
        } else {
            "Document tree as single-line JSON"
        }
    }
}

pub fn tokens_to_json(tokens: &[Token], pretty: bool) -> Result<String, FormatError> {
    to_json(tokens, pretty)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, FormatError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
