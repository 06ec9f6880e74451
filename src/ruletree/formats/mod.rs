//! Output formats
//!
//! Document formats go through the [registry](registry::FormatRegistry). Token streams have
//! their own helpers since they are not documents: [tokens_to_json] and [detokenize].

pub mod detokenizer;
pub mod json;
pub mod registry;
pub mod treeviz;

pub use detokenizer::detokenize;
pub use json::{tokens_to_json, JsonFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
