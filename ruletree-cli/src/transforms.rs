//! Output transforms
//!
//! Each transform is a stage + format combination: document formats go through the format
//! registry, token formats stop after tokenizing.

use ruletree::ruletree::formats::treeviz::to_treeviz_str_with_params;
use ruletree::ruletree::formats::{detokenize, tokens_to_json, FormatRegistry};
use ruletree::ruletree::loader::DocumentLoader;
use ruletree::{BuildOptions, RuleSet};
use std::collections::HashMap;

/// Token stream formats, handled outside the document registry
pub const TOKEN_TRANSFORMS: &[(&str, &str)] = &[
    ("tokens-json", "Flat token stream as indented JSON"),
    ("tokens-simple", "Token values joined back into the source text"),
];

/// Every available transform name with its description, documents first
pub fn available_transforms() -> Vec<(&'static str, &'static str)> {
    let registry = FormatRegistry::default();
    let mut transforms: Vec<_> = registry.descriptions().collect();
    transforms.extend_from_slice(TOKEN_TRANSFORMS);
    transforms
}

/// Settings a transform needs beyond its name
pub struct TransformSettings {
    pub options: BuildOptions,
    pub show_loc: bool,
}

/// Execute a named transform on loaded source text
pub fn execute_transform(
    loader: &DocumentLoader,
    rules: &RuleSet,
    transform_name: &str,
    settings: &TransformSettings,
) -> Result<String, String> {
    match transform_name {
        "tokens-json" => {
            let tokens = loader
                .tokenize(rules)
                .map_err(|e| format!("Transform failed: {e}"))?;
            tokens_to_json(&tokens, true).map_err(|e| format!("JSON serialization failed: {e}"))
        }
        "tokens-simple" => {
            let tokens = loader
                .tokenize(rules)
                .map_err(|e| format!("Transform failed: {e}"))?;
            Ok(detokenize(&tokens))
        }
        "treeviz" => {
            let doc = loader
                .build(rules, &settings.options)
                .map_err(|e| format!("Transform failed: {e}"))?;
            let params = HashMap::from([("show-loc".to_string(), settings.show_loc.to_string())]);
            Ok(to_treeviz_str_with_params(&doc, &params))
        }
        name => {
            let registry = FormatRegistry::default();
            if !registry.contains(name) {
                return Err(format!("Unknown transform: {name}"));
            }
            let doc = loader
                .build(rules, &settings.options)
                .map_err(|e| format!("Transform failed: {e}"))?;
            registry.render(&doc, name).map_err(|e| e.to_string())
        }
    }
}
