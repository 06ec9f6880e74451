//! Loading rule sets from JSON and YAML files

use ruletree::ruletree::loader::DocumentLoader;
use ruletree::ruletree::rules::files::RuleFileError;
use ruletree::ruletree::testing::assert_tree;
use ruletree::{BuildOptions, RuleSet};
use std::fs;
use tempfile::TempDir;

const YAML_RULES: &str = r#"
close:
  pattern: '\}\}'
open:
  pattern: '\{\{#(\w+)\}\}'
marker:
  pattern: '\{\{(\w+)\}\}'
"#;

const JSON_RULES: &str = r#"{
  "close": "}}",
  "open": { "source": "\\{\\{#(\\w+) ", "flags": "g" },
  "marker": ["{{.}}", "{{@index}}"]
}"#;

#[test]
fn test_yaml_rule_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.yaml");
    fs::write(&path, YAML_RULES).unwrap();

    let rules = RuleSet::from_path(&path).unwrap();
    assert_eq!(rules.names().collect::<Vec<_>>(), vec!["close", "open", "marker"]);

    let doc = DocumentLoader::from_string("{{#each}}{{name}}, {{/each}}")
        .build(&rules, &BuildOptions::default())
        .unwrap();
    assert_tree(&doc).child_count(1).child(0, |c| {
        c.assert_block()
            .open_params(&["each"])
            .child_count(2)
            .child(0, |m| {
                m.assert_marker("{{name}}");
            })
            .child(1, |t| {
                t.assert_text(", {{/each");
            });
    });
}

#[test]
fn test_json_rule_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(&path, JSON_RULES).unwrap();

    let rules = RuleSet::from_path(&path).unwrap();
    let doc = DocumentLoader::from_string("{{#if ok}}{{.}}")
        .build(&rules, &BuildOptions::default())
        .unwrap();
    assert_tree(&doc)
        .child_count(2)
        .child(0, |c| {
            c.assert_block()
                .open_params(&["if"])
                .no_close_params()
                .child_count(1)
                .child(0, |t| {
                    t.assert_text("ok");
                });
        })
        .child(1, |c| {
            let marker = c.assert_marker("{{.}}");
            assert_eq!(marker.first_param(), Some("{{.}}"));
        });
}

#[test]
fn test_missing_rule_file() {
    let dir = TempDir::new().unwrap();
    let err = RuleSet::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, RuleFileError::Io(_)));
}
