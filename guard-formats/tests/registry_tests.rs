use std::fs;
use std::path::PathBuf;

use guard_core::ErrorKind;
use guard_formats::{FormatRegistry, RequestValidator};
use serde_json::json;
use tempfile::TempDir;

struct InstallFixture {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl InstallFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("ossec");
        for dir in ["etc/rules", "etc/decoders", "etc/lists", "ruleset/rules"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }
}

#[test]
fn test_upload_request_schema() {
    let fixture = InstallFixture::new();
    let registry = FormatRegistry::with_defaults(&fixture.root);
    let schema = json!({
        "type": "object",
        "required": ["filename"],
        "properties": {
            "filename": {"type": "string", "format": "xml_filename_path"},
            "relative_dirname": {"type": "string", "format": "get_dirnames_path"},
            "overwrite": {"type": "boolean"}
        }
    });
    let validator = RequestValidator::new(&registry, schema).unwrap();

    validator
        .validate(&json!({
            "filename": "local_rules.xml",
            "relative_dirname": "etc/rules",
            "overwrite": true
        }))
        .unwrap();

    let err = validator
        .validate(&json!({
            "filename": "local_rules.xml",
            "relative_dirname": "../../etc"
        }))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationRejected);
    assert_eq!(err.code(), 1000);
}

#[test]
fn test_custom_format_is_usable_from_schema() {
    let fixture = InstallFixture::new();
    let mut registry = FormatRegistry::with_defaults(&fixture.root);
    registry
        .register("agent_id", |value: &str| {
            value.len() >= 3 && value.chars().all(|c| c.is_ascii_digit())
        })
        .unwrap();

    let schema = json!({"properties": {"agent_id": {"type": "string", "format": "agent_id"}}});
    let validator = RequestValidator::new(&registry, schema).unwrap();
    assert!(validator.is_valid(&json!({"agent_id": "001"})));
    assert!(!validator.is_valid(&json!({"agent_id": "1"})));
}

#[test]
fn test_list_parameters_validate_each_item() {
    let fixture = InstallFixture::new();
    let registry = FormatRegistry::with_defaults(&fixture.root);
    let schema = json!({
        "properties": {
            "agents_list": {"type": "array", "items": {"type": "string", "format": "numbers"}},
            "hashes": {"type": "array", "items": {"type": "string", "format": "hash_or_empty"}}
        }
    });
    let validator = RequestValidator::new(&registry, schema).unwrap();

    assert!(validator.is_valid(&json!({"agents_list": ["001", "002"], "hashes": [""]})));
    let violations = validator.violations(&json!({"agents_list": ["001", "x"]}));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].pointer, "/agents_list/1");
}

#[test]
fn test_every_registered_format_rejects_traversal_text() {
    let fixture = InstallFixture::new();
    let registry = FormatRegistry::with_defaults(&fixture.root);
    let permissive = ["alphanumeric_symbols", "search", "sort", "alphanumeric"];

    for (name, check) in registry.iter() {
        if permissive.contains(&name) {
            continue;
        }
        assert!(!check("../../etc/shadow"), "format {} accepted traversal", name);
    }
}
