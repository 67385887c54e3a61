use std::io::Write;

use pairkit_ir::parse::{
    load_spec, parse_spec_json, parse_spec_yaml, spec_to_json, spec_to_yaml, ParseError,
};
use pairkit_ir::types::GenerationConfig;

#[test]
fn test_parse_yaml_fixture() {
    let spec = parse_spec_yaml(include_str!("fixtures/browser_matrix.yml")).unwrap();
    let names: Vec<_> = spec.parameters.names().collect();
    assert_eq!(names, vec!["Browser", "OS", "Auth", "Threads"]);
    assert_eq!(spec.forbid.len(), 2);
    assert_eq!(spec.require.len(), 1);
    assert_eq!(spec.forbid[0].get("Browser"), Some("Safari"));
    assert_eq!(spec.forbid[0].get("OS"), Some("Windows"));
}

#[test]
fn test_numeric_values_read_as_text() {
    let spec = parse_spec_yaml(include_str!("fixtures/browser_matrix.yml")).unwrap();
    assert_eq!(
        spec.parameters.get("Threads").unwrap(),
        ["1".to_string(), "2".to_string(), "4".to_string()]
    );
}

#[test]
fn test_generation_section_merges_with_defaults() {
    let spec = parse_spec_yaml(include_str!("fixtures/browser_matrix.yml")).unwrap();
    assert_eq!(spec.generation.min_attempts, 50);
    assert_eq!(
        spec.generation.attempts_per_target,
        GenerationConfig::default().attempts_per_target
    );
}

#[test]
fn test_parse_json_fixture_without_require() {
    let spec = parse_spec_json(include_str!("fixtures/browser_matrix.json")).unwrap();
    assert_eq!(spec.parameters.len(), 2);
    assert_eq!(spec.forbid.len(), 1);
    assert!(spec.require.is_empty());
    assert_eq!(spec.generation, GenerationConfig::default());
}

#[test]
fn test_parse_invalid_yaml() {
    let result = parse_spec_yaml("parameters: [not, a, map]");
    assert!(matches!(result, Err(ParseError::Yaml(_))));
}

#[test]
fn test_duplicate_value_rejected() {
    let result = parse_spec_yaml("parameters:\n  OS: [Linux, Linux]\n");
    let err = result.unwrap_err().to_string();
    assert!(err.contains("duplicate value 'Linux'"), "got: {err}");
}

#[test]
fn test_duplicate_parameter_rejected() {
    let json = r#"{ "parameters": { "OS": ["Linux"], "OS": ["Windows"] } }"#;
    let err = parse_spec_json(json).unwrap_err().to_string();
    assert!(err.contains("duplicate parameter 'OS'"), "got: {err}");
}

#[test]
fn test_yaml_round_trip_preserves_order() {
    let spec = parse_spec_yaml(include_str!("fixtures/browser_matrix.yml")).unwrap();
    let text = spec_to_yaml(&spec).unwrap();
    let again = parse_spec_yaml(&text).unwrap();
    assert_eq!(spec, again);
    let browser = text.find("Browser").unwrap();
    let threads = text.find("Threads").unwrap();
    assert!(browser < threads);
}

#[test]
fn test_json_export_keeps_declaration_order() {
    let spec = parse_spec_yaml("parameters:\n  Zeta: [a]\n  Alpha: [b]\n").unwrap();
    let json = spec_to_json(&spec).unwrap();
    assert!(json.find("Zeta").unwrap() < json.find("Alpha").unwrap());
}

#[test]
fn test_load_spec_picks_format_from_extension() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(include_str!("fixtures/browser_matrix.json").as_bytes())
        .unwrap();
    let spec = load_spec(file.path()).unwrap();
    assert_eq!(spec.parameters.len(), 2);
}

#[test]
fn test_load_missing_file() {
    let result = load_spec("/definitely/not/here.yml");
    assert!(matches!(result, Err(ParseError::Io { .. })));
}
