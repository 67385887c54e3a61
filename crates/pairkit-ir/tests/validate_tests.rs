use pairkit_ir::parse::parse_spec_yaml;
use pairkit_ir::types::{Domains, Pattern, Spec};
use pairkit_ir::validate::{lint_spec, validate_spec, RuleKind, SpecWarning, ValidationError};

#[test]
fn test_valid_fixture_passes() {
    let spec = parse_spec_yaml(include_str!("fixtures/browser_matrix.yml")).unwrap();
    assert!(validate_spec(&spec).is_ok());
    assert!(lint_spec(&spec).is_empty());
}

#[test]
fn test_no_parameters() {
    let errors = validate_spec(&Spec::default()).unwrap_err();
    assert_eq!(errors, vec![ValidationError::NoParameters]);
}

#[test]
fn test_collects_all_errors() {
    let spec = Spec {
        parameters: Domains::new()
            .with("A", Vec::<String>::new())
            .with("B", ["x"]),
        forbid: vec![Pattern::default()],
        require: vec![Pattern::new([("B", "x")]), Pattern::default()],
        ..Default::default()
    };
    let errors = validate_spec(&spec).unwrap_err();
    assert_eq!(
        errors,
        vec![
            ValidationError::EmptyDomain {
                parameter: "A".into()
            },
            ValidationError::EmptyPattern {
                rule: RuleKind::Forbid,
                index: 0
            },
            ValidationError::EmptyPattern {
                rule: RuleKind::Require,
                index: 1
            },
        ]
    );
}

#[test]
fn test_lint_unknown_references() {
    let spec = Spec {
        parameters: Domains::new().with("OS", ["Linux", "Windows"]),
        forbid: vec![Pattern::new([("Browser", "Safari")])],
        require: vec![Pattern::new([("OS", "BeOS")])],
        ..Default::default()
    };
    let warnings = lint_spec(&spec);
    assert_eq!(warnings.len(), 2);
    assert_eq!(
        warnings[0],
        SpecWarning::UnknownParameter {
            rule: RuleKind::Forbid,
            index: 0,
            parameter: "Browser".into()
        }
    );
    assert_eq!(
        warnings[0].to_string(),
        "forbid[0] references unknown parameter 'Browser'"
    );
    assert_eq!(
        warnings[1].to_string(),
        "require[0] references value 'BeOS' not in domain of 'OS'"
    );
    let source: &dyn std::error::Error = &warnings[1];
    assert!(source.source().is_none());
}
