use crate::types::{Pattern, Spec};

/// Which rule list a pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Forbid,
    Require,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Forbid => write!(f, "forbid"),
            RuleKind::Require => write!(f, "require"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Spec declares no parameters")]
    NoParameters,

    #[error("Empty domain: parameter '{parameter}' has no values")]
    EmptyDomain { parameter: String },

    #[error("Empty pattern: {rule}[{index}] binds no parameters")]
    EmptyPattern { rule: RuleKind, index: usize },
}

/// Non-fatal findings. Patterns flagged here never match any row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecWarning {
    #[error("{rule}[{index}] references unknown parameter '{parameter}'")]
    UnknownParameter {
        rule: RuleKind,
        index: usize,
        parameter: String,
    },

    #[error("{rule}[{index}] references value '{value}' not in domain of '{parameter}'")]
    UnknownValue {
        rule: RuleKind,
        index: usize,
        parameter: String,
        value: String,
    },
}

pub fn validate_spec(spec: &Spec) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_domains(spec, &mut errors);
    validate_patterns(RuleKind::Forbid, &spec.forbid, &mut errors);
    validate_patterns(RuleKind::Require, &spec.require, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_domains(spec: &Spec, errors: &mut Vec<ValidationError>) {
    if spec.parameters.is_empty() {
        errors.push(ValidationError::NoParameters);
    }
    for param in &spec.parameters {
        if param.values.is_empty() {
            errors.push(ValidationError::EmptyDomain {
                parameter: param.name.clone(),
            });
        }
    }
}

fn validate_patterns(rule: RuleKind, patterns: &[Pattern], errors: &mut Vec<ValidationError>) {
    for (index, pattern) in patterns.iter().enumerate() {
        if pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern { rule, index });
        }
    }
}

/// Collect references to parameters or values the domains don't declare.
pub fn lint_spec(spec: &Spec) -> Vec<SpecWarning> {
    let mut warnings = Vec::new();
    let rules = [(RuleKind::Forbid, &spec.forbid), (RuleKind::Require, &spec.require)];
    for (rule, patterns) in rules {
        for (index, pattern) in patterns.iter().enumerate() {
            for (parameter, value) in pattern.iter() {
                match spec.parameters.get(parameter) {
                    None => warnings.push(SpecWarning::UnknownParameter {
                        rule,
                        index,
                        parameter: parameter.to_string(),
                    }),
                    Some(values) if !values.iter().any(|v| v == value) => {
                        warnings.push(SpecWarning::UnknownValue {
                            rule,
                            index,
                            parameter: parameter.to_string(),
                            value: value.to_string(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
    }
    warnings
}
