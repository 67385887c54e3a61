//! Load → validate → generate → summarize.

use std::path::Path;

use pairkit_engine::{GenerateError, GenerationStats, Generator};
use pairkit_ir::parse::{load_spec, ParseError};
use pairkit_ir::types::{GenerationConfig, Row, Spec};
use pairkit_ir::validate::{lint_spec, validate_spec, SpecWarning, ValidationError};

use crate::export::{write_rows, ExportError, OutputFormat};
use crate::report::{summarize, Summary};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("spec parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid spec: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("generation error: {0}")]
    Generate(#[from] GenerateError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Settings that take precedence over a spec's `generation` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub min_attempts: Option<usize>,
    pub attempts_per_target: Option<usize>,
    /// `Some(None)` lifts the exhaustive cap.
    pub max_exhaustive_combinations: Option<Option<u64>>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut GenerationConfig) {
        if let Some(n) = self.min_attempts {
            config.min_attempts = n;
        }
        if let Some(n) = self.attempts_per_target {
            config.attempts_per_target = n;
        }
        if let Some(limit) = self.max_exhaustive_combinations {
            config.max_exhaustive_combinations = limit;
        }
    }
}

/// Everything a front end needs to display or save a run.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub spec: Spec,
    pub rows: Vec<Row>,
    pub stats: GenerationStats,
    pub summary: Summary,
    pub warnings: Vec<SpecWarning>,
}

impl Outcome {
    /// Save the rows in the format `path`'s extension selects.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<OutputFormat, CoreError> {
        Ok(write_rows(path, &self.spec.parameters, &self.rows)?)
    }
}

/// Validate and generate for an in-memory spec.
pub fn run_spec(mut spec: Spec, overrides: &ConfigOverrides) -> Result<Outcome, CoreError> {
    validate_spec(&spec).map_err(CoreError::Invalid)?;

    let warnings = lint_spec(&spec);
    for warning in &warnings {
        tracing::warn!("{warning}; the pattern never matches");
    }

    overrides.apply(&mut spec.generation);
    let generation = Generator::from_spec(&spec).run()?;
    let summary = summarize(&spec, &generation.rows);
    tracing::debug!(?summary, "run summarized");

    Ok(Outcome {
        spec,
        rows: generation.rows,
        stats: generation.stats,
        summary,
        warnings,
    })
}

/// [`run_spec`] on a spec file.
pub fn run_file(path: impl AsRef<Path>, overrides: &ConfigOverrides) -> Result<Outcome, CoreError> {
    let path = path.as_ref();
    let spec = load_spec(path)?;
    tracing::info!(path = %path.display(), parameters = spec.parameters.len(), "spec loaded");
    run_spec(spec, overrides)
}
