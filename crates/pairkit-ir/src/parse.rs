use std::path::Path;

use crate::types::Spec;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source format of a spec file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Yaml,
    Json,
}

impl SpecFormat {
    /// `.json` selects JSON; every other extension is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SpecFormat::Json,
            _ => SpecFormat::Yaml,
        }
    }
}

pub fn parse_spec_yaml(text: &str) -> Result<Spec, ParseError> {
    Ok(serde_yaml::from_str(text)?)
}

pub fn parse_spec_json(text: &str) -> Result<Spec, ParseError> {
    Ok(serde_json::from_str(text)?)
}

pub fn parse_spec(text: &str, format: SpecFormat) -> Result<Spec, ParseError> {
    match format {
        SpecFormat::Yaml => parse_spec_yaml(text),
        SpecFormat::Json => parse_spec_json(text),
    }
}

/// Read and parse a spec file, picking the format from its extension.
pub fn load_spec(path: impl AsRef<Path>) -> Result<Spec, ParseError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_spec(&text, SpecFormat::from_path(path))
}

pub fn spec_to_yaml(spec: &Spec) -> Result<String, ParseError> {
    Ok(serde_yaml::to_string(spec)?)
}

pub fn spec_to_json(spec: &Spec) -> Result<String, ParseError> {
    Ok(serde_json::to_string_pretty(spec)?)
}
