//! Front-end support for the pairwise engine: the run pipeline, summary
//! statistics, and row export.

pub mod demo;
pub mod export;
pub mod pipeline;
pub mod report;

pub use pipeline::{run_file, run_spec, ConfigOverrides, CoreError, Outcome};
pub use report::{summarize, Summary};
