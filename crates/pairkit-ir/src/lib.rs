//! Pairwise specification model.
//!
//! A [`Spec`](types::Spec) names parameters with ordered value domains,
//! plus `forbid` and `require` patterns. Specs load from YAML or JSON:
//!
//! ```yaml
//! parameters:
//!   Browser: [Chrome, Firefox, Safari]
//!   OS: [Windows, macOS, Linux]
//! forbid:
//!   - { Browser: Safari, OS: Windows }
//! ```

pub mod parse;
pub mod types;
pub mod validate;

pub use types::{Domains, GenerationConfig, Parameter, Pattern, Row, Spec};
