//! Pairwise coverage engine.
//!
//! Given parameter domains, forbid rules and require rules, [`generate`]
//! returns a small set of total assignments whose pairs cover every legal
//! value pair at least once.
//!
//! - [`constraint`]: forbid / require evaluation over rows
//! - [`pair`]: canonical pairs, pair universes, pairs present in a row
//! - [`encode`]: index-space representation the engine runs on
//! - [`cartesian`]: lazy cross-product enumeration
//! - [`generate`](mod@generate): greedy synthesis, exhaustive fallback, pruning

pub mod cartesian;
pub mod constraint;
pub mod encode;
pub mod generate;
pub mod pair;

pub use generate::{generate, Generation, GenerateError, GenerationStats, Generator};
pub use pair::{pair_universe, pairs_of, reachable_pair_universe, Pair};
