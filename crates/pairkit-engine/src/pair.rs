//! Pair model: canonical value pairs across two distinct parameters.

use std::collections::BTreeSet;
use std::fmt;

use pairkit_ir::types::{Domains, Pattern, Row};
use serde::{Deserialize, Serialize};

/// An unordered pair of bindings from two distinct parameters.
///
/// Stored canonically with `name_a < name_b` (ordinal string order), so
/// `(B=1, A=2)` and `(A=2, B=1)` are the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pair {
    pub name_a: String,
    pub value_a: String,
    pub name_b: String,
    pub value_b: String,
}

impl Pair {
    pub fn new(first: (&str, &str), second: (&str, &str)) -> Self {
        let (a, b) = if first.0 <= second.0 {
            (first, second)
        } else {
            (second, first)
        };
        Self {
            name_a: a.0.to_string(),
            value_a: a.1.to_string(),
            name_b: b.0.to_string(),
            value_b: b.1.to_string(),
        }
    }

    fn value_of(&self, name: &str) -> Option<&str> {
        if name == self.name_a {
            Some(&self.value_a)
        } else if name == self.name_b {
            Some(&self.value_b)
        } else {
            None
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}={}, {}={})",
            self.name_a, self.value_a, self.name_b, self.value_b
        )
    }
}

/// Every pair derivable from two distinct parameters' domains.
pub fn pair_universe(domains: &Domains) -> BTreeSet<Pair> {
    let params: Vec<_> = domains.iter().collect();
    let mut pairs = BTreeSet::new();

    for i in 0..params.len() {
        for j in (i + 1)..params.len() {
            let (p, q) = (params[i], params[j]);
            for v in &p.values {
                for w in &q.values {
                    pairs.insert(Pair::new(
                        (p.name.as_str(), v.as_str()),
                        (q.name.as_str(), w.as_str()),
                    ));
                }
            }
        }
    }

    pairs
}

/// The C(k, 2) pairs present in one assignment.
pub fn pairs_of(row: &Row) -> BTreeSet<Pair> {
    let bindings: Vec<_> = row.iter().collect();
    let mut pairs = BTreeSet::new();

    for i in 0..bindings.len() {
        for j in (i + 1)..bindings.len() {
            pairs.insert(Pair::new(bindings[i], bindings[j]));
        }
    }

    pairs
}

/// Whether some forbid pattern lies entirely within the pair's two
/// parameters and agrees with its values. Such a pair can't occur in any
/// legal row.
pub fn pair_is_forbidden(pair: &Pair, forbid: &[Pattern]) -> bool {
    forbid
        .iter()
        .any(|p| p.iter().all(|(k, v)| pair.value_of(k) == Some(v)))
}

/// [`pair_universe`] minus the pairs some forbid pattern rules out
/// unconditionally.
pub fn reachable_pair_universe(domains: &Domains, forbid: &[Pattern]) -> BTreeSet<Pair> {
    let mut pairs = pair_universe(domains);
    pairs.retain(|p| !pair_is_forbidden(p, forbid));
    pairs
}

/// Union of [`pairs_of`] over a row list.
pub fn covered_pairs<'a>(rows: impl IntoIterator<Item = &'a Row>) -> BTreeSet<Pair> {
    rows.into_iter().flat_map(pairs_of).collect()
}
