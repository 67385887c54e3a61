use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Top-level pairwise specification: parameter domains plus rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    pub parameters: Domains,
    #[serde(default)]
    pub forbid: Vec<Pattern>,
    #[serde(default)]
    pub require: Vec<Pattern>,
    #[serde(default)]
    pub generation: GenerationConfig,
}

// ── Domains ──────────────────────────────────────────────────────────

/// One named parameter and its ordered values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub values: Vec<String>,
}

/// Ordered parameter domains.
///
/// Declaration order is significant: the first value of each domain seeds
/// row synthesis, and output columns follow the parameter order. Names are
/// unique and values within a domain are distinct by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Domains {
    params: Vec<Parameter>,
}

impl Domains {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Domains::insert).
    pub fn with<N, I, V>(mut self, name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert(name, values);
        self
    }

    /// Inserts a parameter, replacing the values of an existing parameter
    /// with the same name in place. Repeated values keep their first
    /// occurrence.
    pub fn insert<N, I, V>(&mut self, name: N, values: I)
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let mut distinct: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }

        match self.params.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.values = distinct,
            None => self.params.push(Parameter {
                name,
                values: distinct,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.values.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Size of the full cross-product, saturating at `u128::MAX`.
    /// An empty parameter set has one (empty) combination.
    pub fn total_combinations(&self) -> u128 {
        self.params
            .iter()
            .fold(1u128, |acc, p| acc.saturating_mul(p.values.len() as u128))
    }
}

impl<'a> IntoIterator for &'a Domains {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl Serialize for Domains {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for param in &self.params {
            map.serialize_entry(&param.name, &param.values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Domains {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DomainsVisitor;

        impl<'de> Visitor<'de> for DomainsVisitor {
            type Value = Domains;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of parameter name to a list of values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Domains, A::Error> {
                let mut domains = Domains::new();
                while let Some(name) = access.next_key::<Scalar>()? {
                    let Scalar(name) = name;
                    if domains.contains(&name) {
                        return Err(de::Error::custom(format!("duplicate parameter '{name}'")));
                    }
                    let values: ScalarList = access.next_value()?;
                    for (i, value) in values.0.iter().enumerate() {
                        if values.0[..i].contains(value) {
                            return Err(de::Error::custom(format!(
                                "duplicate value '{value}' in parameter '{name}'"
                            )));
                        }
                    }
                    domains.params.push(Parameter {
                        name,
                        values: values.0,
                    });
                }
                Ok(domains)
            }
        }

        deserializer.deserialize_map(DomainsVisitor)
    }
}

// ── Patterns and rows ────────────────────────────────────────────────

/// A partial assignment used as a forbid or require rule.
///
/// Keys have set semantics: a repeated key keeps its first binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pattern {
    bindings: Vec<(String, String)>,
}

impl Pattern {
    pub fn new<I, K, V>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut out: Vec<(String, String)> = Vec::new();
        for (k, v) in bindings {
            let k = k.into();
            if !out.iter().any(|(existing, _)| *existing == k) {
                out.push((k, v.into()));
            }
        }
        Self { bindings: out }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_bindings(&self.bindings, serializer)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bindings = deserializer.deserialize_map(BindingsVisitor { what: "pattern" })?;
        Ok(Self { bindings })
    }
}

/// A total assignment: one value for every parameter, in domain order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Row {
    bindings: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Binds `name` to `value`, overwriting an existing binding in place
    /// or appending a new one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.bindings.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.bindings.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_bindings(&self.bindings, serializer)
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bindings = deserializer.deserialize_map(BindingsVisitor { what: "row" })?;
        Ok(Self { bindings })
    }
}

fn serialize_bindings<S: Serializer>(
    bindings: &[(String, String)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(bindings.len()))?;
    for (k, v) in bindings {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

struct BindingsVisitor {
    what: &'static str,
}

impl<'de> Visitor<'de> for BindingsVisitor {
    type Value = Vec<(String, String)>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a {} mapping parameter names to values", self.what)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut bindings: Vec<(String, String)> = Vec::new();
        while let Some((Scalar(k), Scalar(v))) = access.next_entry::<Scalar, Scalar>()? {
            if bindings.iter().any(|(existing, _)| *existing == k) {
                return Err(de::Error::custom(format!(
                    "duplicate parameter '{k}' in {}",
                    self.what
                )));
            }
            bindings.push((k, v));
        }
        Ok(bindings)
    }
}

// ── Scalar values ────────────────────────────────────────────────────

/// A string, number or bool from the source document, kept as text.
///
/// Spec files routinely write `Threads: [1, 2, 4]` or `Cache: [true, false]`.
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
                Ok(Scalar(v))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct ScalarList(Vec<String>);

impl<'de> Deserialize<'de> for ScalarList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ListVisitor;

        impl<'de> Visitor<'de> for ListVisitor {
            type Value = ScalarList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list of values")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ScalarList, A::Error> {
                let mut values = Vec::new();
                while let Some(Scalar(v)) = seq.next_element::<Scalar>()? {
                    values.push(v);
                }
                Ok(ScalarList(values))
            }
        }

        deserializer.deserialize_seq(ListVisitor)
    }
}

// ── Generation settings ──────────────────────────────────────────────

/// Engine budgets, read from the optional `generation` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Lower bound on greedy attempts.
    pub min_attempts: usize,
    /// Greedy attempts granted per target pair.
    pub attempts_per_target: usize,
    /// Largest cross-product the exhaustive fallback may walk.
    /// `None` lifts the cap.
    ///
    /// The bound is on the full cross-product, not on the rows actually
    /// visited. Without forbids the greedy phase can stall with pairs left
    /// over on inputs as small as 8 parameters × 6 values, and those
    /// inputs are then refused under the default. Set `null` in the
    /// `generation` section to walk them anyway.
    pub max_exhaustive_combinations: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_attempts: 100,
            attempts_per_target: 5,
            max_exhaustive_combinations: Some(1_000_000),
        }
    }
}

impl GenerationConfig {
    /// Greedy attempt budget for a target of `target_pairs` pairs.
    pub fn max_attempts(&self, target_pairs: usize) -> usize {
        self.min_attempts
            .max(self.attempts_per_target.saturating_mul(target_pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut d = Domains::new().with("A", ["1", "2"]).with("B", ["x"]);
        d.insert("A", ["3"]);
        let names: Vec<_> = d.names().collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(d.get("A").unwrap(), ["3".to_string()]);
    }

    #[test]
    fn test_insert_drops_repeated_values() {
        let d = Domains::new().with("A", ["1", "2", "1"]);
        assert_eq!(d.get("A").unwrap().len(), 2);
    }

    #[test]
    fn test_total_combinations() {
        let d = Domains::new()
            .with("A", ["1", "2", "3"])
            .with("B", ["x", "y"])
            .with("C", ["on"]);
        assert_eq!(d.total_combinations(), 6);
        assert_eq!(Domains::new().total_combinations(), 1);
    }

    #[test]
    fn test_pattern_keeps_first_binding() {
        let p = Pattern::new([("OS", "Linux"), ("OS", "Windows")]);
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("OS"), Some("Linux"));
    }

    #[test]
    fn test_row_set_overwrites() {
        let mut row: Row = [("A", "1"), ("B", "2")].into_iter().collect();
        row.set("A", "9");
        let pairs: Vec<_> = row.iter().collect();
        assert_eq!(pairs, vec![("A", "9"), ("B", "2")]);
    }

    #[test]
    fn test_exhaustive_cap_default_and_lift() {
        assert_eq!(
            GenerationConfig::default().max_exhaustive_combinations,
            Some(1_000_000)
        );
        let lifted: GenerationConfig =
            serde_json::from_str(r#"{"max_exhaustive_combinations": null}"#).unwrap();
        assert_eq!(lifted.max_exhaustive_combinations, None);
        assert_eq!(lifted.min_attempts, 100);
    }

    #[test]
    fn test_max_attempts() {
        let cfg = GenerationConfig::default();
        assert_eq!(cfg.max_attempts(3), 100);
        assert_eq!(cfg.max_attempts(40), 200);
    }
}
