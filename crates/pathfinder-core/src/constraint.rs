//! Query constraints and the edge filter they induce

use crate::error::{Error, Result};
use crate::graph::{Edge, EdgeKind};
use crate::limits::{validate_constraint_count, validate_key};
use crate::metadata::{parse_value, MetadataValue};
use crate::traversal::EdgeFilter;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// How a constraint value is compared against edge metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Edge value must be numeric and `>=` the constraint
    AtLeast,
    /// Edge value must be numeric and `<=` the constraint
    AtMost,
    /// Edge value must be a string equal to the constraint
    Equals,
}

impl Comparison {
    fn symbol(self) -> &'static str {
        match self {
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
            Self::Equals => "=",
        }
    }

    fn expects_number(self) -> bool {
        !matches!(self, Self::Equals)
    }
}

/// Declared comparison semantics for well-known metric names
///
/// Keys that are not declared fall back to the value's tag: numbers are
/// lower bounds, strings require equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSchema {
    declared: BTreeMap<String, Comparison>,
}

impl Default for ConstraintSchema {
    fn default() -> Self {
        Self::empty()
            .declare("bandwidth", Comparison::AtLeast)
            .declare("reliability", Comparison::AtLeast)
            .declare("priority", Comparison::AtLeast)
            .declare("delay", Comparison::AtMost)
            .declare("utilization", Comparison::AtMost)
            .declare("ownership", Comparison::Equals)
    }
}

impl ConstraintSchema {
    /// Schema with no declarations: every key is interpreted by value tag
    pub fn empty() -> Self {
        Self {
            declared: BTreeMap::new(),
        }
    }

    pub fn declare(mut self, key: impl Into<String>, comparison: Comparison) -> Self {
        self.declared.insert(key.into(), comparison);
        self
    }

    pub fn declared(&self, key: &str) -> Option<Comparison> {
        self.declared.get(key).copied()
    }

    /// Resolve the comparison for a key/value pair, rejecting tag mismatches
    pub fn resolve(&self, key: &str, value: &MetadataValue) -> Result<Comparison> {
        match self.declared(key) {
            Some(cmp) if cmp.expects_number() != value.is_number() => Err(Error::constraint(
                key,
                format!(
                    "expected a {} value, got {} '{}'",
                    if cmp.expects_number() { "numeric" } else { "string" },
                    value.kind(),
                    value
                ),
            )),
            Some(cmp) => Ok(cmp),
            None if value.is_number() => Ok(Comparison::AtLeast),
            None => Ok(Comparison::Equals),
        }
    }
}

/// A single named requirement on link metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub key: String,
    pub value: MetadataValue,
    pub comparison: Comparison,
}

impl Constraint {
    /// Whether an edge's value for this key satisfies the constraint
    pub fn satisfied_by(&self, actual: Option<&MetadataValue>) -> bool {
        match (self.comparison, &self.value, actual) {
            (Comparison::AtLeast, MetadataValue::Number(bound), Some(MetadataValue::Number(v))) => {
                v >= bound
            }
            (Comparison::AtMost, MetadataValue::Number(bound), Some(MetadataValue::Number(v))) => {
                v <= bound
            }
            (Comparison::Equals, MetadataValue::Text(want), Some(MetadataValue::Text(v))) => {
                v == want
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.key, self.comparison.symbol(), self.value)
    }
}

/// Ordered set of constraints for one query
///
/// Order is the order the caller supplied; relaxation precedence is defined
/// relative to it. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw key/value pairs against a schema
    pub fn build<I, K, V>(pairs: I, schema: &ConstraintSchema) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MetadataValue>,
    {
        let mut constraints: Vec<Constraint> = Vec::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();

            validate_key(&key).map_err(|e| Error::constraint(&key, e.to_string()))?;
            if let MetadataValue::Number(n) = value {
                if !n.is_finite() {
                    return Err(Error::constraint(&key, format!("{} is not a finite number", n)));
                }
            }
            if constraints.iter().any(|c| c.key == key) {
                return Err(Error::constraint(&key, "supplied more than once"));
            }

            let comparison = schema.resolve(&key, &value)?;
            constraints.push(Constraint {
                key,
                value,
                comparison,
            });
        }
        validate_constraint_count(constraints.len())?;
        Ok(Self { constraints })
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> + '_ {
        self.constraints.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.constraints.iter().map(|c| c.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.key == key)
    }

    /// Copy of this set with the constraints at `dropped` positions removed
    pub fn without(&self, dropped: &[usize]) -> Self {
        Self {
            constraints: self
                .constraints
                .iter()
                .enumerate()
                .filter(|(i, _)| !dropped.contains(i))
                .map(|(_, c)| c.clone())
                .collect(),
        }
    }

    /// Whether an edge survives every constraint (logical AND)
    pub fn admits_edge(&self, edge: &Edge) -> bool {
        edge.kind == EdgeKind::Attachment
            || self.constraints.iter().all(|c| c.satisfied_by(edge.get(&c.key)))
    }
}

impl EdgeFilter for ConstraintSet {
    fn admits(&self, edge: &Edge) -> bool {
        self.admits_edge(edge)
    }
}

impl std::fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.constraints.is_empty() {
            return write!(f, "(unconstrained)");
        }
        let parts: Vec<String> = self.constraints.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl Serialize for ConstraintSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.constraints.len()))?;
        for c in &self.constraints {
            map.serialize_entry(&c.key, &c.value)?;
        }
        map.end()
    }
}

/// Parse a `key=value` argument. Numeric values become lower bounds.
pub fn parse_constraint_arg(arg: &str) -> Result<(String, MetadataValue)> {
    let Some((key, value)) = arg.split_once('=') else {
        return Err(Error::constraint(arg, "expected key=value"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::constraint(arg, "missing key"));
    }
    Ok((key.to_string(), parse_value(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    fn link_edge(pairs: &[(&str, MetadataValue)]) -> Edge {
        let metadata: Metadata = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Edge {
            a: 0,
            b: 1,
            kind: EdgeKind::Link,
            metadata,
        }
    }

    #[test]
    fn test_numeric_lower_bound() {
        let set = ConstraintSet::build([("bandwidth", 50.0)], &ConstraintSchema::default()).unwrap();
        assert!(set.admits_edge(&link_edge(&[("bandwidth", 50.0.into())])));
        assert!(set.admits_edge(&link_edge(&[("bandwidth", 51.0.into())])));
        assert!(!set.admits_edge(&link_edge(&[("bandwidth", 49.0.into())])));
        assert!(!set.admits_edge(&link_edge(&[])));
        assert!(!set.admits_edge(&link_edge(&[("bandwidth", "fast".into())])));
    }

    #[test]
    fn test_categorical_equality() {
        let set = ConstraintSet::build([("ownership", "blue")], &ConstraintSchema::default()).unwrap();
        assert!(set.admits_edge(&link_edge(&[("ownership", "blue".into())])));
        assert!(!set.admits_edge(&link_edge(&[("ownership", "red".into())])));
        assert!(!set.admits_edge(&link_edge(&[("ownership", "Blue".into())])));
        assert!(!set.admits_edge(&link_edge(&[])));
    }

    #[test]
    fn test_declared_upper_bound() {
        let set = ConstraintSet::build([("delay", 10.0)], &ConstraintSchema::default()).unwrap();
        assert!(set.admits_edge(&link_edge(&[("delay", 5.0.into())])));
        assert!(!set.admits_edge(&link_edge(&[("delay", 15.0.into())])));
    }

    #[test]
    fn test_all_constraints_must_hold() {
        let set = ConstraintSet::build(
            vec![
                ("bandwidth", MetadataValue::from(50.0)),
                ("ownership", MetadataValue::from("blue")),
            ],
            &ConstraintSchema::default(),
        )
        .unwrap();
        assert!(set.admits_edge(&link_edge(&[
            ("bandwidth", 51.0.into()),
            ("ownership", "blue".into())
        ])));
        assert!(!set.admits_edge(&link_edge(&[
            ("bandwidth", 49.0.into()),
            ("ownership", "blue".into())
        ])));
    }

    #[test]
    fn test_attachments_always_admitted() {
        let set = ConstraintSet::build([("ownership", "nonexistent-color")], &ConstraintSchema::default())
            .unwrap();
        let attachment = Edge {
            a: 0,
            b: 1,
            kind: EdgeKind::Attachment,
            metadata: Metadata::new(),
        };
        assert!(set.admits_edge(&attachment));
    }

    #[test]
    fn test_empty_set_admits_everything() {
        let set = ConstraintSet::new();
        assert!(set.admits_edge(&link_edge(&[])));
        assert_eq!(set.to_string(), "(unconstrained)");
    }

    #[test]
    fn test_unknown_keys_filtered_literally() {
        let set = ConstraintSet::build([("jitter", 3.0)], &ConstraintSchema::default()).unwrap();
        assert_eq!(set.get("jitter").unwrap().comparison, Comparison::AtLeast);
        assert!(!set.admits_edge(&link_edge(&[("bandwidth", 100.0.into())])));
    }

    #[test]
    fn test_schema_rejects_tag_mismatch() {
        let schema = ConstraintSchema::default();
        let err = ConstraintSet::build([("bandwidth", "lots")], &schema).unwrap_err();
        assert!(matches!(err, Error::InvalidConstraint { ref key, .. } if key == "bandwidth"));

        let err = ConstraintSet::build([("ownership", 3.0)], &schema).unwrap_err();
        assert!(matches!(err, Error::InvalidConstraint { ref key, .. } if key == "ownership"));
    }

    #[test]
    fn test_rejects_malformed_values() {
        let schema = ConstraintSchema::empty();
        assert!(ConstraintSet::build([("bandwidth", f64::NAN)], &schema).is_err());
        assert!(ConstraintSet::build([("", 1.0)], &schema).is_err());
        assert!(ConstraintSet::build([("a", 1.0), ("a", 2.0)], &schema).is_err());

        let too_many: Vec<(String, f64)> = (0..20).map(|i| (format!("k{}", i), 1.0)).collect();
        assert!(matches!(
            ConstraintSet::build(too_many, &schema),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_without_preserves_order() {
        let set = ConstraintSet::build(
            vec![("a", 1.0), ("b", 2.0), ("c", 3.0)],
            &ConstraintSchema::empty(),
        )
        .unwrap();
        let trimmed = set.without(&[1]);
        let keys: Vec<&str> = trimmed.keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_parse_constraint_arg() {
        assert_eq!(
            parse_constraint_arg("bandwidth=50").unwrap(),
            ("bandwidth".to_string(), MetadataValue::Number(50.0))
        );
        assert_eq!(
            parse_constraint_arg("ownership=blue").unwrap(),
            ("ownership".to_string(), MetadataValue::Text("blue".into()))
        );
        assert!(parse_constraint_arg("bandwidth").is_err());
        assert!(parse_constraint_arg("=5").is_err());
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let set = ConstraintSet::build(
            vec![
                ("ownership", MetadataValue::from("blue")),
                ("bandwidth", MetadataValue::from(50.0)),
            ],
            &ConstraintSchema::default(),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            r#"{"ownership":"blue","bandwidth":50.0}"#
        );
    }
}
