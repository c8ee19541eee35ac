//! Translation mappings: the per-language key → value catalog.
//!
//! A mapping is parsed once from JSON and never mutated afterwards; the store
//! shares it behind an `Arc`.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors raised while turning raw content into a mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("top-level value must be an object, found {0}")]
    NotAnObject(&'static str),

    #[error("list at '{path}' contains a non-scalar element")]
    NestedListElement { path: String },
}

/// A single catalog value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TranslationValue {
    Text(String),
    List(Vec<String>),
    Nested(TranslationMapping),
    /// Numbers, booleans and null, kept in their string representation.
    Scalar(String),
}

impl TranslationValue {
    /// Short name of the value's shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            TranslationValue::Text(_) => "text",
            TranslationValue::List(_) => "list",
            TranslationValue::Nested(_) => "mapping",
            TranslationValue::Scalar(_) => "scalar",
        }
    }
}

impl From<&str> for TranslationValue {
    fn from(value: &str) -> Self {
        TranslationValue::Text(value.to_string())
    }
}

impl From<String> for TranslationValue {
    fn from(value: String) -> Self {
        TranslationValue::Text(value)
    }
}

impl From<Vec<&str>> for TranslationValue {
    fn from(items: Vec<&str>) -> Self {
        TranslationValue::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<TranslationMapping> for TranslationValue {
    fn from(mapping: TranslationMapping) -> Self {
        TranslationValue::Nested(mapping)
    }
}

/// Key → value dictionary for one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TranslationMapping {
    entries: HashMap<String, TranslationValue>,
}

impl TranslationMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a mapping from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, MappingError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_json_value(value)
    }

    /// Convert an already-parsed JSON document into a mapping.
    pub fn from_json_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Object(object) => object_to_mapping(object, ""),
            other => Err(MappingError::NotAnObject(json_kind(&other))),
        }
    }

    /// Builder-style insert, mostly for tests and embedded catalogs.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<TranslationValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TranslationValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a dotted key.
    ///
    /// The key is first walked segment by segment through nested mappings. If
    /// that misses, the whole key is tried as a literal top-level entry, since
    /// catalogs also store flat keys such as `"contactForm.email"`.
    pub fn lookup(&self, key: &str) -> Option<&TranslationValue> {
        self.walk(key).or_else(|| self.entries.get(key))
    }

    fn walk(&self, key: &str) -> Option<&TranslationValue> {
        let mut segments = key.split('.');
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            match current {
                TranslationValue::Nested(inner) => current = inner.entries.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// All leaf values keyed by their full dotted path, in sorted order.
    ///
    /// A flat key and a nested path can spell the same dotted path. The value
    /// kept is the one [`lookup`](Self::lookup) resolves, so the nested entry
    /// wins and a flat key shadowed by a nested mapping is dropped.
    pub fn flatten(&self) -> BTreeMap<String, &TranslationValue> {
        let mut leaves = BTreeMap::new();
        self.collect_leaves("", &mut leaves);
        leaves
            .into_iter()
            .filter_map(|(path, leaf)| match self.lookup(&path) {
                Some(TranslationValue::Nested(_)) => None,
                Some(resolved) => Some((path, resolved)),
                None => Some((path, leaf)),
            })
            .collect()
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, leaves: &mut BTreeMap<String, &'a TranslationValue>) {
        for (key, value) in &self.entries {
            let path = join_path(prefix, key);
            match value {
                TranslationValue::Nested(inner) => inner.collect_leaves(&path, leaves),
                leaf => {
                    leaves.insert(path, leaf);
                }
            }
        }
    }
}

fn object_to_mapping(
    object: serde_json::Map<String, Value>,
    prefix: &str,
) -> Result<TranslationMapping, MappingError> {
    let mut mapping = TranslationMapping::new();
    for (key, value) in object {
        let path = join_path(prefix, &key);
        let converted = match value {
            Value::String(text) => TranslationValue::Text(text),
            Value::Array(items) => TranslationValue::List(list_items(items, &path)?),
            Value::Object(inner) => TranslationValue::Nested(object_to_mapping(inner, &path)?),
            scalar => TranslationValue::Scalar(scalar.to_string()),
        };
        mapping.entries.insert(key, converted);
    }
    Ok(mapping)
}

fn list_items(items: Vec<Value>, path: &str) -> Result<Vec<String>, MappingError> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => Ok(text),
            Value::Array(_) | Value::Object(_) => Err(MappingError::NestedListElement {
                path: path.to_string(),
            }),
            scalar => Ok(scalar.to_string()),
        })
        .collect()
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TranslationMapping {
        TranslationMapping::from_json_str(
            r#"{
                "navHome": "Home",
                "day1Topics": ["Intro", "Basics"],
                "footer": { "links": { "privacy": "Privacy Policy" } },
                "contactForm.email": "Email",
                "price": 399,
                "published": true
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_value_kinds() {
        let mapping = sample();
        assert_eq!(mapping.lookup("navHome"), Some(&TranslationValue::from("Home")));
        assert_eq!(
            mapping.lookup("day1Topics"),
            Some(&TranslationValue::from(vec!["Intro", "Basics"]))
        );
        assert_eq!(
            mapping.lookup("price"),
            Some(&TranslationValue::Scalar("399".to_string()))
        );
        assert_eq!(
            mapping.lookup("published"),
            Some(&TranslationValue::Scalar("true".to_string()))
        );
    }

    #[test]
    fn test_nested_walk() {
        let mapping = sample();
        assert_eq!(
            mapping.lookup("footer.links.privacy"),
            Some(&TranslationValue::from("Privacy Policy"))
        );
        assert!(mapping.lookup("footer.links.terms").is_none());
    }

    #[test]
    fn test_walk_stops_at_leaf() {
        // "navHome" is text, so it cannot be descended into.
        assert!(sample().lookup("navHome.extra").is_none());
    }

    #[test]
    fn test_flat_dotted_key() {
        assert_eq!(
            sample().lookup("contactForm.email"),
            Some(&TranslationValue::from("Email"))
        );
    }

    #[test]
    fn test_nested_wins_over_flat() {
        let mapping = TranslationMapping::new()
            .with("a.b", "flat")
            .with("a", TranslationMapping::new().with("b", "nested"));
        assert_eq!(mapping.lookup("a.b"), Some(&TranslationValue::from("nested")));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        assert!(sample().lookup("navhome").is_none());
    }

    #[test]
    fn test_empty_key_misses() {
        assert!(sample().lookup("").is_none());
    }

    #[test]
    fn test_top_level_must_be_object() {
        let err = TranslationMapping::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, MappingError::NotAnObject("array")));
    }

    #[test]
    fn test_malformed_json() {
        let err = TranslationMapping::from_json_str("{ \"a\": ").unwrap_err();
        assert!(matches!(err, MappingError::Json(_)));
    }

    #[test]
    fn test_list_rejects_nested_elements() {
        let err = TranslationMapping::from_json_str(r#"{ "x": { "y": [["a"]] } }"#).unwrap_err();
        match err {
            MappingError::NestedListElement { path } => assert_eq!(path, "x.y"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_flatten_uses_full_paths() {
        let sample = sample();
        let leaves = sample.flatten();
        assert!(leaves.contains_key("footer.links.privacy"));
        assert!(leaves.contains_key("contactForm.email"));
        assert!(!leaves.contains_key("footer"));
        assert_eq!(leaves.len(), 6);
    }

    #[test]
    fn test_flatten_prefers_nested_over_flat() {
        let mapping = TranslationMapping::new()
            .with("footer.copyright", "flat")
            .with(
                "footer",
                TranslationMapping::new().with("copyright", "nested"),
            );

        let leaves = mapping.flatten();

        assert_eq!(leaves.len(), 1);
        assert_eq!(
            leaves.get("footer.copyright"),
            Some(&&TranslationValue::Text("nested".to_string()))
        );
    }

    #[test]
    fn test_flatten_drops_flat_key_shadowed_by_mapping() {
        let mapping = TranslationMapping::new()
            .with("footer.links", "flat")
            .with(
                "footer",
                TranslationMapping::new()
                    .with("links", TranslationMapping::new().with("privacy", "Privacy")),
            );

        let leaves = mapping.flatten();

        assert_eq!(leaves.keys().collect::<Vec<_>>(), vec!["footer.links.privacy"]);
    }

    #[test]
    fn test_serialize_round_shape() {
        let mapping = TranslationMapping::new()
            .with("a", "x")
            .with("b", vec!["1", "2"]);
        let json: Value = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json["a"], "x");
        assert_eq!(json["b"][1], "2");
    }
}
