/**
 * model.rs
 * JSON representation of a projected resource
 *
 * Field names follow the viewer's wire format (`list_item`,
 * `list_item_number`, `incoming_properties`, ...). Values carry a `type`
 * tag of `uri` or `literal`.
 */

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UriValue {
    pub label: String,
    pub value: String,
    pub internal: bool,
    #[serde(default)]
    pub list_item: bool,
    #[serde(rename = "list_item_number", default)]
    pub list_item_index: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LiteralValue {
    pub value: String,
    #[serde(default)]
    pub datatype: Option<UriValue>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub list_item: bool,
    #[serde(rename = "list_item_number", default)]
    pub list_item_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Value {
    Uri(UriValue),
    Literal(LiteralValue),
}

/// Identity of a value for de-duplication
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Uri(String),
    /// (lexical form, datatype URI or "", language)
    Literal(String, String, String),
}

impl UriValue {
    pub fn new(value: impl Into<String>, label: impl Into<String>, internal: bool) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            internal,
            list_item: false,
            list_item_index: None,
        }
    }
}

impl Value {
    pub fn value(&self) -> &str {
        match self {
            Value::Uri(v) => &v.value,
            Value::Literal(v) => &v.value,
        }
    }

    pub fn key(&self) -> ValueKey {
        match self {
            Value::Uri(v) => ValueKey::Uri(v.value.clone()),
            Value::Literal(v) => ValueKey::Literal(
                v.value.clone(),
                v.datatype.as_ref().map(|d| d.value.clone()).unwrap_or_default(),
                v.language.clone(),
            ),
        }
    }

    pub fn is_list_item(&self) -> bool {
        match self {
            Value::Uri(v) => v.list_item,
            Value::Literal(v) => v.list_item,
        }
    }

    pub fn list_item_index(&self) -> Option<usize> {
        let (list_item, index) = match self {
            Value::Uri(v) => (v.list_item, v.list_item_index),
            Value::Literal(v) => (v.list_item, v.list_item_index),
        };
        if list_item {
            index
        } else {
            None
        }
    }

    /// Text non-list values are ordered by: label for URIs, lexical form for literals
    fn sort_text(&self) -> &str {
        match self {
            Value::Uri(v) => &v.label,
            Value::Literal(v) => &v.value,
        }
    }

    /// Object order within a predicate group: list members by position and
    /// ahead of everything else, then by display text
    pub fn display_order(&self, other: &Self) -> Ordering {
        match (self.list_item_index(), other.list_item_index()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .sort_text()
                .cmp(other.sort_text())
                .then_with(|| self.key().cmp(&other.key())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredicateGroup {
    pub predicate: UriValue,
    pub objects: Vec<Value>,
}

impl PredicateGroup {
    pub fn new(predicate: UriValue) -> Self {
        Self {
            predicate,
            objects: Vec::new(),
        }
    }

    /// True when at least one object came out of an RDF List
    pub fn is_list_structured(&self) -> bool {
        self.objects.iter().any(Value::is_list_item)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectGroup {
    pub predicate: UriValue,
    pub subjects: Vec<UriValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub uri: String,
    /// URI of the applied profile, empty when none matched
    #[serde(default)]
    pub profile: String,
    pub label: String,
    pub types: Vec<UriValue>,
    pub properties: Vec<PredicateGroup>,
    #[serde(default)]
    pub incoming_properties: Vec<SubjectGroup>,
    /// Predicates whose values must be fetched with `profile` set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties_require_profile: Vec<String>,
}

impl Resource {
    pub fn property(&self, predicate: &str) -> Option<&PredicateGroup> {
        self.properties.iter().find(|g| g.predicate.value == predicate)
    }
}

/// One page of the values of a single predicate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredicateValues {
    pub uri: String,
    pub predicate: String,
    /// Total number of distinct values, across all pages
    pub count: usize,
    pub objects: Vec<Value>,
}
