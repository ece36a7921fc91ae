//! SPARQL 1.1 Query Results JSON Format
//!
//! Term `type` is kept as a plain string so that an unexpected kind can be
//! reported as a malformed result instead of a deserialization failure.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{Result, ViewerError};

pub type Binding = HashMap<String, RdfTerm>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: Head,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Bindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Head {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Bindings {
    pub bindings: Vec<Binding>,
}

/// One bound RDF term
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RdfTerm {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl RdfTerm {
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: "uri".to_string(),
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn bnode(id: impl Into<String>) -> Self {
        Self {
            kind: "bnode".to_string(),
            value: id.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn literal(value: impl Into<String>, datatype: Option<&str>, lang: Option<&str>) -> Self {
        Self {
            kind: "literal".to_string(),
            value: value.into(),
            datatype: datatype.map(str::to_string),
            lang: lang.map(str::to_string),
        }
    }

    pub fn is_uri(&self) -> bool {
        self.kind == "uri"
    }

    pub fn is_bnode(&self) -> bool {
        self.kind == "bnode"
    }

    /// SPARQL booleans come back as `"true"`/`"false"`, some stores use `1`/`0`
    pub fn as_bool(&self) -> bool {
        matches!(self.value.as_str(), "true" | "1")
    }
}

impl SparqlResults {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| {
            ViewerError::MalformedResult(format!("Failed to parse SPARQL JSON: {}", e))
        })
    }

    /// Solution rows of a SELECT result
    pub fn bindings(&self) -> Result<&[Binding]> {
        self.results
            .as_ref()
            .map(|r| r.bindings.as_slice())
            .ok_or_else(|| ViewerError::MalformedResult("missing 'results' key".to_string()))
    }

    pub fn into_bindings(self) -> Result<Vec<Binding>> {
        self.results
            .map(|r| r.bindings)
            .ok_or_else(|| ViewerError::MalformedResult("missing 'results' key".to_string()))
    }

    /// Answer of an ASK query
    pub fn ask(&self) -> Result<bool> {
        self.boolean
            .ok_or_else(|| ViewerError::MalformedResult("missing 'boolean' key".to_string()))
    }
}

/// Fetch a required variable from a solution row
pub fn required<'a>(row: &'a Binding, var: &str) -> Result<&'a RdfTerm> {
    row.get(var).ok_or_else(|| {
        ViewerError::MalformedResult(format!("binding for '?{}' missing in row {:?}", var, row))
    })
}

/// Fetch an optional variable value from a solution row
pub fn optional_value(row: &Binding, var: &str) -> Option<String> {
    row.get(var).map(|term| term.value.clone())
}
