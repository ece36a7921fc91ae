//! Typed rows parsed out of SPARQL bindings

use crate::errors::{Result, ViewerError};
use crate::sparql::results::required;
use crate::sparql::{Binding, RdfTerm};

/// Implicit datatypes of plain and language-tagged literals; some stores spell them out
const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

#[derive(Debug, Clone, PartialEq)]
pub enum RowObject {
    Uri(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
    BlankNode(String),
}

impl RowObject {
    pub fn from_term(term: &RdfTerm) -> Result<Self> {
        match term.kind.as_str() {
            "uri" => Ok(RowObject::Uri(term.value.clone())),
            // "typed-literal" is the pre-1.1 spelling some stores still emit
            "literal" | "typed-literal" => Ok(RowObject::Literal {
                value: term.value.clone(),
                datatype: term
                    .datatype
                    .clone()
                    .filter(|d| d != XSD_STRING && d != RDF_LANG_STRING),
                language: term.lang.clone(),
            }),
            "bnode" => Ok(RowObject::BlankNode(term.value.clone())),
            other => Err(ViewerError::MalformedResult(format!(
                "Expected type to be uri, literal or bnode but got {}",
                other
            ))),
        }
    }

    pub fn as_uri(&self) -> Option<&str> {
        match self {
            RowObject::Uri(uri) => Some(uri),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, RowObject::BlankNode(_))
    }
}

/// One outgoing statement of the subject
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub predicate: String,
    pub object: RowObject,
    /// Set on list heads by the outgoing query, and on expanded list members
    pub list_item: bool,
    pub list_item_index: Option<usize>,
}

impl RawRow {
    /// Parse a `?p ?o ?listItem` row. `?listItemNumber` is only a placeholder
    /// at this point and is ignored.
    pub fn from_binding(row: &Binding) -> Result<Self> {
        let predicate = required(row, "p")?;
        if !predicate.is_uri() {
            return Err(ViewerError::MalformedResult(format!(
                "predicate is not a URI: {}",
                predicate.value
            )));
        }

        let object = RowObject::from_term(required(row, "o")?)?;
        // Only a blank node can head a list that gets expanded; a named node
        // with an rdf:rest edge is an ordinary value
        let list_item =
            object.is_blank() && row.get("listItem").map(RdfTerm::as_bool).unwrap_or(false);

        Ok(Self {
            predicate: predicate.value.clone(),
            object,
            list_item,
            list_item_index: None,
        })
    }

    pub fn from_bindings(rows: &[Binding]) -> Result<Vec<Self>> {
        rows.iter().map(Self::from_binding).collect()
    }

    /// Blank-node object flagged as the head of an RDF List
    pub fn is_list_head(&self) -> bool {
        self.list_item && self.object.is_blank()
    }
}

/// One statement pointing at the subject: `?s ?p <subject>`
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingRow {
    pub predicate: String,
    pub subject: String,
}

impl IncomingRow {
    pub fn from_binding(row: &Binding) -> Result<Self> {
        let subject = required(row, "s")?;
        if !subject.is_uri() {
            return Err(ViewerError::MalformedResult(format!(
                "incoming subject is not a URI: {}",
                subject.value
            )));
        }
        Ok(Self {
            predicate: required(row, "p")?.value.clone(),
            subject: subject.value.clone(),
        })
    }
}
