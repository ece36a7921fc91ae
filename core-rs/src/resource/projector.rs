/**
 * projector.rs
 * Raw rows -> Resource
 *
 * Pure transformation over rows that already went through list
 * reconstruction, given the label/internal/curie indexes built for them:
 * - rdf:type rows become `types` (blank nodes excluded)
 * - other rows are grouped by predicate, de-duplicated and sorted
 * - list-structured groups keep only their expanded members
 */

use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::model::{LiteralValue, PredicateGroup, SubjectGroup, UriValue, Value, ValueKey};
use super::rows::{IncomingRow, RawRow, RowObject};
use crate::errors::{Result, ViewerError};
use crate::sparql::RDF_TYPE;

/// Per-request lookup indexes over every referenced URI
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub labels: HashMap<String, String>,
    pub internal: HashMap<String, bool>,
    pub curies: HashMap<String, String>,
}

impl Lookups {
    pub fn is_internal(&self, uri: &str) -> bool {
        self.internal.get(uri).copied().unwrap_or(false)
    }

    /// CURIE of `uri`, or `uri` when none is known
    pub fn curie<'a>(&'a self, uri: &'a str) -> &'a str {
        self.curies.get(uri).map(String::as_str).unwrap_or(uri)
    }

    /// Resolved label, else CURIE, else the URI itself
    pub fn display_label<'a>(&'a self, uri: &'a str) -> &'a str {
        self.labels
            .get(uri)
            .map(String::as_str)
            .unwrap_or_else(|| self.curie(uri))
    }

    fn uri_value(&self, uri: &str) -> UriValue {
        UriValue::new(uri, self.display_label(uri), self.is_internal(uri))
    }

    fn predicate_value(&self, uri: &str) -> UriValue {
        UriValue::new(uri, self.curie(uri), self.is_internal(uri))
    }
}

/// URIs that need a label and an internal flag: the subject plus every URI
/// in object position
pub fn referenced_uris(subject: &str, rows: &[RawRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut uris = Vec::new();
    for uri in std::iter::once(subject).chain(rows.iter().filter_map(|r| r.object.as_uri())) {
        if seen.insert(uri) {
            uris.push(uri.to_string());
        }
    }
    uris
}

/// URIs shown through their CURIE: predicates and URI objects
pub fn curie_candidates(rows: &[RawRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut uris = Vec::new();
    for row in rows {
        for uri in std::iter::once(row.predicate.as_str()).chain(row.object.as_uri()) {
            if seen.insert(uri) {
                uris.push(uri.to_string());
            }
        }
    }
    uris
}

/// Output of the projection, before any profile is applied
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub label: String,
    pub types: Vec<UriValue>,
    pub properties: Vec<PredicateGroup>,
}

/// Object value for a row; `None` for blank nodes, which are not rendered
fn object_value(row: &RawRow, lookups: &Lookups) -> Option<Value> {
    let index = if row.list_item { row.list_item_index } else { None };

    match &row.object {
        RowObject::Uri(uri) => Some(Value::Uri(UriValue {
            list_item: row.list_item,
            list_item_index: index,
            ..lookups.uri_value(uri)
        })),
        RowObject::Literal {
            value,
            datatype,
            language,
        } => Some(Value::Literal(LiteralValue {
            value: value.clone(),
            datatype: datatype
                .as_ref()
                .map(|d| UriValue::new(d.as_str(), d.as_str(), lookups.is_internal(d))),
            language: language.clone().unwrap_or_default(),
            list_item: row.list_item,
            list_item_index: index,
        })),
        RowObject::BlankNode(_) => None,
    }
}

/// Accumulates predicate groups, de-duplicating objects by `ValueKey`
#[derive(Default)]
struct GroupBuilder {
    groups: Vec<PredicateGroup>,
    positions: HashMap<String, usize>,
    keys: Vec<HashMap<ValueKey, usize>>,
}

impl GroupBuilder {
    fn group(&mut self, predicate: &str, lookups: &Lookups) -> usize {
        if let Some(&position) = self.positions.get(predicate) {
            return position;
        }
        let position = self.groups.len();
        self.groups.push(PredicateGroup::new(lookups.predicate_value(predicate)));
        self.keys.push(HashMap::new());
        self.positions.insert(predicate.to_string(), position);
        position
    }

    fn push(&mut self, position: usize, value: Value) {
        let objects = &mut self.groups[position].objects;
        let keys = &mut self.keys[position];

        match keys.get(&value.key()) {
            // A list member supersedes a plain duplicate of the same value,
            // otherwise the list filter below would drop both.
            Some(&existing) => {
                if value.is_list_item() && !objects[existing].is_list_item() {
                    objects[existing] = value;
                }
            }
            None => {
                keys.insert(value.key(), objects.len());
                objects.push(value);
            }
        }
    }

    fn finish(self) -> Vec<PredicateGroup> {
        self.groups
            .into_iter()
            .map(|mut group| {
                if group.is_list_structured() {
                    group.objects.retain(Value::is_list_item);
                }
                group.objects.sort_by(Value::display_order);
                group
            })
            .collect()
    }
}

fn sort_groups(groups: &mut [PredicateGroup]) {
    groups.sort_by(|a, b| {
        a.predicate
            .label
            .cmp(&b.predicate.label)
            .then_with(|| a.predicate.value.cmp(&b.predicate.value))
    });
}

/// Group, de-duplicate, filter and sort the non-type rows
pub fn project_properties(rows: &[RawRow], lookups: &Lookups) -> Vec<PredicateGroup> {
    let mut builder = GroupBuilder::default();
    for row in rows.iter().filter(|r| r.predicate != RDF_TYPE) {
        let Some(value) = object_value(row, lookups) else {
            continue;
        };
        let position = builder.group(&row.predicate, lookups);
        builder.push(position, value);
    }

    let mut groups = builder.finish();
    sort_groups(&mut groups);
    groups
}

/// Objects of a single predicate, with the same rules as a full projection
pub fn project_objects(rows: &[RawRow], lookups: &Lookups) -> Vec<Value> {
    project_properties(rows, lookups)
        .into_iter()
        .flat_map(|group| group.objects)
        .collect()
}

/// Objects of an already ordered page of rows; duplicates are dropped and the
/// row order is kept
pub fn project_ordered(rows: &[RawRow], lookups: &Lookups) -> Vec<Value> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| object_value(row, lookups))
        .filter(|value| seen.insert(value.key()))
        .collect()
}

pub fn project_types(rows: &[RawRow], lookups: &Lookups) -> Vec<UriValue> {
    let mut seen = HashSet::new();
    let mut types: Vec<UriValue> = rows
        .iter()
        .filter(|r| r.predicate == RDF_TYPE)
        .filter_map(|r| r.object.as_uri())
        .filter(|uri| seen.insert(*uri))
        .map(|uri| lookups.uri_value(uri))
        .collect();

    types.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.value.cmp(&b.value)));
    types
}

/// Project a subject's rows into label, types and properties.
///
/// Fails with `NotFound` unless the subject is internal to the queried graph.
pub fn project(subject: &str, rows: &[RawRow], lookups: &Lookups) -> Result<Projection> {
    if !lookups.is_internal(subject) {
        debug!(subject, "Resource not found in the internal index");
        return Err(ViewerError::NotFound(subject.to_string()));
    }

    Ok(Projection {
        label: lookups
            .labels
            .get(subject)
            .cloned()
            .unwrap_or_else(|| subject.to_string()),
        types: project_types(rows, lookups),
        properties: project_properties(rows, lookups),
    })
}

pub fn incoming_uris(rows: &[IncomingRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .flat_map(|r| [r.predicate.as_str(), r.subject.as_str()])
        .filter(|uri| seen.insert(*uri))
        .map(str::to_string)
        .collect()
}

/// Group incoming statements by predicate
pub fn project_incoming(rows: &[IncomingRow], lookups: &Lookups) -> Vec<SubjectGroup> {
    let mut groups: Vec<SubjectGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for row in rows {
        if !seen.insert((row.predicate.as_str(), row.subject.as_str())) {
            continue;
        }
        let position = *positions.entry(row.predicate.as_str()).or_insert_with(|| {
            groups.push(SubjectGroup {
                predicate: lookups.predicate_value(&row.predicate),
                subjects: Vec::new(),
            });
            groups.len() - 1
        });
        groups[position].subjects.push(lookups.uri_value(&row.subject));
    }

    for group in &mut groups {
        group
            .subjects
            .sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.value.cmp(&b.value)));
    }
    groups.sort_by(|a, b| {
        a.predicate
            .label
            .cmp(&b.predicate.label)
            .then_with(|| a.predicate.value.cmp(&b.predicate.value))
    });
    groups
}
