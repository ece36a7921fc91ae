//! Projection Contract Tests
//!
//! These tests verify INVARIANTS of the resource JSON that clients rely on.
//! Each test documents WHY the behavior is fixed and what breaks downstream
//! when it changes.

use ld_viewer::resource::projector::{self, Lookups};
use ld_viewer::resource::{RawRow, RowObject};
use ld_viewer::{Value, ViewerError};
use std::collections::HashSet;

const SUBJECT: &str = "https://example.com/subject";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const MEMBERS: &str = "https://example.com/members";
const TAG: &str = "https://example.com/tag";

fn uri_row(predicate: &str, object: &str) -> RawRow {
    RawRow {
        predicate: predicate.to_string(),
        object: RowObject::Uri(object.to_string()),
        list_item: false,
        list_item_index: None,
    }
}

fn literal_row(predicate: &str, value: &str, language: Option<&str>) -> RawRow {
    RawRow {
        predicate: predicate.to_string(),
        object: RowObject::Literal {
            value: value.to_string(),
            datatype: None,
            language: language.map(str::to_string),
        },
        list_item: false,
        list_item_index: None,
    }
}

fn list_row(predicate: &str, object: &str, index: usize) -> RawRow {
    RawRow {
        list_item: true,
        list_item_index: Some(index),
        ..uri_row(predicate, object)
    }
}

fn lookups(labels: &[(&str, &str)]) -> Lookups {
    let mut lookups = Lookups::default();
    lookups.internal.insert(SUBJECT.to_string(), true);
    for (uri, label) in labels {
        lookups.labels.insert(uri.to_string(), label.to_string());
    }
    lookups
}

/// WHY: An object appears at most once per predicate
/// REASON: The outgoing query and list expansion can both yield the same value
/// BREAKS: Clients render duplicate rows and pagination counts drift
#[test]
fn objects_unique_per_predicate() {
    let rows = vec![
        uri_row(TAG, "https://example.com/a"),
        uri_row(TAG, "https://example.com/a"),
        literal_row(TAG, "hello", Some("en")),
        literal_row(TAG, "hello", Some("en")),
        // Same lexical form, different language: a distinct value
        literal_row(TAG, "hello", Some("de")),
    ];
    let groups = projector::project_properties(&rows, &lookups(&[]));

    assert_eq!(groups.len(), 1);
    let keys: HashSet<_> = groups[0].objects.iter().map(Value::key).collect();
    assert_eq!(keys.len(), groups[0].objects.len());
    assert_eq!(groups[0].objects.len(), 3);
}

/// WHY: List members are rendered in list position order
/// REASON: RDF Lists encode an author-defined sequence (protocol steps)
/// BREAKS: Ordered content such as method steps shows up shuffled
#[test]
fn list_members_keep_list_order() {
    let rows = vec![
        RawRow {
            predicate: MEMBERS.to_string(),
            object: RowObject::BlankNode("b0".to_string()),
            list_item: true,
            list_item_index: None,
        },
        list_row(MEMBERS, "https://example.com/z", 0),
        list_row(MEMBERS, "https://example.com/a", 2),
        list_row(MEMBERS, "https://example.com/m", 1),
    ];
    let labels = [
        ("https://example.com/z", "Zulu"),
        ("https://example.com/a", "Alpha"),
        ("https://example.com/m", "Mike"),
    ];
    let objects = projector::project_objects(&rows, &lookups(&labels));

    let order: Vec<&str> = objects.iter().map(Value::value).collect();
    assert_eq!(
        order,
        vec!["https://example.com/z", "https://example.com/m", "https://example.com/a"]
    );
}

/// WHY: A list-structured predicate only shows its members
/// REASON: The list head is a blank node; stray plain values would interleave
/// BREAKS: Clients see values that are not part of the list
#[test]
fn list_structured_group_drops_non_members() {
    let rows = vec![
        uri_row(MEMBERS, "https://example.com/stray"),
        list_row(MEMBERS, "https://example.com/a", 0),
        // Also a plain statement: the list member wins
        uri_row(MEMBERS, "https://example.com/a"),
    ];
    let objects = projector::project_objects(&rows, &lookups(&[]));

    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].value(), "https://example.com/a");
    assert_eq!(objects[0].list_item_index(), Some(0));
}

/// WHY: rdf:type goes to `types`, never to `properties`, and never a blank node
/// REASON: Profiles dispatch on named types only
/// BREAKS: Profile selection and the type badges in the UI
#[test]
fn types_are_named_and_separate() {
    let rows = vec![
        uri_row(RDF_TYPE, "https://example.com/Thing"),
        RawRow {
            predicate: RDF_TYPE.to_string(),
            object: RowObject::BlankNode("b1".to_string()),
            list_item: false,
            list_item_index: None,
        },
        uri_row(TAG, "https://example.com/a"),
    ];
    let projection = projector::project(SUBJECT, &rows, &lookups(&[])).unwrap();

    assert_eq!(projection.types.len(), 1);
    assert_eq!(projection.types[0].value, "https://example.com/Thing");
    assert!(projection.properties.iter().all(|g| g.predicate.value != RDF_TYPE));
}

/// WHY: Predicate groups are sorted by predicate label
/// REASON: Output must be stable regardless of store row order
/// BREAKS: Snapshot comparisons and cached renders
#[test]
fn projection_independent_of_row_order() {
    let mut rows = vec![
        uri_row(TAG, "https://example.com/b"),
        literal_row("https://example.com/note", "n", None),
        uri_row(TAG, "https://example.com/a"),
        uri_row(RDF_TYPE, "https://example.com/Thing"),
    ];
    let lookups = lookups(&[]);
    let forward = projector::project(SUBJECT, &rows, &lookups).unwrap();
    rows.reverse();
    let backward = projector::project(SUBJECT, &rows, &lookups).unwrap();

    assert_eq!(forward, backward);
}

/// WHY: A subject that is not internal to the graph is NotFound
/// REASON: Resources only referenced as objects have no page of their own
/// BREAKS: The 404 contract of the resource endpoint
#[test]
fn external_subject_is_not_found() {
    let rows = vec![uri_row(TAG, "https://example.com/a")];
    let err = projector::project(SUBJECT, &rows, &Lookups::default()).unwrap_err();

    assert!(matches!(err, ViewerError::NotFound(ref uri) if uri == SUBJECT));
    assert_eq!(err.status_code(), 404);
}
