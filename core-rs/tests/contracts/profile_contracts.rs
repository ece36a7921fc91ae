//! Profile Contract Tests
//!
//! Profiles reshape the property list of typed resources. These invariants
//! pin down what a profile may and may not change.

use ld_viewer::profile::method::{METHOD, METHOD_COLLECTION};
use ld_viewer::profile::{Pick, ProfileSpec};
use ld_viewer::{PredicateGroup, ProfileRegistry, UriValue, ViewerError};

fn group(predicate: &str) -> PredicateGroup {
    PredicateGroup::new(UriValue::new(predicate, predicate, false))
}

fn predicates(groups: &[PredicateGroup]) -> Vec<&str> {
    groups.iter().map(|g| g.predicate.value.as_str()).collect()
}

fn type_value(uri: &str) -> UriValue {
    UriValue::new(uri, uri, true)
}

/// WHY: Picks come first in pick order, omitted picks vanish, the rest follow
/// REASON: Curated field order is the whole point of a profile
/// BREAKS: Protocol pages lose their designed layout
#[test]
fn pick_order_then_remaining() {
    let mut registry = ProfileRegistry::new();
    registry
        .register(ProfileSpec {
            uri: "urn:profile:test".to_string(),
            picks: vec![Pick::keep("urn:p:c"), Pick::omit("urn:p:b"), Pick::keep("urn:p:a")],
            ..ProfileSpec::default()
        })
        .unwrap();

    let properties = ["urn:p:a", "urn:p:b", "urn:p:c", "urn:p:d"]
        .iter()
        .map(|p| group(p))
        .collect();
    let (profile, reshaped) = registry
        .require("urn:profile:test")
        .unwrap()
        .apply("urn:resource", properties);

    assert_eq!(profile, "urn:profile:test");
    assert_eq!(predicates(&reshaped), vec!["urn:p:c", "urn:p:a", "urn:p:d"]);
}

/// WHY: A pick for an absent predicate adds nothing
/// REASON: Only augmentations may introduce empty groups
/// BREAKS: Clients show empty fields the resource never had
#[test]
fn absent_picks_add_nothing() {
    let registry = ProfileRegistry::builtin().unwrap();
    let (_, reshaped) = registry
        .require(METHOD_COLLECTION)
        .unwrap()
        .apply("urn:resource", vec![group("urn:p:only")]);

    assert_eq!(predicates(&reshaped), vec!["urn:p:only"]);
}

/// WHY: The first type (in sorted type order) with a profile wins
/// REASON: Dispatch must be deterministic for multi-typed resources
/// BREAKS: The same resource renders with different profiles between requests
#[test]
fn first_registered_type_wins() {
    let registry = ProfileRegistry::builtin().unwrap();
    let types = vec![
        type_value("http://www.w3.org/2004/02/skos/core#Concept"),
        type_value(METHOD_COLLECTION),
        type_value(METHOD),
    ];

    assert_eq!(registry.resolve(&types).unwrap().uri, METHOD_COLLECTION);
    assert!(registry.resolve(&types[..1]).is_none());
}

/// WHY: Augmented predicates are announced and appended empty
/// REASON: Their values live elsewhere and are fetched page by page
/// BREAKS: Clients never know to call the predicate-values endpoint
#[test]
fn augmentations_are_announced() {
    let registry = ProfileRegistry::builtin().unwrap();
    let method = registry.require(METHOD).unwrap();
    let (_, reshaped) = method.apply("urn:resource", Vec::new());

    let required = method.properties_require_profile_for(&[]);
    assert_eq!(required.len(), 3);
    assert_eq!(predicates(&reshaped), required.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(reshaped.iter().all(|g| g.objects.is_empty()));
}

/// WHY: A profile inherits its base's picks
/// REASON: Method extends MethodCollection
/// BREAKS: Method pages lose the curated collection layout
#[test]
fn base_profile_folded_in() {
    let registry = ProfileRegistry::builtin().unwrap();
    let base = registry.require(METHOD_COLLECTION).unwrap();
    let method = registry.require(METHOD).unwrap();

    assert_eq!(method.picks, base.picks);
    assert!(base.augmentations.is_empty());
}

/// WHY: Unknown profiles are reported, never silently ignored
/// REASON: A typo in a profile URI must not return unrelated values
/// BREAKS: Predicate-values requests return empty pages with no error
#[test]
fn unknown_profile_is_an_error() {
    let registry = ProfileRegistry::builtin().unwrap();
    let err = registry.require("urn:profile:missing").unwrap_err();
    assert!(matches!(err, ViewerError::ProfileNotFound(_)));

    let mut registry = ProfileRegistry::new();
    let err = registry
        .register(ProfileSpec {
            uri: "urn:profile:child".to_string(),
            base: Some("urn:profile:missing".to_string()),
            ..ProfileSpec::default()
        })
        .unwrap_err();
    assert!(matches!(err, ViewerError::ProfileNotFound(_)));
    assert!(registry.is_empty());
}
