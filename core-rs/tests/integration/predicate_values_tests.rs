//! Integration tests for paginated predicate values
//!
//! Covers both paths:
//! - resource statements (lists expanded, values sorted, count from the store)
//! - profile augmentations joined in from a supplementary metadata endpoint

use ld_viewer::config::LabelSettings;
use ld_viewer::profile::method::{METHOD, METHOD_COLLECTION};
use ld_viewer::{
    CurieResolver, LocalTransport, PredicateValues, ProfileRegistry, ResourceViewer, SparqlClient,
    Value, ViewerError,
};
use std::sync::Arc;

const ENDPOINT: &str = "http://localhost/repositories/dawe_vocabs_core";
const META_ENDPOINT: &str = "http://localhost/repositories/protocol_metadata";

const PROTOCOL: &str = "https://example.com/protocol";
const OBSERVABLE_PROPERTY: &str = "https://w3id.org/tern/ontologies/tern/hasObservableProperty";
const FEATURE_TYPE: &str = "https://w3id.org/tern/ontologies/tern/hasFeatureType";
const CATEGORICAL: &str = "https://w3id.org/tern/ontologies/tern/hasCategoricalValuesCollection";
const MEMBER_LIST: &str = "http://www.w3.org/2004/02/skos/core#memberList";
const DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";

fn viewer() -> ResourceViewer {
    let transport = LocalTransport::new()
        .with_turtle(ENDPOINT, include_str!("../fixtures/protocols.ttl"))
        .unwrap()
        .with_turtle(META_ENDPOINT, include_str!("../fixtures/protocol_metadata.ttl"))
        .unwrap();
    let labels = LabelSettings {
        federation: None,
        ..LabelSettings::default()
    };

    ResourceViewer::new(
        SparqlClient::new(Arc::new(transport)),
        Arc::new(CurieResolver::new(None).with_prefix("https://example.com/", "ex")),
        &labels,
        Arc::new(ProfileRegistry::builtin().unwrap()),
    )
    .with_supplementary_endpoint(Some(META_ENDPOINT.to_string()))
}

async fn values(predicate: &str, profile: Option<&str>, limit: usize, page: usize) -> PredicateValues {
    viewer()
        .get_predicate_values(PROTOCOL, predicate, ENDPOINT, profile, limit, page)
        .await
        .unwrap()
}

fn labels(values: &PredicateValues) -> Vec<&str> {
    values
        .objects
        .iter()
        .map(|v| match v {
            Value::Uri(u) => u.label.as_str(),
            Value::Literal(l) => l.value.as_str(),
        })
        .collect()
}

/// Test: observable properties come from the metadata endpoint, deduplicated
#[tokio::test]
async fn test_augmented_values() {
    let result = values(OBSERVABLE_PROPERTY, Some(METHOD), 20, 1).await;

    assert_eq!(result.uri, PROTOCOL);
    assert_eq!(result.predicate, OBSERVABLE_PROPERTY);
    assert_eq!(result.count, 2);
    assert_eq!(labels(&result), vec!["Cover", "Height"]);
    for object in &result.objects {
        match object {
            Value::Uri(uri) => assert!(uri.internal, "{} should be internal", uri.value),
            other => panic!("expected a URI, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_augmented_pagination() {
    let second = values(OBSERVABLE_PROPERTY, Some(METHOD), 1, 2).await;
    assert_eq!(second.count, 2);
    assert_eq!(labels(&second), vec!["Height"]);

    let past_end = values(OBSERVABLE_PROPERTY, Some(METHOD), 1, 3).await;
    assert_eq!(past_end.count, 2);
    assert!(past_end.objects.is_empty());
}

#[tokio::test]
async fn test_other_augmentations() {
    let features = values(FEATURE_TYPE, Some(METHOD), 20, 1).await;
    assert_eq!(features.count, 1);
    assert_eq!(labels(&features), vec!["Plant community"]);

    let categorical = values(CATEGORICAL, Some(METHOD), 20, 1).await;
    assert_eq!(categorical.count, 0);
    assert!(categorical.objects.is_empty());
}

/// Test: without a profile an augmented predicate is just an absent statement
#[tokio::test]
async fn test_augmented_predicate_without_profile() {
    let result = values(OBSERVABLE_PROPERTY, None, 20, 1).await;
    assert_eq!(result.count, 0);
    assert!(result.objects.is_empty());

    // An empty profile string means no profile
    let empty = values(OBSERVABLE_PROPERTY, Some(""), 20, 1).await;
    assert_eq!(empty, result);
}

#[tokio::test]
async fn test_list_values_in_order() {
    let result = values(MEMBER_LIST, None, 20, 1).await;

    assert_eq!(result.count, 3);
    assert_eq!(labels(&result), vec!["Step three", "Step one", "Step two"]);
    assert!(result.objects.iter().all(Value::is_list_item));

    let page = values(MEMBER_LIST, None, 2, 2).await;
    assert_eq!(labels(&page), vec!["Step two"]);
}

#[tokio::test]
async fn test_literal_values_sorted() {
    let result = values("https://example.com/keyword", None, 20, 1).await;
    assert_eq!(result.count, 2);
    assert_eq!(labels(&result), vec!["alpha", "beta"]);
}

/// Test: a profile without an augmentation for the predicate reads statements
#[tokio::test]
async fn test_non_augmented_predicate_under_profile() {
    let with_profile = values(DEFINITION, Some(METHOD), 20, 1).await;
    assert_eq!(with_profile.count, 1);
    assert_eq!(labels(&with_profile), vec!["Survey of vegetation."]);

    let collection = values(DEFINITION, Some(METHOD_COLLECTION), 20, 1).await;
    assert_eq!(collection, with_profile);
}

#[tokio::test]
async fn test_zero_page_and_limit_clamped() {
    let result = values("https://example.com/keyword", None, 0, 0).await;
    assert_eq!(result.count, 2);
    assert_eq!(labels(&result), vec!["alpha"]);
}

#[tokio::test]
async fn test_unknown_profile() {
    let err = viewer()
        .get_predicate_values(
            PROTOCOL,
            OBSERVABLE_PROPERTY,
            ENDPOINT,
            Some("https://example.com/UnknownProfile"),
            20,
            1,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ViewerError::ProfileNotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_invalid_predicate() {
    let err = viewer()
        .get_predicate_values(PROTOCOL, "not a uri", ENDPOINT, None, 20, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ViewerError::InvalidUri(_)));
    assert_eq!(err.status_code(), 400);
}
