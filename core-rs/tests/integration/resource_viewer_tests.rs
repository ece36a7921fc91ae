//! Integration tests for resource projection
//!
//! Runs the full viewer pipeline against in-process oxigraph endpoints:
//! - RDF List reconstruction through rdf:rest* paths
//! - batch label / internal lookups
//! - profile dispatch and reshaping
//! - incoming statements

use ld_viewer::config::LabelSettings;
use ld_viewer::profile::method::{METHOD, METHOD_COLLECTION};
use ld_viewer::{
    CurieResolver, LocalTransport, ProfileRegistry, Resource, ResourceViewer, SparqlClient, Value,
    ViewerError,
};
use std::sync::Arc;

const ENDPOINT: &str = "http://localhost/repositories/dawe_vocabs_core";
const META_ENDPOINT: &str = "http://localhost/repositories/protocol_metadata";

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
    let curies = CurieResolver::new(None).with_prefix("https://example.com/", "ex");

    ResourceViewer::new(
        SparqlClient::new(Arc::new(transport)),
        Arc::new(curies),
        &labels,
        Arc::new(ProfileRegistry::builtin().unwrap()),
    )
    .with_supplementary_endpoint(Some(META_ENDPOINT.to_string()))
}

async fn get(uri: &str, include_incoming: bool) -> Resource {
    viewer()
        .get_resource(uri, ENDPOINT, include_incoming)
        .await
        .unwrap()
}

fn predicate_labels(resource: &Resource) -> Vec<&str> {
    resource
        .properties
        .iter()
        .map(|g| g.predicate.label.as_str())
        .collect()
}

fn object_labels(objects: &[Value]) -> Vec<&str> {
    objects
        .iter()
        .map(|v| match v {
            Value::Uri(u) => u.label.as_str(),
            Value::Literal(l) => l.value.as_str(),
        })
        .collect()
}

#[tokio::test]
async fn test_method_resource() {
    let resource = get("https://example.com/protocol", false).await;

    assert_eq!(resource.label, "Vegetation survey");
    assert_eq!(resource.profile, METHOD);

    let types: Vec<&str> = resource.types.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(types, vec!["skos:Concept", "tern:Method"]);

    assert_eq!(
        predicate_labels(&resource),
        vec![
            "rdfs:isDefinedBy",
            "schema:url",
            "skos:memberList",
            "skos:definition",
            "dcterms:description",
            "ex:keyword",
            "ex:zeta",
            "tern:hasObservableProperty",
            "tern:hasFeatureType",
            "tern:hasCategoricalValuesCollection",
        ]
    );
    assert_eq!(resource.properties_require_profile.len(), 3);
    assert!(resource
        .property("https://w3id.org/tern/ontologies/tern/hasFeatureType")
        .unwrap()
        .objects
        .is_empty());
}

/// Test: RDF List members come back in chain order, head removed
#[tokio::test]
async fn test_member_list_order() {
    let resource = get("https://example.com/protocol", false).await;
    let members = resource
        .property("http://www.w3.org/2004/02/skos/core#memberList")
        .unwrap();

    assert_eq!(
        object_labels(&members.objects),
        vec!["Step three", "Step one", "Step two"]
    );
    let indexes: Vec<Option<usize>> = members.objects.iter().map(Value::list_item_index).collect();
    assert_eq!(indexes, vec![Some(0), Some(1), Some(2)]);
}

#[tokio::test]
async fn test_uri_objects_labelled_and_flagged() {
    let resource = get("https://example.com/protocol", false).await;

    let defined_by = &resource
        .property("http://www.w3.org/2000/01/rdf-schema#isDefinedBy")
        .unwrap()
        .objects[0];
    match defined_by {
        Value::Uri(uri) => {
            assert_eq!(uri.label, "NRM");
            assert!(uri.internal);
        }
        other => panic!("expected a URI, got {:?}", other),
    }

    let zeta = resource.property("https://example.com/zeta").unwrap();
    assert_eq!(object_labels(&zeta.objects), vec!["Step one", "ex:external"]);
    match &zeta.objects[1] {
        Value::Uri(uri) => assert!(!uri.internal),
        other => panic!("expected a URI, got {:?}", other),
    }
}

#[tokio::test]
async fn test_typed_literal() {
    let resource = get("https://example.com/protocol", false).await;
    let url = &resource.property("https://schema.org/url").unwrap().objects[0];
    match url {
        Value::Literal(literal) => {
            assert_eq!(literal.value, "https://example.com/docs/vegetation");
            let datatype = literal.datatype.as_ref().unwrap();
            assert_eq!(datatype.value, "http://www.w3.org/2001/XMLSchema#anyURI");
            assert_eq!(datatype.label, datatype.value);
        }
        other => panic!("expected a literal, got {:?}", other),
    }
}

/// Test: MethodCollection omits skos:prefLabel and adds nothing
#[tokio::test]
async fn test_method_collection_resource() {
    let resource = get("https://example.com/collection", false).await;

    assert_eq!(resource.profile, METHOD_COLLECTION);
    assert_eq!(
        predicate_labels(&resource),
        vec!["skos:definition", "dcterms:source", "skos:member"]
    );
    assert!(resource.properties_require_profile.is_empty());
}

#[tokio::test]
async fn test_unprofiled_resource_sorted() {
    let resource = get("https://example.com/concept", false).await;

    assert_eq!(resource.profile, "");
    assert_eq!(resource.label, "Concept");
    assert_eq!(predicate_labels(&resource), vec!["ex:fruit", "ex:name", "rdfs:label"]);

    let fruit = resource.property("https://example.com/fruit").unwrap();
    assert_eq!(object_labels(&fruit.objects), vec!["Apple", "Banana", "Cherry"]);

    let names = resource.property("https://example.com/name").unwrap();
    assert_eq!(object_labels(&names.objects), vec!["hallo", "hello"]);
}

#[tokio::test]
async fn test_blank_node_type_excluded() {
    let resource = get("https://example.com/blankTyped", false).await;
    let types: Vec<&str> = resource.types.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(types, vec!["http://www.w3.org/2004/02/skos/core#Concept"]);
}

#[tokio::test]
async fn test_incoming_properties() {
    let resource = get("https://example.com/protocol", true).await;

    let groups: Vec<(&str, Vec<&str>)> = resource
        .incoming_properties
        .iter()
        .map(|g| {
            (
                g.predicate.label.as_str(),
                g.subjects.iter().map(|s| s.label.as_str()).collect(),
            )
        })
        .collect();
    assert_eq!(
        groups,
        vec![
            ("ex:related", vec!["ex:other"]),
            ("skos:member", vec!["Protocol collection"]),
        ]
    );
    assert!(resource.incoming_properties.iter().all(|g| g.subjects[0].internal));

    // Outgoing side is unaffected by the flag
    let without = get("https://example.com/protocol", false).await;
    assert_eq!(without.properties, resource.properties);
    assert!(without.incoming_properties.is_empty());
}

/// Test: repeated fetches against unchanged data are field-for-field equal
#[tokio::test]
async fn test_repeated_fetch_is_stable() {
    let viewer = viewer();
    for uri in ["https://example.com/protocol", "https://example.com/concept"] {
        let first = viewer.get_resource(uri, ENDPOINT, true).await.unwrap();
        let second = viewer.get_resource(uri, ENDPOINT, true).await.unwrap();
        assert_eq!(first, second);
    }
}

#[tokio::test]
async fn test_not_found() {
    for uri in ["https://example.com/nonexistent", "https://example.com/external"] {
        let err = viewer().get_resource(uri, ENDPOINT, false).await.unwrap_err();
        assert!(matches!(err, ViewerError::NotFound(_)), "{} should not be found", uri);
        assert_eq!(err.to_string(), format!("Resource with URI {} not found.", uri));
    }
}

#[tokio::test]
async fn test_unknown_endpoint_is_upstream_error() {
    let err = viewer()
        .get_resource(
            "https://example.com/protocol",
            "http://localhost/repositories/missing",
            false,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ViewerError::Request { .. }));
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn test_json_wire_format() {
    let resource = get("https://example.com/protocol", true).await;
    let json = serde_json::to_value(&resource).unwrap();

    assert_eq!(json["uri"], "https://example.com/protocol");
    assert_eq!(json["profile"], METHOD);
    assert!(json["incoming_properties"].is_array());
    assert_eq!(json["properties_require_profile"].as_array().unwrap().len(), 3);

    let first_member = &json["properties"][2]["objects"][0];
    assert_eq!(first_member["type"], "uri");
    assert_eq!(first_member["list_item"], true);
    assert_eq!(first_member["list_item_number"], 0);

    let round_trip: Resource = serde_json::from_value(json).unwrap();
    assert_eq!(round_trip, resource);
}
