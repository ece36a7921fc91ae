/**
 * method.rs
 * TERN protocol profiles
 *
 * MethodCollection: curated order for protocol collections, skos:prefLabel
 * dropped (it is already the resource label).
 * Method: MethodCollection plus observable properties, feature types and
 * categorical value collections joined in from protocol module metadata.
 */

use super::registry::{Augmentation, Pick, ProfileRegistry, ProfileSpec};
use crate::errors::Result;

pub const TERN: &str = "https://w3id.org/tern/ontologies/tern/";
pub const METHOD_COLLECTION: &str = "https://w3id.org/tern/ontologies/tern/MethodCollection";
pub const METHOD: &str = "https://w3id.org/tern/ontologies/tern/Method";

/// Links a metadata node to the protocol module it describes
pub const PROTOCOL_MODULE: &str = "urn:property:protocolModule";

const RDFS_IS_DEFINED_BY: &str = "http://www.w3.org/2000/01/rdf-schema#isDefinedBy";
const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
const SKOS_MEMBER_LIST: &str = "http://www.w3.org/2004/02/skos/core#memberList";
const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
const SKOS_NOTE: &str = "http://www.w3.org/2004/02/skos/core#note";
const SCHEMA_URL: &str = "https://schema.org/url";
const DCTERMS_DESCRIPTION: &str = "http://purl.org/dc/terms/description";
const DCTERMS_SOURCE: &str = "http://purl.org/dc/terms/source";

fn tern(local_name: &str) -> String {
    format!("{}{}", TERN, local_name)
}

fn method_collection() -> ProfileSpec {
    ProfileSpec {
        uri: METHOD_COLLECTION.to_string(),
        base: None,
        picks: vec![
            Pick::keep(RDFS_IS_DEFINED_BY),
            Pick::omit(SKOS_PREF_LABEL),
            Pick::keep(SCHEMA_URL),
            Pick::keep(SKOS_MEMBER_LIST),
            Pick::keep(&tern("scope")),
            Pick::keep(SKOS_DEFINITION),
            Pick::keep(&tern("purpose")),
            Pick::keep(DCTERMS_DESCRIPTION),
            Pick::keep(&tern("equipment")),
            Pick::keep(&tern("instructions")),
            Pick::keep(SKOS_NOTE),
            Pick::keep(DCTERMS_SOURCE),
            Pick::keep(&tern("appendix")),
        ],
        augmentations: vec![],
    }
}

fn augmentation(local_name: &str, metadata_predicate: &str) -> Augmentation {
    Augmentation {
        predicate: tern(local_name),
        label: format!("tern:{}", local_name),
        link_predicate: PROTOCOL_MODULE.to_string(),
        metadata_predicate: metadata_predicate.to_string(),
    }
}

fn method() -> ProfileSpec {
    ProfileSpec {
        uri: METHOD.to_string(),
        base: Some(METHOD_COLLECTION.to_string()),
        picks: vec![],
        augmentations: vec![
            augmentation("hasObservableProperty", "urn:property:observableProperty"),
            augmentation("hasFeatureType", "urn:property:featureType"),
            augmentation(
                "hasCategoricalValuesCollection",
                "urn:property:categoricalValuesCollection",
            ),
        ],
    }
}

pub fn register(registry: &mut ProfileRegistry) -> Result<()> {
    registry.register(method_collection())?;
    registry.register(method())?;
    Ok(())
}
