/**
 * config.rs
 * Viewer configuration (YAML)
 *
 * Format:
 * ```yaml
 * sparql:
 *   timeoutSecs: 60
 * curie:
 *   shrinkService: https://prefix.zazuko.com/api/v1/shrink
 *   prefixes:
 *     https://example.com/ns#: ex
 *   skips:
 *     - https://linked.data.gov.au/dataset
 * labels:
 *   predicates: [http://www.w3.org/2004/02/skos/core#prefLabel]
 *   federation:
 *     uriPrefix: http://linked.data.gov.au/def/tern-cv/
 *     serviceEndpoint: https://graphdb.tern.org.au/repositories/tern_vocabs_core
 * profiles:
 *   supplementaryEndpoint: https://graphdb.tern.org.au/repositories/dawe_vocabs_core
 * viewers:
 *   - id: nrm
 *     sparqlEndpoint: https://graphdb.tern.org.au/repositories/dawe_vocabs_core
 *     scheme: https://linked.data.gov.au/def/nrm
 * ontologies:
 *   - id: tern-ontology
 *     sparqlEndpoint: https://graphdb.tern.org.au/repositories/knowledge_graph_core
 *     namedGraph: https://w3id.org/tern/ontologies/tern/
 * ```
 *
 * Every section is optional; missing sections take the built-in defaults.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::errors::{Result, ViewerError};
use crate::sparql::iri;

const DAWE_VOCABS: &str = "https://graphdb.tern.org.au/repositories/dawe_vocabs_core";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub sparql: SparqlSettings,
    pub curie: CurieSettings,
    pub labels: LabelSettings,
    pub profiles: ProfileSettings,
    pub viewers: Vec<ViewerConfig>,
    pub ontologies: Vec<OntologyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SparqlSettings {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CurieSettings {
    /// Prefix lookup service; `None` disables remote lookups
    pub shrink_service: Option<String>,
    /// Extra namespace -> prefix entries on top of the built-in table
    pub prefixes: BTreeMap<String, String>,
    /// Namespaces never sent to the shrink service
    pub skips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSettings {
    /// Labelling predicates, most preferred first
    pub predicates: Vec<String>,
    pub federation: Option<LabelFederation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabelFederation {
    pub uri_prefix: String,
    pub service_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSettings {
    /// Endpoint holding the metadata joined in by profile augmentations.
    /// Falls back to the endpoint of the request when absent.
    pub supplementary_endpoint: Option<String>,
}

/// A named entrypoint into a set of vocabularies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    pub id: String,
    pub sparql_endpoint: String,
    /// Resource whose `dcterms:hasPart` members are listed
    pub scheme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OntologyConfig {
    pub id: String,
    pub sparql_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_graph: Option<String>,
}

impl Default for SparqlSettings {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

impl Default for CurieSettings {
    fn default() -> Self {
        Self {
            shrink_service: Some("https://prefix.zazuko.com/api/v1/shrink".to_string()),
            prefixes: BTreeMap::new(),
            skips: vec![
                "https://linked.data.gov.au/def/nrm".to_string(),
                "https://linked.data.gov.au/def/test/dawe-cv".to_string(),
                "http://linked.data.gov.au/dataset".to_string(),
                "https://linked.data.gov.au/dataset".to_string(),
            ],
        }
    }
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            predicates: vec![
                "http://www.w3.org/2004/02/skos/core#prefLabel".to_string(),
                "http://www.w3.org/2000/01/rdf-schema#label".to_string(),
                "http://purl.org/dc/terms/title".to_string(),
                "https://schema.org/name".to_string(),
                "http://schema.org/name".to_string(),
                "http://purl.org/dc/terms/identifier".to_string(),
            ],
            federation: Some(LabelFederation {
                uri_prefix: "http://linked.data.gov.au/def/tern-cv/".to_string(),
                service_endpoint: "https://graphdb.tern.org.au/repositories/tern_vocabs_core"
                    .to_string(),
            }),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sparql: SparqlSettings::default(),
            curie: CurieSettings::default(),
            labels: LabelSettings::default(),
            profiles: ProfileSettings {
                supplementary_endpoint: Some(DAWE_VOCABS.to_string()),
            },
            viewers: vec![ViewerConfig {
                id: "nrm".to_string(),
                sparql_endpoint: DAWE_VOCABS.to_string(),
                scheme: "https://linked.data.gov.au/def/nrm".to_string(),
            }],
            ontologies: vec![OntologyConfig {
                id: "tern-ontology".to_string(),
                sparql_endpoint: "https://graphdb.tern.org.au/repositories/knowledge_graph_core"
                    .to_string(),
                named_graph: Some("https://w3id.org/tern/ontologies/tern/".to_string()),
            }],
        }
    }
}

impl Config {
    /// Load a YAML config file
    ///
    /// # Example
    /// ```no_run
    /// use ld_viewer::Config;
    ///
    /// let config = Config::load("ld-viewer.yaml")?;
    /// # Ok::<(), ld_viewer::ViewerError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ViewerError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Ensure every configured endpoint and URI can be used in a query
    pub fn validate(&self) -> Result<()> {
        if self.sparql.timeout_secs == 0 {
            return Err(ViewerError::Config("sparql.timeoutSecs must be positive".to_string()));
        }

        if self.labels.predicates.is_empty() {
            return Err(ViewerError::Config(
                "labels.predicates must name at least one predicate".to_string(),
            ));
        }

        let mut uris: Vec<&str> = self.labels.predicates.iter().map(String::as_str).collect();
        if let Some(federation) = &self.labels.federation {
            uris.push(&federation.service_endpoint);
        }
        if let Some(endpoint) = &self.profiles.supplementary_endpoint {
            uris.push(endpoint);
        }
        for viewer in &self.viewers {
            uris.push(&viewer.sparql_endpoint);
            uris.push(&viewer.scheme);
        }
        for ontology in &self.ontologies {
            uris.push(&ontology.sparql_endpoint);
            if let Some(graph) = &ontology.named_graph {
                uris.push(graph);
            }
        }

        for uri in uris {
            iri(uri).map_err(|_| ViewerError::Config(format!("Invalid URI in config: {}", uri)))?;
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.sparql.timeout_secs)
    }

    pub fn viewer(&self, id: &str) -> Result<&ViewerConfig> {
        self.viewers
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| ViewerError::ViewerNotFound(id.to_string()))
    }

    pub fn ontology(&self, id: &str) -> Result<&OntologyConfig> {
        self.ontologies
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| ViewerError::OntologyNotFound(id.to_string()))
    }
}
