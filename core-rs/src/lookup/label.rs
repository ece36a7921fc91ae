//! Label resolution
//!
//! One batch query fetches every candidate label for a set of URIs. The
//! winner per URI is chosen here rather than in SPARQL: the label of the most
//! preferred predicate, ties broken by the smallest label.

use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::config::{LabelFederation, LabelSettings};
use crate::errors::Result;
use crate::sparql::results::required;
use crate::sparql::{SparqlClient, SparqlQuery};

#[derive(Clone)]
pub struct LabelResolver {
    client: SparqlClient,
    predicates: Vec<String>,
    federation: Option<LabelFederation>,
}

impl LabelResolver {
    pub fn new(client: SparqlClient, settings: &LabelSettings) -> Self {
        Self {
            client,
            predicates: settings.predicates.clone(),
            federation: settings.federation.clone(),
        }
    }

    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    fn rank(&self, predicate: &str) -> usize {
        self.predicates
            .iter()
            .position(|p| p == predicate)
            .unwrap_or(self.predicates.len())
    }

    /// Best label of a single URI
    pub async fn label(&self, uri: &str, endpoint: &str) -> Result<Option<String>> {
        let mut labels = self.labels(&[uri.to_string()], endpoint).await?;
        Ok(labels.remove(uri))
    }

    /// Best label per URI; URIs without any label are absent from the map
    pub async fn labels(&self, uris: &[String], endpoint: &str) -> Result<HashMap<String, String>> {
        let uris: Vec<String> = uris
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if uris.is_empty() {
            return Ok(HashMap::new());
        }

        let federated: Vec<String> = match &self.federation {
            Some(federation) => uris
                .iter()
                .filter(|uri| uri.starts_with(&federation.uri_prefix))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        let service = self
            .federation
            .as_ref()
            .map(|f| (f.service_endpoint.as_str(), federated.as_slice()));

        debug!(count = uris.len(), federated = federated.len(), "Resolving labels");
        let query = SparqlQuery::labels(&uris, &self.predicates, service)?;
        let results = self.client.post(&query, endpoint).await?;

        let mut best: HashMap<String, (usize, String)> = HashMap::new();
        for row in results.bindings()? {
            let uri = &required(row, "uri")?.value;
            let rank = self.rank(&required(row, "labelProperty")?.value);
            let label = &required(row, "label")?.value;

            let better = match best.get(uri) {
                Some((best_rank, best_label)) => (rank, label) < (*best_rank, best_label),
                None => true,
            };
            if better {
                best.insert(uri.clone(), (rank, label.clone()));
            }
        }

        Ok(best
            .into_iter()
            .map(|(uri, (_, label))| (uri, label))
            .collect())
    }
}
