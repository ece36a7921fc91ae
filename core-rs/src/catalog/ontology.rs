//! Ontology viewer: flat list of the classes targeted by SHACL shapes

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OntologyConfig;
use crate::errors::Result;
use crate::sparql::results::required;
use crate::sparql::{SparqlClient, SparqlQuery};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassItem {
    pub id: String,
    pub label: String,
}

pub async fn list_ontology_classes(client: &SparqlClient, ontology: &OntologyConfig) -> Result<Vec<ClassItem>> {
    debug!(ontology = %ontology.id, "Listing ontology classes");
    let query = SparqlQuery::ontology_classes(ontology.named_graph.as_deref())?;
    let results = client.post(&query, &ontology.sparql_endpoint).await?;

    results
        .bindings()?
        .iter()
        .map(|row| {
            Ok(ClassItem {
                id: required(row, "id")?.value.clone(),
                label: required(row, "label")?.value.clone(),
            })
        })
        .collect()
}
