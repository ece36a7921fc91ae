//! Internal-resource index: which URIs are subjects in the queried graph

use std::collections::{BTreeSet, HashMap};

use crate::errors::Result;
use crate::sparql::results::required;
use crate::sparql::{SparqlClient, SparqlQuery};

#[derive(Clone)]
pub struct InternalResourceIndex {
    client: SparqlClient,
}

impl InternalResourceIndex {
    pub fn new(client: SparqlClient) -> Self {
        Self { client }
    }

    pub async fn lookup(&self, uris: &[String], endpoint: &str) -> Result<HashMap<String, bool>> {
        let uris: Vec<String> = uris
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if uris.is_empty() {
            return Ok(HashMap::new());
        }

        let query = SparqlQuery::internal_resources(&uris)?;
        let results = self.client.post(&query, endpoint).await?;

        let mut index = HashMap::with_capacity(uris.len());
        for row in results.bindings()? {
            let uri = required(row, "uri")?.value.clone();
            let internal = required(row, "internal")?.as_bool();
            index.insert(uri, internal);
        }
        Ok(index)
    }
}
