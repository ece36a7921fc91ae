//! Viewer entrypoints: paginated listing of the vocabularies in a scheme

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ViewerConfig;
use crate::errors::Result;
use crate::sparql::results::{optional_value, required};
use crate::sparql::{SparqlClient, SparqlQuery};

pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntrypointItem {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntrypointItems {
    pub items: Vec<EntrypointItem>,
    pub more_pages_exists: bool,
    pub items_count: usize,
    pub limit: usize,
    pub total_pages: usize,
}

pub fn ceiling_division(a: usize, b: usize) -> usize {
    if b == 0 {
        0
    } else {
        (a + b - 1) / b
    }
}

/// Concept schemes and collections under the viewer's scheme, one page of
/// `PAGE_SIZE`, ordered by label. `page` is 1-based and clamped to 1.
pub async fn list_vocabularies(client: &SparqlClient, viewer: &ViewerConfig, page: usize) -> Result<EntrypointItems> {
    let page = page.max(1);
    let offset = (page - 1).saturating_mul(PAGE_SIZE);
    debug!(viewer = %viewer.id, page, "Listing vocabularies");

    let items_query = SparqlQuery::vocabularies(&viewer.scheme, PAGE_SIZE, offset)?;
    let count_query = SparqlQuery::vocabulary_count(&viewer.scheme)?;
    let (results, count) = tokio::try_join!(
        client.post(&items_query, &viewer.sparql_endpoint),
        client.count(&count_query, &viewer.sparql_endpoint)
    )?;

    let mut items = Vec::new();
    for row in results.bindings()? {
        items.push(EntrypointItem {
            id: required(row, "uri")?.value.clone(),
            label: required(row, "label")?.value.clone(),
            description: optional_value(row, "description"),
            created: optional_value(row, "created"),
            modified: optional_value(row, "modified"),
        });
    }

    Ok(EntrypointItems {
        items,
        more_pages_exists: count > page.saturating_mul(PAGE_SIZE),
        items_count: count,
        limit: PAGE_SIZE,
        total_pages: ceiling_division(count, PAGE_SIZE),
    })
}
