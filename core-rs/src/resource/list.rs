/**
 * list.rs
 * RDF List reconstruction
 *
 * A plain `?p ?o` query returns the blank-node head of an RDF List rather than
 * its members. For every predicate with a list head, the members are fetched
 * in chain order and appended as extra rows carrying their zero-based
 * position. The head rows stay in place; blank-node objects are dropped
 * later by the projector.
 */

use tracing::debug;

use super::rows::{RawRow, RowObject};
use crate::errors::{Result, ViewerError};
use crate::sparql::results::required;
use crate::sparql::{SparqlClient, SparqlQuery};

#[derive(Clone)]
pub struct ListReconstructor {
    client: SparqlClient,
}

impl ListReconstructor {
    pub fn new(client: SparqlClient) -> Self {
        Self { client }
    }

    /// Predicates holding at least one list head, in first-seen order
    pub fn list_predicates(rows: &[RawRow]) -> Vec<String> {
        let mut predicates: Vec<String> = Vec::new();
        for row in rows.iter().filter(|r| r.is_list_head()) {
            if !predicates.contains(&row.predicate) {
                predicates.push(row.predicate.clone());
            }
        }
        predicates
    }

    /// Append one row per list member to `rows`
    pub async fn expand(&self, subject: &str, rows: &mut Vec<RawRow>, endpoint: &str) -> Result<()> {
        for predicate in Self::list_predicates(rows) {
            let members = self.members(subject, &predicate, endpoint).await?;
            debug!(subject, predicate = %predicate, count = members.len(), "Expanded RDF List");
            rows.extend(members);
        }
        Ok(())
    }

    /// Members of the list(s) under `<subject> <predicate>`, as rows
    pub async fn members(&self, subject: &str, predicate: &str, endpoint: &str) -> Result<Vec<RawRow>> {
        let query = SparqlQuery::list_items(subject, predicate)?;
        let results = self.client.post(&query, endpoint).await?;

        let mut members = Vec::new();
        for row in results.bindings()? {
            let object = RowObject::from_term(required(row, "o")?)?;
            let index = &required(row, "index")?.value;
            let index = index.parse::<usize>().map_err(|_| {
                ViewerError::MalformedResult(format!("list index is not a position: {}", index))
            })?;

            members.push(RawRow {
                predicate: predicate.to_string(),
                object,
                list_item: true,
                list_item_index: Some(index),
            });
        }
        Ok(members)
    }
}
