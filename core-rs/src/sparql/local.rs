/**
 * local.rs
 * In-process SPARQL endpoints backed by oxigraph
 *
 * Each endpoint URL maps to its own in-memory store loaded from Turtle.
 * Answers are rendered in the SPARQL JSON results format so callers cannot
 * tell them apart from a remote triplestore.
 */

use async_trait::async_trait;
use oxigraph::io::RdfFormat;
use oxigraph::sparql::results::QueryResultsFormat;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::client::SparqlTransport;
use crate::errors::{Result, ViewerError};

#[derive(Default)]
pub struct LocalTransport {
    stores: HashMap<String, Store>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `load_turtle`
    pub fn with_turtle(mut self, endpoint: &str, turtle: &str) -> Result<Self> {
        self.load_turtle(endpoint, turtle)?;
        Ok(self)
    }

    /// Load Turtle into the default graph of the store serving `endpoint`
    pub fn load_turtle(&mut self, endpoint: &str, turtle: &str) -> Result<()> {
        if !self.stores.contains_key(endpoint) {
            let store = Store::new()
                .map_err(|e| ViewerError::Config(format!("Failed to create store: {}", e)))?;
            self.stores.insert(endpoint.to_string(), store);
        }

        let store = &self.stores[endpoint];
        store
            .load_from_reader(RdfFormat::Turtle, turtle.as_bytes())
            .map_err(|e| ViewerError::Config(format!("Failed to load Turtle for {}: {}", endpoint, e)))?;

        Ok(())
    }

    pub fn load_file(&mut self, endpoint: &str, path: &Path) -> Result<()> {
        debug!(endpoint, path = %path.display(), "Loading Turtle file");
        let content = fs::read_to_string(path)?;
        self.load_turtle(endpoint, &content)
    }

    pub fn endpoints(&self) -> Vec<String> {
        let mut endpoints: Vec<String> = self.stores.keys().cloned().collect();
        endpoints.sort();
        endpoints
    }

    fn evaluate(&self, query: &str, endpoint: &str) -> Result<String> {
        let store = self.stores.get(endpoint).ok_or_else(|| {
            ViewerError::request(format!("Unknown repository: {}", endpoint))
        })?;

        let results = store
            .query(query)
            .map_err(|e| ViewerError::request(format!("Query evaluation failed: {}", e)))?;

        // CONSTRUCT/DESCRIBE answers are not SPARQL JSON results
        if let QueryResults::Graph(_) = results {
            return Err(ViewerError::request(
                "Graph results are not supported by the local endpoint",
            ));
        }

        let body = results
            .write(Vec::new(), QueryResultsFormat::Json)
            .map_err(|e| ViewerError::request(format!("Failed to render results: {}", e)))?;
        String::from_utf8(body)
            .map_err(|e| ViewerError::request(format!("Results are not UTF-8: {}", e)))
    }
}

#[async_trait]
impl SparqlTransport for LocalTransport {
    async fn post(&self, query: &str, endpoint: &str, _accept: &str) -> Result<String> {
        self.evaluate(query, endpoint)
    }

    async fn get(&self, query: &str, endpoint: &str, _accept: &str) -> Result<String> {
        self.evaluate(query, endpoint)
    }
}
