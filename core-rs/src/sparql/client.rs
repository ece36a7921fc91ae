//! SPARQL protocol client
//!
//! `SparqlTransport` is the seam between the viewer and a triplestore:
//! - HttpTransport: SPARQL 1.1 protocol over HTTP (reqwest)
//! - LocalTransport: in-memory oxigraph stores (see `local.rs`)
//!
//! Nothing here retries. A failed call fails the whole operation.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::query::SparqlQuery;
use super::results::{required, SparqlResults};
use crate::errors::{Result, ViewerError};

pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

#[async_trait]
pub trait SparqlTransport: Send + Sync {
    /// Send `query` as the body of a POST request and return the response body
    async fn post(&self, query: &str, endpoint: &str, accept: &str) -> Result<String>;

    /// Send `query` as the `query` URL parameter of a GET request
    async fn get(&self, query: &str, endpoint: &str, accept: &str) -> Result<String>;
}

/// SPARQL 1.1 protocol over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ViewerError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn read(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ViewerError::request(e.to_string()))?;

        if !status.is_success() {
            let description = if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                body
            };
            return Err(ViewerError::Request { description });
        }

        Ok(body)
    }
}

#[async_trait]
impl SparqlTransport for HttpTransport {
    async fn post(&self, query: &str, endpoint: &str, accept: &str) -> Result<String> {
        let response = self
            .client
            .post(endpoint)
            .header(reqwest::header::ACCEPT, accept)
            .header(reqwest::header::CONTENT_TYPE, "application/sparql-query")
            .body(query.to_string())
            .send()
            .await
            .map_err(|e| ViewerError::request(e.to_string()))?;

        Self::read(response).await
    }

    async fn get(&self, query: &str, endpoint: &str, accept: &str) -> Result<String> {
        let response = self
            .client
            .get(endpoint)
            .header(reqwest::header::ACCEPT, accept)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| ViewerError::request(e.to_string()))?;

        Self::read(response).await
    }
}

/// Typed access to a SPARQL endpoint through any transport
#[derive(Clone)]
pub struct SparqlClient {
    transport: Arc<dyn SparqlTransport>,
}

impl SparqlClient {
    pub fn new(transport: Arc<dyn SparqlTransport>) -> Self {
        Self { transport }
    }

    pub fn http(timeout: Duration) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(timeout)?)))
    }

    /// POST a query and parse the SPARQL JSON answer
    pub async fn post(&self, query: &SparqlQuery, endpoint: &str) -> Result<SparqlResults> {
        debug!(endpoint, "POST SPARQL query");
        let body = self
            .transport
            .post(query.as_str(), endpoint, SPARQL_RESULTS_JSON)
            .await?;
        SparqlResults::from_json(&body)
    }

    /// GET a query and parse the SPARQL JSON answer
    pub async fn get(&self, query: &SparqlQuery, endpoint: &str) -> Result<SparqlResults> {
        debug!(endpoint, "GET SPARQL query");
        let body = self
            .transport
            .get(query.as_str(), endpoint, SPARQL_RESULTS_JSON)
            .await?;
        SparqlResults::from_json(&body)
    }

    pub async fn ask(&self, query: &SparqlQuery, endpoint: &str) -> Result<bool> {
        self.post(query, endpoint).await?.ask()
    }

    /// Run a `SELECT (COUNT(...) AS ?count)` query
    pub async fn count(&self, query: &SparqlQuery, endpoint: &str) -> Result<usize> {
        let results = self.post(query, endpoint).await?;
        let rows = results.bindings()?;
        let row = rows
            .first()
            .ok_or_else(|| ViewerError::MalformedResult("count query returned no rows".to_string()))?;
        let value = &required(row, "count")?.value;
        value.parse::<usize>().map_err(|_| {
            ViewerError::MalformedResult(format!("count is not a non-negative integer: {}", value))
        })
    }
}
