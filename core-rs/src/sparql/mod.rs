/**
 * sparql module
 *
 * - results: SPARQL JSON results model
 * - query: query builders (URIs validated before interpolation)
 * - client: transport trait, HTTP transport, typed client
 * - local: oxigraph-backed in-process endpoints
 */

pub mod client;
pub mod local;
pub mod query;
pub mod results;

pub use client::{HttpTransport, SparqlClient, SparqlTransport, SPARQL_RESULTS_JSON};
pub use local::LocalTransport;
pub use query::{iri, SparqlQuery, RDF_TYPE};
pub use results::{Binding, RdfTerm, SparqlResults};
