//! # ld-viewer - Linked Data Resource Viewer
//!
//! Presents linked-data resources held in SPARQL endpoints as structured JSON:
//! a resource's outgoing (and optionally incoming) statements are fetched,
//! RDF Lists are reconstructed, every referenced URI is labelled and
//! compacted, and the result is grouped, de-duplicated, sorted and shaped by
//! a type-keyed profile.
//!
//! ## Pipeline
//!
//! ```text
//!  SPARQL endpoint
//!        │  ?p ?o ?listItem
//!        ▼
//!  ListReconstructor ──► rdf:rest*/rdf:first members appended as rows
//!        │
//!        ▼
//!  LabelResolver + InternalResourceIndex + CurieResolver
//!        │
//!        ▼
//!  projector ──► types / properties / incoming_properties
//!        │
//!        ▼
//!  ProfileRegistry ──► pick / omit / augment
//!        │
//!        ▼
//!     Resource (JSON)
//! ```

pub mod errors;
pub mod config;
pub mod sparql;
pub mod lookup;
pub mod resource;
pub mod profile;
pub mod catalog;

pub use errors::{Result, ViewerError};
pub use config::{Config, OntologyConfig, ViewerConfig};
pub use sparql::{HttpTransport, LocalTransport, SparqlClient, SparqlQuery, SparqlTransport};
pub use lookup::{CurieResolver, InternalResourceIndex, LabelResolver, PrefixShrinker};
pub use resource::{
    LiteralValue, PredicateGroup, PredicateValues, Resource, ResourceViewer, SubjectGroup,
    UriValue, Value,
};
pub use profile::{ProfileDefinition, ProfileRegistry};
pub use catalog::{list_ontology_classes, list_vocabularies, ClassItem, EntrypointItems};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
