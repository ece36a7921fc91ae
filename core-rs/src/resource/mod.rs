//! RDF resource projection
//!
//! - model: Resource / PredicateGroup / Value
//! - rows: typed rows out of SPARQL bindings
//! - list: RDF List reconstruction
//! - projector: rows -> Resource
//! - viewer: the end-to-end fetch pipeline

pub mod list;
pub mod model;
pub mod projector;
pub mod rows;
pub mod viewer;

pub use list::ListReconstructor;
pub use model::{
    LiteralValue, PredicateGroup, PredicateValues, Resource, SubjectGroup, UriValue, Value,
    ValueKey,
};
pub use projector::{Lookups, Projection};
pub use rows::{IncomingRow, RawRow, RowObject};
pub use viewer::{ResourceViewer, DEFAULT_PAGE_SIZE};
