//! Catalog listings
//!
//! - entrypoint: vocabularies of a configured viewer
//! - ontology: classes of a configured ontology

pub mod entrypoint;
pub mod ontology;

pub use entrypoint::{list_vocabularies, EntrypointItem, EntrypointItems, PAGE_SIZE};
pub use ontology::{list_ontology_classes, ClassItem};
