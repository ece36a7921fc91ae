//! Lookup collaborators shared by the resource viewer
//!
//! - curie: URI -> `prefix:localname`, process-wide caches
//! - label: best human label per URI
//! - internal: which URIs resolve within the queried graph

pub mod curie;
pub mod internal;
pub mod label;

pub use curie::{CurieResolver, HttpShrinker, PrefixShrinker, BUILTIN_PREFIXES};
pub use internal::InternalResourceIndex;
pub use label::LabelResolver;
