//! Type-keyed presentation profiles
//!
//! - registry: profile tables, registration and dispatch
//! - method: the TERN MethodCollection / Method profiles

pub mod method;
pub mod registry;

pub use registry::{Augmentation, Pick, ProfileDefinition, ProfileRegistry, ProfileSpec};
