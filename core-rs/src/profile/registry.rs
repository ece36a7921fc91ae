//! Profile registry
//!
//! A profile reshapes the property list of resources of one RDF type:
//! picked predicates move to the front in pick order, omitted picks are
//! dropped, and augmented predicates are appended as empty groups whose values
//! are fetched on demand. A profile may be layered on a base profile; the
//! base's picks and augmentations come first and are resolved when the
//! profile is registered.

use std::collections::HashMap;
use tracing::debug;

use crate::errors::{Result, ViewerError};
use crate::resource::model::{PredicateGroup, UriValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub predicate: String,
    /// Relocated then discarded
    pub omit: bool,
}

impl Pick {
    pub fn keep(predicate: &str) -> Self {
        Self {
            predicate: predicate.to_string(),
            omit: false,
        }
    }

    pub fn omit(predicate: &str) -> Self {
        Self {
            predicate: predicate.to_string(),
            omit: true,
        }
    }
}

/// A synthetic predicate whose values live in externally modelled metadata:
/// `?meta <link_predicate> <resource> ; <metadata_predicate> ?value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Augmentation {
    pub predicate: String,
    /// Display label of the synthetic predicate
    pub label: String,
    pub link_predicate: String,
    pub metadata_predicate: String,
}

/// What a caller registers
#[derive(Debug, Clone, Default)]
pub struct ProfileSpec {
    pub uri: String,
    /// Profile whose table is layered underneath this one
    pub base: Option<String>,
    pub picks: Vec<Pick>,
    pub augmentations: Vec<Augmentation>,
}

/// A registered profile with its base already folded in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDefinition {
    pub uri: String,
    pub picks: Vec<Pick>,
    pub augmentations: Vec<Augmentation>,
}

impl ProfileDefinition {
    pub fn augmentation(&self, predicate: &str) -> Option<&Augmentation> {
        self.augmentations.iter().find(|a| a.predicate == predicate)
    }

    /// Augmented predicates the resource does not state itself. A resource's
    /// own statements take precedence over the metadata join, so only these
    /// need the profile to fetch their values.
    pub fn properties_require_profile_for(&self, properties: &[PredicateGroup]) -> Vec<String> {
        self.augmentations
            .iter()
            .filter(|a| !properties.iter().any(|g| g.predicate.value == a.predicate))
            .map(|a| a.predicate.clone())
            .collect()
    }

    /// Reorder `properties`: picks first in pick order (omitted ones dropped),
    /// everything else after in its original order, then one empty group per
    /// augmentation.
    pub fn apply(&self, resource_uri: &str, properties: Vec<PredicateGroup>) -> (String, Vec<PredicateGroup>) {
        debug!(resource = resource_uri, profile = %self.uri, "Applying profile");

        let mut remaining: Vec<Option<PredicateGroup>> = properties.into_iter().map(Some).collect();
        let mut reshaped = Vec::with_capacity(remaining.len() + self.augmentations.len());

        for pick in &self.picks {
            let position = remaining.iter().position(
                |slot| matches!(slot, Some(group) if group.predicate.value == pick.predicate),
            );
            if let Some(group) = position.and_then(|i| remaining[i].take()) {
                if !pick.omit {
                    reshaped.push(group);
                }
            }
        }

        reshaped.extend(remaining.into_iter().flatten());

        for augmentation in &self.augmentations {
            if reshaped.iter().any(|g| g.predicate.value == augmentation.predicate) {
                continue;
            }
            reshaped.push(PredicateGroup::new(UriValue::new(
                augmentation.predicate.as_str(),
                augmentation.label.as_str(),
                false,
            )));
        }

        (self.uri.clone(), reshaped)
    }
}

/// Type URI -> profile. Populated at startup, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, ProfileDefinition>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in profiles
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        super::method::register(&mut registry)?;
        Ok(registry)
    }

    /// Register a profile. A base profile must already be registered.
    pub fn register(&mut self, spec: ProfileSpec) -> Result<()> {
        let (mut picks, mut augmentations) = match &spec.base {
            Some(base) => {
                let base = self
                    .profiles
                    .get(base)
                    .ok_or_else(|| ViewerError::ProfileNotFound(base.clone()))?;
                (base.picks.clone(), base.augmentations.clone())
            }
            None => (Vec::new(), Vec::new()),
        };

        picks.extend(spec.picks);
        augmentations.extend(spec.augmentations);

        self.profiles.insert(
            spec.uri.clone(),
            ProfileDefinition {
                uri: spec.uri,
                picks,
                augmentations,
            },
        );
        Ok(())
    }

    pub fn get(&self, uri: &str) -> Option<&ProfileDefinition> {
        self.profiles.get(uri)
    }

    pub fn require(&self, uri: &str) -> Result<&ProfileDefinition> {
        self.get(uri)
            .ok_or_else(|| ViewerError::ProfileNotFound(uri.to_string()))
    }

    /// First type with a registered profile wins
    pub fn resolve(&self, types: &[UriValue]) -> Option<&ProfileDefinition> {
        types.iter().find_map(|t| self.profiles.get(&t.value))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
