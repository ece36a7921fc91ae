//! CURIE resolution
//!
//! Maps a URI to `prefix:localname`:
//! 1. Prefix table (built-in entries plus everything learned at runtime)
//! 2. Negative cache of URIs nobody could shorten
//! 3. Skip list of namespaces never worth asking about
//! 4. External shrink service; the answer is cached either way
//!
//! Resolution never fails. When no prefix is known the URI itself comes back.
//! The prefix table and negative cache are shared by every request.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::CurieSettings;
use crate::errors::{Result, ViewerError};

/// Namespaces known without asking anyone
pub const BUILTIN_PREFIXES: &[(&str, &str)] = &[
    ("http://purl.org/dc/terms/", "dcterms"),
    ("http://www.w3.org/2004/02/skos/core#", "skos"),
    ("http://www.w3.org/2000/01/rdf-schema#", "rdfs"),
    ("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "rdf"),
    ("https://schema.org/", "schema"),
    ("https://w3id.org/tern/ontologies/tern/", "tern"),
    ("http://www.w3.org/2002/07/owl#", "owl"),
    ("http://www.w3.org/2001/XMLSchema#", "xsd"),
    ("http://rdfs.org/ns/void#", "void"),
    ("http://www.w3.org/ns/prov#", "prov"),
    ("http://www.w3.org/ns/shacl#", "sh"),
];

/// Remote lookup of a prefix for a namespace
#[async_trait]
pub trait PrefixShrinker: Send + Sync {
    /// `Ok(None)` when the service has no prefix for `namespace`
    async fn shrink(&self, namespace: &str) -> Result<Option<String>>;
}

/// Client for a prefix.zazuko.com style shrink API
pub struct HttpShrinker {
    client: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct ShrinkResponse {
    value: String,
}

impl HttpShrinker {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ViewerError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PrefixShrinker for HttpShrinker {
    async fn shrink(&self, namespace: &str) -> Result<Option<String>> {
        let response = self
            .client
            .post(&self.url)
            .query(&[("q", namespace)])
            .send()
            .await
            .map_err(|e| ViewerError::request(e.to_string()))?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let body: ShrinkResponse = response
            .json()
            .await
            .map_err(|e| ViewerError::MalformedResult(format!("shrink service: {}", e)))?;

        // The service answers with the prefix and its colon, e.g. "schema:"
        let prefix = body.value.trim_end_matches(':');
        if prefix.is_empty() {
            Ok(None)
        } else {
            Ok(Some(prefix.to_string()))
        }
    }
}

pub struct CurieResolver {
    /// namespace -> prefix
    prefixes: RwLock<HashMap<String, String>>,
    not_found: RwLock<HashSet<String>>,
    skips: Vec<String>,
    shrinker: Option<Arc<dyn PrefixShrinker>>,
}

impl CurieResolver {
    /// Resolver with the built-in prefix table and no skip list
    pub fn new(shrinker: Option<Arc<dyn PrefixShrinker>>) -> Self {
        let prefixes = BUILTIN_PREFIXES
            .iter()
            .map(|(ns, prefix)| (ns.to_string(), prefix.to_string()))
            .collect();

        Self {
            prefixes: RwLock::new(prefixes),
            not_found: RwLock::new(HashSet::new()),
            skips: Vec::new(),
            shrinker,
        }
    }

    pub fn from_settings(settings: &CurieSettings, timeout: Duration) -> Result<Self> {
        let shrinker: Option<Arc<dyn PrefixShrinker>> = match &settings.shrink_service {
            Some(url) => Some(Arc::new(HttpShrinker::new(url.clone(), timeout)?)),
            None => None,
        };

        let mut resolver = Self::new(shrinker).with_skips(settings.skips.clone());
        for (namespace, prefix) in &settings.prefixes {
            resolver = resolver.with_prefix(namespace, prefix);
        }
        Ok(resolver)
    }

    pub fn with_prefix(self, namespace: &str, prefix: &str) -> Self {
        self.insert_prefix(namespace, prefix);
        self
    }

    pub fn with_skips(mut self, skips: Vec<String>) -> Self {
        self.skips = skips;
        self
    }

    /// Text after the last `#`, then after the last `/`
    pub fn local_name(uri: &str) -> &str {
        let after_hash = uri.rsplit('#').next().unwrap_or(uri);
        after_hash.rsplit('/').next().unwrap_or(after_hash)
    }

    fn insert_prefix(&self, namespace: &str, prefix: &str) {
        self.prefixes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(namespace.to_string(), prefix.to_string());
    }

    /// Prefix-table lookup only; the longest matching namespace wins
    pub fn lookup_local(&self, uri: &str) -> Option<String> {
        let prefixes = self.prefixes.read().unwrap_or_else(PoisonError::into_inner);
        prefixes
            .iter()
            .filter(|(namespace, _)| uri.starts_with(namespace.as_str()))
            .max_by_key(|(namespace, _)| namespace.len())
            .map(|(_, prefix)| format!("{}:{}", prefix, Self::local_name(uri)))
    }

    fn is_skipped(&self, uri: &str) -> bool {
        self.skips.iter().any(|skip| uri.starts_with(skip.as_str()))
    }

    fn remember_not_found(&self, uri: &str) {
        self.not_found
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uri.to_string());
    }

    pub fn is_known_unresolvable(&self, uri: &str) -> bool {
        self.not_found
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(uri)
    }

    /// Compact form of `uri`, or `uri` itself when no prefix is known
    pub async fn resolve(&self, uri: &str) -> String {
        if let Some(curie) = self.lookup_local(uri) {
            return curie;
        }

        if self.is_known_unresolvable(uri) || self.is_skipped(uri) {
            return uri.to_string();
        }

        let Some(shrinker) = &self.shrinker else {
            self.remember_not_found(uri);
            return uri.to_string();
        };

        let local_name = Self::local_name(uri);
        let namespace = &uri[..uri.len() - local_name.len()];
        // No separator to split on, nothing to ask for
        if namespace.is_empty() {
            self.remember_not_found(uri);
            return uri.to_string();
        }

        info!(uri, "Fetching curie from external service");
        match shrinker.shrink(namespace).await {
            Ok(Some(prefix)) => {
                self.insert_prefix(namespace, &prefix);
                let curie = format!("{}:{}", prefix, local_name);
                info!(uri, curie = %curie, "Curie fetch completed");
                curie
            }
            Ok(None) => {
                self.remember_not_found(uri);
                uri.to_string()
            }
            Err(e) => {
                warn!(uri, error = %e, "Curie lookup failed, using the URI as-is");
                self.remember_not_found(uri);
                uri.to_string()
            }
        }
    }

    /// Resolve each distinct URI once
    pub async fn resolve_all<'a, I>(&self, uris: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out = HashMap::new();
        for uri in uris {
            if !out.contains_key(uri) {
                let curie = self.resolve(uri).await;
                out.insert(uri.to_string(), curie);
            }
        }
        out
    }
}
