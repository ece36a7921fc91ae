/**
 * viewer.rs
 * Resource viewer: the pipeline behind `get_resource` and
 * `get_predicate_values`
 *
 * outgoing rows -> list reconstruction -> label/internal/curie lookups
 *   -> projection -> profile
 *
 * Nothing is retried; the first failed collaborator call fails the request.
 */

use std::sync::Arc;
use tracing::{debug, info};

use super::list::ListReconstructor;
use super::model::{PredicateValues, Resource};
use super::projector::{self, Lookups};
use super::rows::{IncomingRow, RawRow, RowObject};
use crate::config::{Config, LabelSettings};
use crate::errors::Result;
use crate::lookup::{CurieResolver, InternalResourceIndex, LabelResolver};
use crate::profile::ProfileRegistry;
use crate::sparql::results::required;
use crate::sparql::{iri, SparqlClient, SparqlQuery, SparqlResults};

/// Page size of `get_predicate_values` when the caller gives none
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Clone)]
pub struct ResourceViewer {
    client: SparqlClient,
    curies: Arc<CurieResolver>,
    labels: LabelResolver,
    internal: InternalResourceIndex,
    lists: ListReconstructor,
    profiles: Arc<ProfileRegistry>,
    supplementary_endpoint: Option<String>,
}

impl ResourceViewer {
    pub fn new(
        client: SparqlClient,
        curies: Arc<CurieResolver>,
        label_settings: &LabelSettings,
        profiles: Arc<ProfileRegistry>,
    ) -> Self {
        Self {
            labels: LabelResolver::new(client.clone(), label_settings),
            internal: InternalResourceIndex::new(client.clone()),
            lists: ListReconstructor::new(client.clone()),
            client,
            curies,
            profiles,
            supplementary_endpoint: None,
        }
    }

    /// Viewer with the configured CURIE resolver and the built-in profiles
    pub fn from_config(config: &Config, client: SparqlClient) -> Result<Self> {
        let curies = Arc::new(CurieResolver::from_settings(&config.curie, config.timeout())?);
        let profiles = Arc::new(ProfileRegistry::builtin()?);
        Ok(Self::new(client, curies, &config.labels, profiles)
            .with_supplementary_endpoint(config.profiles.supplementary_endpoint.clone()))
    }

    /// Endpoint queried for profile augmentation values; `None` uses the
    /// endpoint of the request
    pub fn with_supplementary_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.supplementary_endpoint = endpoint;
        self
    }

    pub fn curies(&self) -> &CurieResolver {
        &self.curies
    }

    pub fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }

    async fn lookups(&self, uris: &[String], curie_uris: &[String], endpoint: &str) -> Result<Lookups> {
        let (labels, internal) = tokio::try_join!(
            self.labels.labels(uris, endpoint),
            self.internal.lookup(uris, endpoint)
        )?;
        let curies = self
            .curies
            .resolve_all(curie_uris.iter().map(String::as_str))
            .await;

        Ok(Lookups {
            labels,
            internal,
            curies,
        })
    }

    async fn incoming_rows(&self, uri: &str, endpoint: &str) -> Result<Vec<IncomingRow>> {
        let results = self
            .client
            .post(&SparqlQuery::incoming(uri)?, endpoint)
            .await?;
        results
            .bindings()?
            .iter()
            .map(IncomingRow::from_binding)
            .collect()
    }

    /// Fetch and project a resource.
    ///
    /// Fails with `NotFound` when `uri` is not a subject in the graph behind
    /// `endpoint`.
    pub async fn get_resource(&self, uri: &str, endpoint: &str, include_incoming: bool) -> Result<Resource> {
        iri(uri)?;
        iri(endpoint)?;
        info!(uri, endpoint, include_incoming, "Fetching resource");

        let results = self
            .client
            .post(&SparqlQuery::outgoing(uri)?, endpoint)
            .await?;
        let mut rows = RawRow::from_bindings(results.bindings()?)?;
        self.lists.expand(uri, &mut rows, endpoint).await?;

        let incoming = if include_incoming {
            self.incoming_rows(uri, endpoint).await?
        } else {
            Vec::new()
        };

        let mut uris = projector::referenced_uris(uri, &rows);
        let mut curie_uris = projector::curie_candidates(&rows);
        let incoming_uris = projector::incoming_uris(&incoming);
        uris.extend(incoming_uris.iter().cloned());
        curie_uris.extend(incoming_uris);

        let lookups = self.lookups(&uris, &curie_uris, endpoint).await?;
        let projection = projector::project(uri, &rows, &lookups)?;

        let (profile, properties, properties_require_profile) =
            match self.profiles.resolve(&projection.types) {
                Some(definition) => {
                    let require_profile = definition.properties_require_profile_for(&projection.properties);
                    let (profile, properties) = definition.apply(uri, projection.properties);
                    (profile, properties, require_profile)
                }
                None => (String::new(), projection.properties, Vec::new()),
            };

        Ok(Resource {
            uri: uri.to_string(),
            profile,
            label: projection.label,
            types: projection.types,
            properties,
            incoming_properties: projector::project_incoming(&incoming, &lookups),
            properties_require_profile,
        })
    }

    /// One page of the values of `predicate` on `uri`.
    ///
    /// With `profile` set and `predicate` augmented by that profile, values
    /// come from the profile's metadata join, unless the resource states
    /// `predicate` itself; its own statements take precedence. `page` is
    /// 1-based; `page` and `limit` are clamped to 1.
    ///
    /// Pages are cut by the store, ordered by each value's most preferred
    /// label and then its lexical form, and only the page's URIs are looked
    /// up. RDF List members keep their chain order, so list-structured
    /// predicates are fetched whole and paged in memory.
    pub async fn get_predicate_values(
        &self,
        uri: &str,
        predicate: &str,
        endpoint: &str,
        profile: Option<&str>,
        limit: usize,
        page: usize,
    ) -> Result<PredicateValues> {
        iri(uri)?;
        iri(predicate)?;
        iri(endpoint)?;
        let limit = limit.max(1);
        let page = page.max(1);
        let offset = (page - 1).saturating_mul(limit);

        let augmentation = match profile.filter(|p| !p.is_empty()) {
            Some(profile) => self.profiles.require(profile)?.augmentation(predicate).cloned(),
            None => None,
        };
        let augmentation = match augmentation {
            Some(augmentation) => {
                let stated = self
                    .client
                    .ask(&SparqlQuery::has_values(uri, predicate)?, endpoint)
                    .await?;
                if stated {
                    debug!(uri, predicate, "Resource states augmented predicate itself");
                    None
                } else {
                    Some(augmentation)
                }
            }
            None => None,
        };

        let (objects, count) = match augmentation {
            Some(augmentation) => {
                let source = self.supplementary_endpoint.as_deref().unwrap_or(endpoint);
                debug!(uri, predicate, source, "Fetching augmented predicate values");

                let values_query = SparqlQuery::linked_metadata_values(
                    uri,
                    &augmentation.link_predicate,
                    &augmentation.metadata_predicate,
                    self.labels.predicates(),
                    limit,
                    offset,
                )?;
                let count_query = SparqlQuery::linked_metadata_count(
                    uri,
                    &augmentation.link_predicate,
                    &augmentation.metadata_predicate,
                )?;
                let (results, count) = tokio::try_join!(
                    self.client.post(&values_query, source),
                    self.client.count(&count_query, source)
                )?;

                let rows = page_rows(predicate, &results)?;
                let lookups = self.row_lookups(&rows, source).await?;
                (projector::project_ordered(&rows, &lookups), count)
            }
            None => {
                let list_query = SparqlQuery::has_list_values(uri, predicate)?;
                let count_query = SparqlQuery::predicate_value_count(uri, predicate)?;
                let (is_list, count) = tokio::try_join!(
                    self.client.ask(&list_query, endpoint),
                    self.client.count(&count_query, endpoint)
                )?;

                if is_list {
                    debug!(uri, predicate, "Paging list-structured predicate in memory");
                    let results = self
                        .client
                        .post(&SparqlQuery::outgoing_for_predicate(uri, predicate)?, endpoint)
                        .await?;
                    let mut rows = RawRow::from_bindings(results.bindings()?)?;
                    self.lists.expand(uri, &mut rows, endpoint).await?;

                    let lookups = self.row_lookups(&rows, endpoint).await?;
                    let objects = projector::project_objects(&rows, &lookups)
                        .into_iter()
                        .skip(offset)
                        .take(limit)
                        .collect();
                    (objects, count)
                } else {
                    let query = SparqlQuery::predicate_values_page(
                        uri,
                        predicate,
                        self.labels.predicates(),
                        limit,
                        offset,
                    )?;
                    let results = self.client.post(&query, endpoint).await?;

                    let rows = page_rows(predicate, &results)?;
                    let lookups = self.row_lookups(&rows, endpoint).await?;
                    (projector::project_ordered(&rows, &lookups), count)
                }
            }
        };

        Ok(PredicateValues {
            uri: uri.to_string(),
            predicate: predicate.to_string(),
            count,
            objects,
        })
    }

    /// Lookups for the URI objects of `rows` only
    async fn row_lookups(&self, rows: &[RawRow], endpoint: &str) -> Result<Lookups> {
        let uris: Vec<String> = rows
            .iter()
            .filter_map(|r| r.object.as_uri())
            .map(str::to_string)
            .collect();
        self.lookups(&uris, &uris, endpoint).await
    }
}

/// `?o` of each result row as a plain value of `predicate`
fn page_rows(predicate: &str, results: &SparqlResults) -> Result<Vec<RawRow>> {
    results
        .bindings()?
        .iter()
        .map(|row| {
            Ok(RawRow {
                predicate: predicate.to_string(),
                object: RowObject::from_term(required(row, "o")?)?,
                list_item: false,
                list_item_index: None,
            })
        })
        .collect()
}
