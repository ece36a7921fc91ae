/**
 * query.rs
 * SPARQL query builders for the resource viewer
 *
 * Every URI interpolated into a query goes through `iri()` first.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, ViewerError};

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

const PREFIXES: &str = r#"
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
PREFIX dcterms: <http://purl.org/dc/terms/>
PREFIX sh: <http://www.w3.org/ns/shacl#>
"#;

static IRI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s<>"{}|\\^`]*$"#).expect("valid IRI regex")
});

/// Validate a URI before it is written between `<` and `>` in a query
pub fn iri(uri: &str) -> Result<&str> {
    if IRI_PATTERN.is_match(uri) {
        Ok(uri)
    } else {
        Err(ViewerError::InvalidUri(uri.to_string()))
    }
}

fn iri_list(uris: &[String]) -> Result<String> {
    let mut out = Vec::with_capacity(uris.len());
    for uri in uris {
        out.push(format!("<{}>", iri(uri)?));
    }
    Ok(out.join(" "))
}

/// `OPTIONAL` label patterns on `?o`, one per label predicate, and the
/// expression picking the most preferred label, else the lexical form of `?o`
fn sort_label(label_predicates: &[String]) -> Result<(String, String)> {
    let mut optionals = Vec::with_capacity(label_predicates.len());
    let mut candidates = Vec::with_capacity(label_predicates.len() + 1);
    for (rank, predicate) in label_predicates.iter().enumerate() {
        optionals.push(format!(
            "OPTIONAL {{ ?o <{}> ?_label{rank} . FILTER(isLiteral(?_label{rank})) }}",
            iri(predicate)?
        ));
        candidates.push(format!("?_label{}", rank));
    }
    candidates.push("?o".to_string());
    Ok((
        optionals.join("\n                "),
        format!("STR(COALESCE({}))", candidates.join(", ")),
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SparqlQuery {
    query: String,
}

impl SparqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Outgoing statements of a resource, flagging objects that head an RDF List.
    /// `?listItemNumber` is a placeholder filled in during list reconstruction.
    pub fn outgoing(uri: &str) -> Result<Self> {
        Ok(Self::new(format!(
            r#"{}
            SELECT ?p ?o ?listItem ?listItemNumber
            WHERE {{
                <{}> ?p ?o .
                BIND(isBlank(?o) && EXISTS {{ ?o rdf:rest ?rest }} AS ?listItem)
                BIND(0 AS ?listItemNumber)
            }}
            "#,
            PREFIXES,
            iri(uri)?
        )))
    }

    /// Outgoing statements of a resource restricted to one predicate
    pub fn outgoing_for_predicate(uri: &str, predicate: &str) -> Result<Self> {
        Ok(Self::new(format!(
            r#"{}
            SELECT ?p ?o ?listItem ?listItemNumber
            WHERE {{
                BIND(<{}> AS ?p)
                <{}> ?p ?o .
                BIND(isBlank(?o) && EXISTS {{ ?o rdf:rest ?rest }} AS ?listItem)
                BIND(0 AS ?listItemNumber)
            }}
            "#,
            PREFIXES,
            iri(predicate)?,
            iri(uri)?
        )))
    }

    /// Statements pointing at a resource from named subjects
    pub fn incoming(uri: &str) -> Result<Self> {
        Ok(Self::new(format!(
            r#"
            SELECT DISTINCT ?p ?s
            WHERE {{
                ?s ?p <{}> .
                FILTER(!isBlank(?s))
            }}
            "#,
            iri(uri)?
        )))
    }

    /// Members of the RDF List(s) reachable from `<uri> <predicate>`, with their
    /// zero-based position. The position is the number of `rdf:rest` hops from
    /// the list head, counted through the intermediate cells.
    pub fn list_items(uri: &str, predicate: &str) -> Result<Self> {
        Ok(Self::new(format!(
            r#"{}
            SELECT ?o (COUNT(?cell) - 1 AS ?index)
            WHERE {{
                <{}> <{}> ?list .
                FILTER(isBlank(?list))
                ?list rdf:rest* ?cell .
                ?cell rdf:rest* ?node .
                ?node rdf:first ?o .
            }}
            GROUP BY ?list ?node ?o
            ORDER BY ?index
            "#,
            PREFIXES,
            iri(uri)?,
            iri(predicate)?
        )))
    }

    /// Candidate labels for a batch of URIs.
    ///
    /// `federated` carries the service endpoint and the subset of `uris` that
    /// should also be looked up there.
    pub fn labels(
        uris: &[String],
        label_predicates: &[String],
        federated: Option<(&str, &[String])>,
    ) -> Result<Self> {
        let predicates = iri_list(label_predicates)?;
        let mut query = format!(
            r#"
            SELECT DISTINCT ?uri ?labelProperty ?label
            WHERE {{
                {{
                    VALUES ?uri {{ {} }}
                    VALUES ?labelProperty {{ {} }}
                    ?uri ?labelProperty ?label .
                }}
            "#,
            iri_list(uris)?,
            predicates
        );

        if let Some((service, federated_uris)) = federated {
            if !federated_uris.is_empty() {
                query.push_str(&format!(
                    r#"
                UNION {{
                    SERVICE <{}> {{
                        VALUES ?uri {{ {} }}
                        VALUES ?labelProperty {{ {} }}
                        ?uri ?labelProperty ?label .
                    }}
                }}
            "#,
                    iri(service)?,
                    iri_list(federated_uris)?,
                    predicates
                ));
            }
        }

        query.push_str(
            r#"
                FILTER(isLiteral(?label))
            }
            "#,
        );
        Ok(Self::new(query))
    }

    /// Whether each URI is the subject of at least one statement
    pub fn internal_resources(uris: &[String]) -> Result<Self> {
        Ok(Self::new(format!(
            r#"
            SELECT DISTINCT ?uri ?internal
            WHERE {{
                VALUES ?uri {{ {} }}
                BIND(EXISTS {{ ?uri ?p ?o }} AS ?internal)
            }}
            "#,
            iri_list(uris)?
        )))
    }

    /// Whether any value of `<uri> <predicate>` heads an RDF List
    pub fn has_list_values(uri: &str, predicate: &str) -> Result<Self> {
        Ok(Self::new(format!(
            r#"{}
            ASK {{
                <{}> <{}> ?list .
                FILTER(isBlank(?list))
                ?list rdf:rest ?rest .
            }}
            "#,
            PREFIXES,
            iri(uri)?,
            iri(predicate)?
        )))
    }

    /// Whether the resource states `predicate` itself
    pub fn has_values(uri: &str, predicate: &str) -> Result<Self> {
        Ok(Self::new(format!(
            r#"
            ASK {{ <{}> <{}> ?o . }}
            "#,
            iri(uri)?,
            iri(predicate)?
        )))
    }

    /// One page of the named and literal values of a predicate, ordered by
    /// their most preferred label, else their lexical form
    pub fn predicate_values_page(
        uri: &str,
        predicate: &str,
        label_predicates: &[String],
        limit: usize,
        offset: usize,
    ) -> Result<Self> {
        let (optionals, sort_label) = sort_label(label_predicates)?;
        Ok(Self::new(format!(
            r#"
            SELECT ?o (MIN({}) AS ?sortLabel)
            WHERE {{
                <{}> <{}> ?o .
                FILTER(!isBlank(?o))
                {}
            }}
            GROUP BY ?o
            ORDER BY ?sortLabel ?o
            LIMIT {}
            OFFSET {}
            "#,
            sort_label,
            iri(uri)?,
            iri(predicate)?,
            optionals,
            limit,
            offset
        )))
    }

    /// Distinct values of a predicate; list heads are replaced by their members
    pub fn predicate_value_count(uri: &str, predicate: &str) -> Result<Self> {
        let uri = iri(uri)?;
        let predicate = iri(predicate)?;
        Ok(Self::new(format!(
            r#"{}
            SELECT (COUNT(DISTINCT ?value) AS ?count)
            WHERE {{
                {{
                    <{}> <{}> ?value .
                    FILTER(!isBlank(?value))
                }}
                UNION
                {{
                    <{}> <{}> ?list .
                    FILTER(isBlank(?list))
                    ?list rdf:rest ?_rest .
                    ?list rdf:rest* ?cell .
                    ?cell rdf:first ?value .
                }}
            }}
            "#,
            PREFIXES, uri, predicate, uri, predicate
        )))
    }

    /// One page of the values attached to a resource through externally
    /// modelled metadata, `?meta <link> <uri> ; <metadata_predicate> ?o`,
    /// ordered like `predicate_values_page`
    pub fn linked_metadata_values(
        uri: &str,
        link_predicate: &str,
        metadata_predicate: &str,
        label_predicates: &[String],
        limit: usize,
        offset: usize,
    ) -> Result<Self> {
        let (optionals, sort_label) = sort_label(label_predicates)?;
        Ok(Self::new(format!(
            r#"
            SELECT ?o (MIN({}) AS ?sortLabel)
            WHERE {{
                ?_meta <{}> <{}> ;
                    <{}> ?o .
                FILTER(!isBlank(?o))
                {}
            }}
            GROUP BY ?o
            ORDER BY ?sortLabel ?o
            LIMIT {}
            OFFSET {}
            "#,
            sort_label,
            iri(link_predicate)?,
            iri(uri)?,
            iri(metadata_predicate)?,
            optionals,
            limit,
            offset
        )))
    }

    pub fn linked_metadata_count(
        uri: &str,
        link_predicate: &str,
        metadata_predicate: &str,
    ) -> Result<Self> {
        Ok(Self::new(format!(
            r#"
            SELECT (COUNT(DISTINCT ?value) AS ?count)
            WHERE {{
                ?_meta <{}> <{}> ;
                    <{}> ?value .
                FILTER(!isBlank(?value))
            }}
            "#,
            iri(link_predicate)?,
            iri(uri)?,
            iri(metadata_predicate)?
        )))
    }

    /// Concept schemes and collections that are part of `scheme`, one page
    pub fn vocabularies(scheme: &str, limit: usize, offset: usize) -> Result<Self> {
        Ok(Self::new(format!(
            r#"{}
            SELECT ?uri
                (SAMPLE(?_label) AS ?label)
                (SAMPLE(?_description) AS ?description)
                (SAMPLE(?_created) AS ?created)
                (SAMPLE(?_modified) AS ?modified)
            WHERE {{
                <{}> dcterms:hasPart ?uri .
                VALUES ?vocabularyType {{ skos:ConceptScheme skos:Collection }}
                ?uri a ?vocabularyType ;
                    skos:prefLabel ?_label .
                OPTIONAL {{ ?uri dcterms:description ?_description }}
                OPTIONAL {{ ?uri dcterms:created ?_created }}
                OPTIONAL {{ ?uri dcterms:modified ?_modified }}
                FILTER NOT EXISTS {{ ?uri owl:deprecated true }}
            }}
            GROUP BY ?uri
            ORDER BY ?label
            LIMIT {}
            OFFSET {}
            "#,
            PREFIXES,
            iri(scheme)?,
            limit,
            offset
        )))
    }

    pub fn vocabulary_count(scheme: &str) -> Result<Self> {
        Ok(Self::new(format!(
            r#"{}
            SELECT (COUNT(DISTINCT ?uri) AS ?count)
            WHERE {{
                <{}> dcterms:hasPart ?uri .
                VALUES ?vocabularyType {{ skos:ConceptScheme skos:Collection }}
                ?uri a ?vocabularyType ;
                    skos:prefLabel ?_label .
                FILTER NOT EXISTS {{ ?uri owl:deprecated true }}
            }}
            "#,
            PREFIXES,
            iri(scheme)?
        )))
    }

    /// Classes targeted by SHACL node shapes in a named graph, ordered by label
    pub fn ontology_classes(named_graph: Option<&str>) -> Result<Self> {
        let from = match named_graph {
            Some(graph) => format!("FROM <{}>", iri(graph)?),
            None => String::new(),
        };
        Ok(Self::new(format!(
            r#"{}
            SELECT DISTINCT ?id (SAMPLE(?_label) AS ?label)
            {}
            WHERE {{
                ?_class a sh:NodeShape ;
                    sh:targetClass ?id .
                FILTER(!isBlank(?id))
                {{ ?id rdfs:label ?_label . }}
                UNION
                {{ ?id skos:prefLabel ?_label . }}
            }}
            GROUP BY ?id
            ORDER BY ?label
            "#,
            PREFIXES, from
        )))
    }
}
