//! Error types for the linked-data viewer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    /// Transport or HTTP-status failure talking to a SPARQL endpoint
    #[error("SPARQL request failed: {description}")]
    Request { description: String },

    #[error("Resource with URI {0} not found.")]
    NotFound(String),

    /// The store answered with something that is not a usable SPARQL result
    #[error("Unexpected SPARQL result: {0}")]
    MalformedResult(String),

    #[error("Unknown viewer ID '{0}'")]
    ViewerNotFound(String),

    #[error("Unknown profile '{0}'")]
    ProfileNotFound(String),

    #[error("Unknown ontology ID '{0}'")]
    OntologyNotFound(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ViewerError {
    pub fn request(description: impl Into<String>) -> Self {
        ViewerError::Request {
            description: description.into(),
        }
    }

    /// HTTP status class an API boundary should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ViewerError::Request { .. } | ViewerError::MalformedResult(_) => 502,
            ViewerError::NotFound(_)
            | ViewerError::ViewerNotFound(_)
            | ViewerError::ProfileNotFound(_)
            | ViewerError::OntologyNotFound(_) => 404,
            ViewerError::InvalidUri(_) => 400,
            ViewerError::Config(_) | ViewerError::Io(_) | ViewerError::Yaml(_) => 500,
        }
    }

    /// True for failures caused by the upstream triplestore rather than the caller
    pub fn is_upstream(&self) -> bool {
        self.status_code() == 502
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
