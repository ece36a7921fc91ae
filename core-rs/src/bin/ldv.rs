//! LDV - Linked Data Viewer CLI
//!
//! Fetches resources, predicate values and catalog listings from a SPARQL
//! endpoint (or a local Turtle file) and prints them as JSON.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use ld_viewer::resource::DEFAULT_PAGE_SIZE;
use ld_viewer::{
    list_ontology_classes, list_vocabularies, Config, CurieResolver, LocalTransport,
    ResourceViewer, SparqlClient, ViewerError,
};

/// Endpoint name the `--data` file is served under when no endpoint is given
const LOCAL_ENDPOINT: &str = "http://localhost/repositories/local";

#[derive(Parser)]
#[command(name = "ldv")]
#[command(version)]
#[command(about = "Linked Data Viewer", long_about = None)]
struct Cli {
    /// YAML config file (built-in defaults when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve queries from a local Turtle file instead of the network
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EndpointArgs {
    /// SPARQL endpoint URL
    #[arg(long)]
    endpoint: Option<String>,
    /// Configured viewer whose endpoint to use
    #[arg(long, conflicts_with = "endpoint")]
    viewer: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a resource as JSON
    Resource {
        /// Resource URI
        uri: String,
        #[command(flatten)]
        endpoint: EndpointArgs,
        /// Include statements pointing at the resource
        #[arg(long)]
        incoming: bool,
    },
    /// Show one page of the values of a predicate
    PredicateValues {
        /// Resource URI
        uri: String,
        /// Predicate URI
        predicate: String,
        #[command(flatten)]
        endpoint: EndpointArgs,
        /// Profile URI, for predicates added by a profile
        #[arg(long)]
        profile: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// List the vocabularies of a configured viewer
    Vocabularies {
        /// Viewer ID
        #[arg(default_value = "nrm")]
        viewer: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// List the classes of a configured ontology
    Classes {
        /// Ontology ID
        #[arg(default_value = "tern-ontology")]
        ontology: String,
    },
    /// Compact a URI to prefix:localname
    Curie {
        uri: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Exit code for a failed request: 2 for caller errors, 3 for upstream
/// failures, 1 otherwise
fn exit_code(err: &ViewerError) -> i32 {
    match err.status_code() {
        400 | 404 => 2,
        502 => 3,
        _ => 1,
    }
}

struct Session {
    config: Config,
    client: SparqlClient,
    /// Endpoint the local store answers on when `--data` is given
    local_endpoint: Option<String>,
}

impl Session {
    fn endpoint(&self, args: &EndpointArgs) -> ld_viewer::Result<String> {
        if let Some(endpoint) = &args.endpoint {
            return Ok(endpoint.clone());
        }
        if let Some(viewer) = &args.viewer {
            return Ok(self.config.viewer(viewer)?.sparql_endpoint.clone());
        }
        if let Some(local) = &self.local_endpoint {
            return Ok(local.clone());
        }
        Err(ViewerError::Config(
            "one of --endpoint, --viewer or --data is required".to_string(),
        ))
    }
}

fn build_session(cli: &Cli) -> anyhow::Result<Session> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let Some(data) = &cli.data else {
        let client = SparqlClient::http(config.timeout())?;
        return Ok(Session {
            config,
            client,
            local_endpoint: None,
        });
    };

    // Every configured endpoint plus the explicit one answers from the same file
    let mut endpoints: Vec<String> = config
        .viewers
        .iter()
        .map(|v| v.sparql_endpoint.clone())
        .chain(config.ontologies.iter().map(|o| o.sparql_endpoint.clone()))
        .chain(config.profiles.supplementary_endpoint.clone())
        .collect();
    let local_endpoint = match &cli.command {
        Commands::Resource { endpoint, .. } | Commands::PredicateValues { endpoint, .. } => {
            endpoint.endpoint.clone().unwrap_or_else(|| LOCAL_ENDPOINT.to_string())
        }
        _ => LOCAL_ENDPOINT.to_string(),
    };
    endpoints.push(local_endpoint.clone());
    endpoints.sort();
    endpoints.dedup();

    let mut transport = LocalTransport::new();
    for endpoint in &endpoints {
        transport
            .load_file(endpoint, data)
            .with_context(|| format!("Failed to load {}", data.display()))?;
    }

    // The local file lives in the default graph
    for ontology in &mut config.ontologies {
        ontology.named_graph = None;
    }
    // Offline: no remote prefix lookups, no federated label lookups
    config.curie.shrink_service = None;
    config.labels.federation = None;

    Ok(Session {
        config,
        client: SparqlClient::new(Arc::new(transport)),
        local_endpoint: Some(local_endpoint),
    })
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let session = build_session(&cli)?;

    match cli.command {
        Commands::Resource {
            uri,
            endpoint,
            incoming,
        } => {
            let viewer = ResourceViewer::from_config(&session.config, session.client.clone())?;
            let endpoint = session.endpoint(&endpoint)?;
            print_json(&viewer.get_resource(&uri, &endpoint, incoming).await?)
        }
        Commands::PredicateValues {
            uri,
            predicate,
            endpoint,
            profile,
            page,
            page_size,
        } => {
            let viewer = ResourceViewer::from_config(&session.config, session.client.clone())?;
            let endpoint = session.endpoint(&endpoint)?;
            let values = viewer
                .get_predicate_values(&uri, &predicate, &endpoint, profile.as_deref(), page_size, page)
                .await?;
            print_json(&values)
        }
        Commands::Vocabularies { viewer, page } => {
            let viewer = session.config.viewer(&viewer)?;
            print_json(&list_vocabularies(&session.client, viewer, page).await?)
        }
        Commands::Classes { ontology } => {
            let ontology = session.config.ontology(&ontology)?;
            print_json(&list_ontology_classes(&session.client, ontology).await?)
        }
        Commands::Curie { uri } => {
            let resolver = CurieResolver::from_settings(&session.config.curie, session.config.timeout())?;
            let curie = resolver.resolve(&uri).await;
            print_json(&serde_json::json!({ "uri": uri, "curie": curie }))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("ld_viewer=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        if let Some(viewer_err) = err.downcast_ref::<ViewerError>() {
            eprintln!("Error ({}): {:#}", viewer_err.status_code(), err);
            std::process::exit(exit_code(viewer_err));
        }
        return Err(err);
    }

    Ok(())
}
