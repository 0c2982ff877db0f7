use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dossier::catalog::{Catalog, load_catalog};
use dossier::config::ServerConfig;
use dossier::progress::{documents_with_status, progress_for};
use dossier::server::{AppState, create_router};
use dossier::store::{SqliteStore, Store};
use dossier::types::parse_profile_list;

#[derive(Parser)]
#[command(name = "dossier")]
#[command(about = "A residence-permit paperwork tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PathArgs {
    /// TOML config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory for the database
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory holding the catalog YAML files
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

#[derive(Args)]
struct FilterArgs {
    /// Comma-separated profiles to filter by (defaults to the saved selection)
    #[arg(long, conflicts_with = "all")]
    profiles: Option<String>,

    /// Show every document regardless of profile
    #[arg(long)]
    all: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        #[command(flatten)]
        paths: PathArgs,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Create the database and seed it from the catalog
    Init {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// List the documents of a permit type with their status
    Documents {
        permit_type: String,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        paths: PathArgs,
    },

    /// Show completion progress for a permit type
    Progress {
        permit_type: String,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        paths: PathArgs,
    },

    /// Show or change the selected profiles
    Profiles {
        /// Comma-separated profiles to save
        #[arg(long)]
        set: Option<String>,

        #[command(flatten)]
        paths: PathArgs,
    },
}

fn load_config(paths: PathArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match paths.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(data_dir) = paths.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(config_dir) = paths.config_dir {
        config.config_dir = config_dir;
    }
    Ok(config)
}

/// Loads the catalog and brings the database in line with it.
fn open(config: &ServerConfig) -> anyhow::Result<(Catalog, SqliteStore)> {
    fs::create_dir_all(&config.data_dir)?;

    let catalog = load_catalog(&config.config_dir);
    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;
    let report = store.seed(&catalog)?;

    info!(
        "Catalog seeded: {} permit types, {} documents ({} new, {} removed)",
        report.permit_types, report.documents, report.statuses_created, report.documents_removed
    );

    Ok((catalog, store))
}

fn selection(store: &dyn Store, filter: &FilterArgs) -> anyhow::Result<Option<Vec<String>>> {
    if filter.all {
        return Ok(None);
    }
    match filter.profiles.as_deref() {
        Some(raw) => Ok(Some(parse_profile_list(raw))),
        None => Ok(Some(store.get_settings()?.selected_profiles)),
    }
}

fn run_init(config: &ServerConfig) -> anyhow::Result<()> {
    let (catalog, store) = open(config)?;

    if catalog.permit_types().is_empty() {
        bail!(
            "No permit types found in {}. Add <permit>.yaml files next to profiles.yaml.",
            config.config_dir.display()
        );
    }

    println!("Database ready at {}", config.db_path().display());
    for permit in store.list_permit_types()? {
        let count = store.list_documents(&permit.id)?.len();
        println!("  {:<20} {:>3} documents  {}", permit.id, count, permit.name_en);
    }
    Ok(())
}

fn run_documents(config: &ServerConfig, permit_type: &str, filter: &FilterArgs) -> anyhow::Result<()> {
    let (catalog, store) = open(config)?;
    let selected = selection(&store, filter)?;

    let documents = documents_with_status(&catalog, &store, permit_type, selected.as_deref())?;
    if documents.is_empty() {
        println!("No documents for '{permit_type}'");
        return Ok(());
    }

    for doc in documents {
        let mark = if doc.is_complete { "x" } else { " " };
        let due = doc
            .due_date
            .map(|d| format!("  due {d}"))
            .unwrap_or_default();
        println!(
            "[{mark}] {:<28} {} ({}){due}",
            doc.document.id, doc.document.name_en, doc.document.name_fr
        );
    }
    Ok(())
}

fn run_progress(config: &ServerConfig, permit_type: &str, filter: &FilterArgs) -> anyhow::Result<()> {
    let (catalog, store) = open(config)?;
    let selected = selection(&store, filter)?;

    let progress = progress_for(&catalog, &store, permit_type, selected.as_deref())?;
    println!(
        "{permit_type}: {}/{} complete ({}%), {} remaining",
        progress.completed, progress.total, progress.percentage, progress.remaining
    );
    Ok(())
}

fn run_profiles(config: &ServerConfig, set: Option<&str>) -> anyhow::Result<()> {
    let (catalog, store) = open(config)?;

    let selected = match set {
        Some(raw) => {
            let profiles = parse_profile_list(raw);
            if let Some(unknown) = profiles.iter().find(|p| !catalog.has_profile(p)) {
                bail!("Unknown profile '{unknown}'");
            }
            store.set_selected_profiles(&profiles)?.selected_profiles
        }
        None => store.get_settings()?.selected_profiles,
    };

    for profile in catalog.profiles() {
        let mark = if selected.contains(&profile.id) { "x" } else { " " };
        println!("[{mark}] {:<16} {}", profile.id, profile.name_en);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("dossier=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { paths } => run_init(&load_config(paths)?)?,
        Commands::Documents {
            permit_type,
            filter,
            paths,
        } => run_documents(&load_config(paths)?, &permit_type, &filter)?,
        Commands::Progress {
            permit_type,
            filter,
            paths,
        } => run_progress(&load_config(paths)?, &permit_type, &filter)?,
        Commands::Profiles { set, paths } => run_profiles(&load_config(paths)?, set.as_deref())?,
        Commands::Serve { paths, host, port } => {
            let mut config = load_config(paths)?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let (catalog, store) = open(&config)?;
            let state = Arc::new(AppState::new(Arc::new(store), Arc::new(catalog)));

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
