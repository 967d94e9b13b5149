//! sfs: command line front end for the SFS search backend

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use sfs_client::api::ApiClient;
use sfs_client::config::{select_backend, SettingsStore, Theme};
use sfs_client::logging::{LogFormat, LogLevel, LogOutput, LoggingConfig, LoggingSystem};
use sfs_client::shell::{FixedSaveDialog, FsFileSink, PassThroughSaveDialog, SaveDialog};
use sfs_client::{ClientConfig, CollectionsView, FileManager, LoadFilesOptions, SearchSession, StorageHost};

#[derive(Parser)]
#[command(name = "sfs")]
#[command(about = "Semantic file search client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keep settings in browser-style local storage instead of the desktop store
    #[arg(long, global = true)]
    browser_storage: bool,

    /// Directory holding the settings files
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Also write daily rolling log files to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Health,

    /// Show the state of an indexing job
    Status {
        job_id: String,
    },

    /// Upload and index a file
    Upload {
        path: PathBuf,

        /// Target collection (default: the configured default collection)
        #[arg(short, long)]
        collection: Option<String>,

        /// Replace the file if it is already indexed
        #[arg(long)]
        update: bool,
    },

    /// List indexed files
    Files {
        #[arg(short, long)]
        collection: Option<String>,

        #[arg(short, long)]
        page: Option<u32>,

        #[arg(short = 'n', long)]
        limit: Option<u32>,

        /// Only show files whose name or path contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Remove a file from the index
    Delete {
        collection: String,
        name: String,
    },

    /// Download an indexed file
    Download {
        collection: String,
        name: String,

        /// Where to save (default: download path from settings, else the file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Semantic search
    Search {
        query: Vec<String>,

        /// Restrict to these collections (repeatable)
        #[arg(short, long = "collection")]
        collections: Vec<String>,

        #[arg(short = 'n', long)]
        limit: Option<u32>,

        /// Minimum score
        #[arg(short, long)]
        threshold: Option<f64>,

        #[arg(short, long)]
        page: Option<u32>,
    },

    /// List collections
    Collections,

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the current settings
    Show,

    /// Change the connection settings and save them
    Set {
        #[arg(long)]
        api_url: Option<String>,

        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        download_path: Option<String>,

        /// light, dark or system
        #[arg(long)]
        theme: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logging = match LoggingSystem::init(logging_config(&cli)) {
        Ok(system) => Some(system),
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    let mut config = ClientConfig::default();
    if cli.browser_storage {
        config = config.with_storage_host(StorageHost::Browser);
    }
    if let Some(dir) = cli.storage_dir.clone() {
        config = config.with_storage_dir(dir);
    }

    let backend = select_backend(config.storage_host, &config.storage_dir);
    let settings = SettingsStore::new(backend);
    settings
        .load_settings()
        .await
        .context("Failed to load settings")?;

    let client = ApiClient::with_config(settings.clone(), &config)
        .context("Failed to create API client")?;

    match cli.command {
        Commands::Health => cmd_health(&client).await,
        Commands::Status { job_id } => cmd_status(&client, &job_id).await,
        Commands::Upload {
            path,
            collection,
            update,
        } => cmd_upload(&client, &path, collection, update).await,
        Commands::Files {
            collection,
            page,
            limit,
            filter,
        } => cmd_files(client, collection, page, limit, filter).await,
        Commands::Delete { collection, name } => cmd_delete(client, &collection, &name).await,
        Commands::Download {
            collection,
            name,
            output,
        } => cmd_download(client, &collection, &name, output).await,
        Commands::Search {
            query,
            collections,
            limit,
            threshold,
            page,
        } => cmd_search(client, &query.join(" "), collections, limit, threshold, page).await,
        Commands::Collections => cmd_collections(client).await,
        Commands::Config { command } => cmd_config(&settings, command).await,
    }
}

fn logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if cli.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::new().with_level(LogLevel::Warn)
    };
    if cli.json_logs {
        config = config.with_format(LogFormat::Json);
    }
    if let Some(dir) = &cli.log_dir {
        config = config
            .with_output(LogOutput::Both)
            .with_log_directory(dir);
    }
    config
}

async fn cmd_health(client: &ApiClient) -> Result<()> {
    let health = client.health_check().await?;
    println!("{} {}", health.status_code, health.body.trim());
    Ok(())
}

async fn cmd_status(client: &ApiClient, job_id: &str) -> Result<()> {
    let status = client.get_job_status(job_id).await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

async fn cmd_upload(
    client: &ApiClient,
    path: &Path,
    collection: Option<String>,
    update: bool,
) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let collection =
        collection.unwrap_or_else(|| client.settings().snapshot().default_collection);

    let job = client.upload_file(path, file_name, &collection, update).await?;
    println!("Queued {} in {} (job {})", file_name, collection, job.job_id);
    Ok(())
}

/// File manager writing to the local filesystem
fn file_manager(client: ApiClient, dialog: Arc<dyn SaveDialog>) -> FileManager {
    FileManager::new(client, dialog, Arc::new(FsFileSink))
}

async fn cmd_files(
    client: ApiClient,
    collection: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
    filter: Option<String>,
) -> Result<()> {
    let manager = file_manager(client, Arc::new(PassThroughSaveDialog));
    manager
        .load_files(LoadFilesOptions {
            collection,
            page,
            limit,
        })
        .await;

    let state = manager.state();
    if !state.error.is_empty() {
        bail!("{}", state.error);
    }

    let files = manager.filter_files(filter.as_deref().unwrap_or(""));
    for file in &files {
        println!("{}", file.path);
    }
    println!(
        "-- page {}/{}, {} files total",
        state.page, state.total_pages, state.total
    );
    Ok(())
}

async fn cmd_delete(client: ApiClient, collection: &str, name: &str) -> Result<()> {
    let manager = file_manager(client, Arc::new(PassThroughSaveDialog));
    manager.delete_file(collection, name).await?;
    println!("Deletion of {}/{} scheduled", collection, name);
    Ok(())
}

async fn cmd_download(
    client: ApiClient,
    collection: &str,
    name: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let download_path = client.settings().snapshot().download_path;
    let dialog: Arc<dyn SaveDialog> = match &output {
        Some(path) => Arc::new(FixedSaveDialog::new(path)),
        None => Arc::new(PassThroughSaveDialog),
    };
    let default_path = (!download_path.is_empty())
        .then(|| Path::new(&download_path).join(name).to_string_lossy().into_owned());

    let manager = file_manager(client, dialog);
    manager
        .download_file(collection, name, default_path.as_deref())
        .await?;
    println!("Downloaded {}/{}", collection, name);
    Ok(())
}

async fn cmd_search(
    client: ApiClient,
    query: &str,
    collections: Vec<String>,
    limit: Option<u32>,
    threshold: Option<f64>,
    page: Option<u32>,
) -> Result<()> {
    if query.trim().is_empty() {
        bail!("Search query is empty");
    }

    let settings = client.settings().snapshot();
    if !collections.is_empty() && settings.search_all_collections {
        // explicit collections on the command line win over the stored preference
        client.settings().set_search_all_collections(false);
    }

    let session = SearchSession::new(client, Arc::new(PassThroughSaveDialog), Arc::new(FsFileSink));
    session.set_selected_collections(collections);
    session
        .search(
            query,
            limit.unwrap_or(settings.search_limit),
            threshold.unwrap_or(settings.search_score_threshold),
            page,
        )
        .await;

    let state = session.state();
    if !state.error.is_empty() {
        bail!("{}", state.error);
    }

    for result in &state.results {
        println!(
            "{:.3}  {}  {}",
            result.score, result.collection, result.payload.file_path
        );
        let snippet: String = result.payload.text.chars().take(160).collect();
        println!("       {}", snippet.replace('\n', " "));
    }
    println!(
        "-- page {}/{}, {} results total",
        state.page, state.total_pages, state.total
    );
    Ok(())
}

async fn cmd_collections(client: ApiClient) -> Result<()> {
    let view = CollectionsView::new(client);
    view.load_collections().await;

    let state = view.state();
    if !state.error.is_empty() {
        bail!("{}", state.error);
    }
    if state.collections.is_empty() {
        println!("No collections found");
    }
    for name in &state.collections {
        if view.is_default(name) {
            println!("{} (default)", name);
        } else {
            println!("{}", name);
        }
    }
    Ok(())
}

async fn cmd_config(settings: &SettingsStore, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let current = settings.snapshot();
            let masked = if current.api_key.is_empty() { "" } else { "********" };
            println!("api_url                 {}", current.api_url);
            println!("api_key                 {}", masked);
            println!("download_path           {}", current.download_path);
            println!("theme                   {}", current.theme);
            println!("search_limit            {}", current.search_limit);
            println!("search_score_threshold  {}", current.search_score_threshold);
            println!("default_collection      {}", current.default_collection);
            println!("search_all_collections  {}", current.search_all_collections);
            println!("storage                 {:?}", settings.storage_host());
        }
        ConfigCommand::Set {
            api_url,
            api_key,
            download_path,
            theme,
        } => {
            if let Some(theme) = theme {
                let theme: Theme = theme.parse()?;
                settings.set_theme(theme);
            }
            if let Some(url) = api_url {
                settings.set_api_url(url);
            }
            if let Some(key) = api_key {
                settings.set_api_key(key);
            }
            if let Some(path) = download_path {
                settings.set_download_path(path);
            }

            settings
                .save_settings()
                .await
                .context("Failed to save settings")?;
            println!("Settings saved");
        }
    }
    Ok(())
}
