//! Binary entry point for promptdeck.
//!
//! This binary provides the CLI interface for the promptdeck catalog and
//! its MCP server.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use promptdeck::config::DeckConfig;
use promptdeck::mcp::{McpServer, Transport};
use promptdeck::models::PromptDraft;
use promptdeck::services::{AppsScriptClient, PromptCatalog, SheetImporter};
use promptdeck::storage::FilesystemKvStore;
use promptdeck::{mcp, observability};

/// Promptdeck - a prompt catalog with an MCP front door.
#[derive(Parser)]
#[command(name = "promptdeck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server.
    Serve {
        /// Transport type: stdio or http.
        #[arg(short, long, default_value = "stdio")]
        transport: String,

        /// Port for HTTP transport (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Add or update a prompt.
    Add {
        /// Display name.
        name: String,

        /// Template body.
        template: String,

        /// What the prompt is for.
        #[arg(short, long)]
        objective: Option<String>,

        /// Tags (comma-separated).
        #[arg(short, long)]
        tags: Option<String>,

        /// Author identifier.
        #[arg(short, long)]
        author: Option<String>,

        /// Free-form notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// List all prompts.
    List,

    /// Search prompts by substring.
    Find {
        /// Case-insensitive substring to match.
        query: String,
    },

    /// Show one prompt by id.
    Show {
        /// Record id.
        id: String,
    },

    /// Stamp a prompt's last-used date.
    Use {
        /// Record id.
        #[arg(long)]
        id: Option<String>,

        /// Display name (resolved via the name index).
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Import prompts from the configured sheet endpoint.
    Import,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    observability::init(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run_command(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: DeckConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Serve { transport, port } => cmd_serve(&config, &transport, port),

        Commands::Add {
            name,
            template,
            objective,
            tags,
            author,
            notes,
        } => cmd_add(&config, name, template, objective, tags, author, notes),

        Commands::List => cmd_list(&config),

        Commands::Find { query } => cmd_find(&config, &query),

        Commands::Show { id } => cmd_show(&config, &id),

        Commands::Use { id, name } => cmd_use(&config, id, name),

        Commands::Import => cmd_import(&config),
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> Result<DeckConfig, Box<dyn std::error::Error>> {
    if let Some(config_path) = path {
        return DeckConfig::load_from_file(std::path::Path::new(config_path))
            .map_err(std::convert::Into::into);
    }

    if let Ok(config_path) = std::env::var("PROMPTDECK_CONFIG_PATH")
        && !config_path.trim().is_empty()
    {
        return DeckConfig::load_from_file(std::path::Path::new(&config_path))
            .map_err(std::convert::Into::into);
    }

    Ok(DeckConfig::load_default())
}

/// Opens the catalog backed by the configured data directory.
fn open_catalog(config: &DeckConfig) -> Result<Arc<PromptCatalog>, Box<dyn std::error::Error>> {
    let kv = FilesystemKvStore::new(&config.data_dir)?;
    Ok(Arc::new(PromptCatalog::new(Arc::new(kv))))
}

/// Runs `serve`.
fn cmd_serve(
    config: &DeckConfig,
    transport: &str,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let transport = match transport {
        "stdio" => Transport::Stdio,
        "http" => Transport::Http,
        other => return Err(format!("Unknown transport: {other}").into()),
    };

    let catalog = open_catalog(config)?;
    let registry = mcp::ToolRegistry::new(mcp::ToolContext::new(catalog, config));

    McpServer::new(registry)
        .with_transport(transport)
        .with_port(port.unwrap_or(config.port))
        .start()?;

    Ok(())
}

/// Runs `add`.
fn cmd_add(
    config: &DeckConfig,
    name: String,
    template: String,
    objective: Option<String>,
    tags: Option<String>,
    author: Option<String>,
    notes: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = open_catalog(config)?;
    let id = catalog.put(PromptDraft {
        name: Some(name),
        template: Some(template),
        objective,
        tags,
        author,
        notes,
        ..Default::default()
    })?;

    println!("OK - id {id}");
    Ok(())
}

/// Runs `list`.
fn cmd_list(config: &DeckConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = open_catalog(config)?;
    let records = catalog.list()?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Runs `find`.
fn cmd_find(config: &DeckConfig, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = open_catalog(config)?;
    let records = catalog.search(query)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Runs `show`.
fn cmd_show(config: &DeckConfig, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = open_catalog(config)?;
    match catalog.get_by_id(id)? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        },
        None => Err(format!("Not found: {id}").into()),
    }
}

/// Runs `use`.
fn cmd_use(
    config: &DeckConfig,
    id: Option<String>,
    name: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = open_catalog(config)?;

    let mut id = id.filter(|id| !id.is_empty());
    if id.is_none()
        && let Some(name) = name.as_deref()
    {
        id = catalog.id_by_name(name)?;
    }
    let Some(id) = id else {
        return Err("Missing --id or --name".into());
    };

    match catalog.mark_used(&id)? {
        Some(record) => {
            println!("OK - {} last used {}", record.name, record.last_used_at);
            Ok(())
        },
        None => Err(format!("Not found: {id}").into()),
    }
}

/// Runs `import`.
fn cmd_import(config: &DeckConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(url), Some(secret)) = (config.sheet_url.as_deref(), config.shared_secret.as_deref())
    else {
        return Err("sheet_url / shared_secret not configured".into());
    };

    let catalog = open_catalog(config)?;
    let client = AppsScriptClient::new(url, secret);
    let count = SheetImporter::new(&catalog).run(&client)?;

    println!("Imported {count} items from sheet");
    Ok(())
}
