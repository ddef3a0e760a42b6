mod cli;
mod server;
mod tools;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cli::OutputFormat;
use cortex::config;

#[derive(Parser)]
#[command(name = "cortex", version, about = "Hierarchical memory store for AI agents")]
struct Cli {
    /// Store to operate on (defaults to `storage.default_store`)
    #[arg(long, short = 's', global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server
    Serve {
        /// Transport: `stdio` or `http` (defaults to `server.transport`)
        #[arg(long)]
        transport: Option<String>,
    },
    /// Create the store directory and an empty index
    Init,
    /// Add a new memory (content from --content or stdin)
    Add {
        /// Memory path, e.g. `project/cortex/architecture`
        path: String,
        #[arg(long, short = 'c')]
        content: Option<String>,
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,
        /// Expiry timestamp (RFC 3339)
        #[arg(long, value_parser = parse_timestamp)]
        expires: Option<DateTime<Utc>>,
        #[arg(long = "citation")]
        citations: Vec<String>,
    },
    /// Show a memory
    Show {
        path: String,
        #[arg(long)]
        include_expired: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Update a memory's content or metadata
    Update {
        path: String,
        #[arg(long, short = 'c')]
        content: Option<String>,
        /// Replace all tags
        #[arg(long = "tag", short = 't')]
        tags: Option<Vec<String>>,
        #[arg(long, value_parser = parse_timestamp, conflicts_with = "clear_expiry")]
        expires: Option<DateTime<Utc>>,
        #[arg(long)]
        clear_expiry: bool,
    },
    /// Remove a memory
    Remove { path: String },
    /// Move a memory to a new path
    Move { from: String, to: String },
    /// List a category's memories and subcategories
    List {
        /// Category path (root when omitted)
        #[arg(default_value = "")]
        category: String,
        #[arg(long)]
        include_expired: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Set (or clear, when omitted) a category's description
    Describe {
        category: String,
        description: Option<String>,
    },
    /// Rebuild the category index from the memory files
    Reindex,
    /// Remove expired memories
    Prune {
        #[arg(long)]
        dry_run: bool,
    },
    /// Compare the index with the memory files and report drift
    Doctor,
    /// List known stores
    Stores,
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::CortexConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = cli.store.as_deref();

    match cli.command {
        Command::Serve { transport } => {
            let transport = transport.unwrap_or_else(|| config.server.transport.clone());
            match transport.as_str() {
                "stdio" => server::serve_stdio(config).await?,
                "http" => server::serve_http(config).await?,
                other => anyhow::bail!("unknown transport: {other}. Supported: stdio, http"),
            }
        }
        Command::Init => cli::stores::init(&config, store)?,
        Command::Add {
            path,
            content,
            tags,
            expires,
            citations,
        } => cli::add::add(&config, store, &path, content, tags, expires, citations)?,
        Command::Show {
            path,
            include_expired,
            format,
        } => cli::inspect::show(&config, store, &path, include_expired, format)?,
        Command::Update {
            path,
            content,
            tags,
            expires,
            clear_expiry,
        } => cli::update::update(&config, store, &path, content, tags, expires, clear_expiry)?,
        Command::Remove { path } => cli::remove::remove(&config, store, &path)?,
        Command::Move { from, to } => cli::remove::move_memory(&config, store, &from, &to)?,
        Command::List {
            category,
            include_expired,
            format,
        } => cli::list::list(&config, store, &category, include_expired, format)?,
        Command::Describe {
            category,
            description,
        } => cli::list::describe(&config, store, &category, description)?,
        Command::Reindex => cli::reindex::reindex(&config, store)?,
        Command::Prune { dry_run } => cli::reindex::prune(&config, store, dry_run)?,
        Command::Doctor => cli::doctor::doctor(&config, store)?,
        Command::Stores => cli::stores::stores(&config)?,
    }

    Ok(())
}
