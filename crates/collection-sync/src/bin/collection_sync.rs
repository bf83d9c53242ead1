use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use collection_merge::{NamePolicy, SuffixMarker, Unmarked, DEFAULT_MARKER};
use collection_sync::config::{EnvFile, Overrides, Settings, DEFAULT_ENV_FILE};
use collection_sync::workflow::{self, MergeOptions, UpdateOptions};
use serde_json::Value;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Fetch, patch, merge and upload a Postman collection.
#[derive(Parser)]
#[command(name = "collection-sync", version, about)]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Connection {
    /// Postman environment file to read defaults from
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    env: PathBuf,

    /// API key for the collections API
    #[arg(
        long,
        alias = "postmanApiKey",
        global = true,
        env = "POSTMAN_API_KEY",
        hide_env_values = true
    )]
    postman_api_key: Option<String>,

    /// Uid of the collection to operate on
    #[arg(long, alias = "collectionUid", global = true, env = "COLLECTION_UID")]
    collection_uid: Option<String>,

    /// Base URL of the collections API
    #[arg(long, global = true, env = "POSTMAN_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Use a local JSON file as the collection store
    #[arg(long, global = true)]
    store_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Download the collection
    Get {
        /// Write the collection here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the collection, or apply a JSON Patch to it
    Update {
        /// Replacement document or patch list
        #[arg(long)]
        input: Option<PathBuf>,
        /// "true" to treat the input as a patch list
        #[arg(long)]
        patch: Option<String>,
        /// Also save the uploaded document here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Upsert folders and requests by name path
    Ai {
        /// Operations file
        #[arg(long, visible_alias = "operations", alias = "input")]
        ops: PathBuf,
        /// Folder path prefixed to every operation, e.g. "Team/API"
        #[arg(long)]
        base: Option<String>,
        /// Also save the uploaded document here
        #[arg(long)]
        out: Option<PathBuf>,
        /// Suffix that tags machine-managed names
        #[arg(long, default_value = DEFAULT_MARKER)]
        marker: String,
        /// Compare and write names without any marker
        #[arg(long, conflicts_with = "marker")]
        no_marker: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let env = EnvFile::load(&cli.connection.env)
        .with_context(|| format!("loading {}", cli.connection.env.display()))?;
    let (input, patch) = match &cli.command {
        Command::Update { input, patch, .. } => (input.clone(), patch.clone()),
        _ => (None, None),
    };
    let settings = Settings::resolve(
        Overrides {
            api_key: cli.connection.postman_api_key,
            collection_uid: cli.connection.collection_uid,
            api_base_url: cli.connection.api_base_url,
            store_file: cli.connection.store_file,
            input,
            patch,
        },
        &env,
    );
    let store = settings.open_store()?;

    match cli.command {
        Command::Get { out } => {
            let fetched = workflow::get(store.as_ref(), out.as_deref()).context("get failed")?;
            if out.is_none() {
                print_json(&fetched)?;
            }
        }
        Command::Update { out, .. } => {
            let Some(input) = settings.input.as_deref() else {
                bail!("update needs --input or aiOutputFile in the environment file");
            };
            let response = workflow::update(
                store.as_ref(),
                UpdateOptions {
                    input,
                    patch: settings.patch,
                    out: out.as_deref(),
                },
            )
            .with_context(|| format!("update from {} failed", input.display()))?;
            print_json(&response)?;
        }
        Command::Ai {
            ops,
            base,
            out,
            marker,
            no_marker,
        } => {
            let policy: Box<dyn NamePolicy> = if no_marker {
                Box::new(Unmarked)
            } else {
                Box::new(SuffixMarker::new(marker))
            };
            let response = workflow::merge(
                store.as_ref(),
                MergeOptions {
                    ops: &ops,
                    base: base.as_deref().map(workflow::parse_base),
                    out: out.as_deref(),
                    policy: policy.as_ref(),
                },
            )
            .with_context(|| format!("merge from {} failed", ops.display()))?;
            print_json(&response)?;
        }
    }
    Ok(())
}
