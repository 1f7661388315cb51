//! nsat-fetch - Newton School attendance tracker
//!
//! Fetches the enrolled course set, aggregates lecture attendance per
//! subject, and prints percentages with 75%-target projections. On
//! fetch failures the last persisted snapshot is shown with a
//! staleness banner; a missing login is surfaced directly.

use anyhow::Result;
use clap::{Parser, Subcommand};
use nsat_common::config::{database_path, ensure_root_folder, resolve_root_folder, TomlConfig};
use nsat_fetch::config::FetchConfig;
use nsat_fetch::db::{self, SqliteStore};
use nsat_fetch::render::render_dashboard;
use nsat_fetch::services::{EnvContextProvider, NewtonClient, TokenProvider};
use nsat_fetch::types::SnapshotStore;
use nsat_fetch::{FetchError, FetchOutcome, FetchPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nsat-fetch", version, about = "Newton School attendance tracker")]
struct Cli {
    /// Root folder for database and state
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Session token (overrides NSAT_ACCESS_TOKEN and the config file)
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch fresh attendance data (the default)
    Refresh,
    /// Show the last fetched snapshot without touching the network
    Show,
    /// Persist a course hash manually
    SetCourse {
        /// Course hash from a platform course page URL
        hash: String,
    },
    /// Drop the cached course hash
    ClearCourse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let toml_config = TomlConfig::load();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(toml_config.log_level.clone().unwrap_or_else(|| "info".into()))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let root = resolve_root_folder(cli.root_folder.as_deref(), &toml_config);
    ensure_root_folder(&root)?;

    let pool = db::init_database_pool(&database_path(&root)).await?;
    let store = Arc::new(SqliteStore::new(pool));

    match cli.command.unwrap_or(Command::Refresh) {
        Command::Refresh => refresh(store, cli.token, &toml_config).await,
        Command::Show => show(store, &toml_config).await,
        Command::SetCourse { hash } => {
            store.set_course_hash(&hash).await?;
            info!(hash = %hash, "Course hash saved");
            println!("Course hash saved.");
            Ok(())
        }
        Command::ClearCourse => {
            store.clear_course_hash().await?;
            println!("Course hash cleared.");
            Ok(())
        }
    }
}

fn build_pipeline(
    store: Arc<SqliteStore>,
    cli_token: Option<String>,
    toml_config: &TomlConfig,
) -> Result<FetchPipeline> {
    let fetch_config = FetchConfig::resolve(toml_config);
    let api = Arc::new(NewtonClient::new(fetch_config.api_base.clone())?);
    let credentials = Arc::new(TokenProvider::new(
        cli_token,
        toml_config.access_token.clone(),
    ));

    Ok(FetchPipeline::new(
        api,
        credentials,
        Arc::new(EnvContextProvider),
        store,
        fetch_config,
    ))
}

async fn refresh(
    store: Arc<SqliteStore>,
    cli_token: Option<String>,
    toml_config: &TomlConfig,
) -> Result<()> {
    let pipeline = build_pipeline(store, cli_token, toml_config)?;

    match pipeline.run().await {
        Ok(FetchOutcome::Fresh {
            records,
            fetched_at,
        }) => {
            print!("{}", render_dashboard(&records, fetched_at, None));
            Ok(())
        }
        Ok(FetchOutcome::Stale {
            records,
            fetched_at,
            reason,
        }) => {
            print!("{}", render_dashboard(&records, fetched_at, Some(reason)));
            Ok(())
        }
        Err(FetchError::NotAuthenticated) => {
            anyhow::bail!(
                "Not logged in. Sign in to the platform and pass the session \
                 token with --token or NSAT_ACCESS_TOKEN."
            )
        }
        Err(FetchError::ResolutionFailed) => {
            anyhow::bail!(
                "Could not determine your course and no cached data exists. \
                 Set NSAT_COURSE_URL to an open course page URL, or run \
                 `nsat-fetch set-course <hash>`."
            )
        }
        Err(e @ FetchError::Network(_)) => {
            anyhow::bail!("{}. Check your connection and run `nsat-fetch refresh` again.", e)
        }
        Err(e) => Err(e.into()),
    }
}

async fn show(store: Arc<SqliteStore>, toml_config: &TomlConfig) -> Result<()> {
    let pipeline = build_pipeline(store, None, toml_config)?;
    let snapshot = pipeline.cached().await?;

    println!("Cached data from {}", snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC"));
    println!();
    print!("{}", render_dashboard(&snapshot.records, snapshot.fetched_at, None));
    Ok(())
}
