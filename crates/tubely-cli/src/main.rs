//! Tubely CLI: reconcile stored objects with video records.
//!
//! Reads the same environment as the API server; `DATABASE_URL` is required.

use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tubely_cli::{init_tracing, reconcile, verify};
use tubely_core::Config;
use tubely_db::PgVideoRepository;
use tubely_storage::{create_thumbnail_storage, create_video_storage};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tubely-cli", about = "Tubely maintenance commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report stored video objects that no record references
    Reconcile {
        /// Only consider keys starting with this prefix (e.g. "landscape/")
        #[arg(long)]
        prefix: Option<String>,
        /// Delete the orphaned objects
        #[arg(long)]
        delete: bool,
    },
    /// Check that a video's stored references exist
    Verify {
        /// Video UUID
        video_id: Uuid,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize report")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let database_url = config
        .database_url()
        .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    let records = PgVideoRepository::new(pool);

    let videos = create_video_storage(&config).await?;

    match cli.command {
        Commands::Reconcile { prefix, delete } => {
            let report = reconcile(videos.as_ref(), &records, prefix.as_deref(), delete).await?;
            print_json(&report)?;
        }
        Commands::Verify { video_id } => {
            let thumbnails = create_thumbnail_storage(&config).await?;
            let checks = verify(video_id, &records, thumbnails.as_ref(), videos.as_ref()).await?;
            print_json(&checks)?;
            if checks.iter().any(|check| !check.exists) {
                return Err(anyhow!("Video {} references missing objects", video_id));
            }
        }
    }

    Ok(())
}
