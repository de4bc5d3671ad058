//! Maintenance commands for the galaxy database: create, drop and seed.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use galaxy_api::config::DEFAULT_DB_PATH;
use galaxy_api::seed;
use galaxy_api::store::LibSqlBackend;

#[derive(Parser, Debug)]
#[command(name = "galaxy-admin", version, about = "Galaxy API database maintenance")]
struct Cli {
    /// Database file to operate on.
    #[arg(long, env = "GALAXY_API_DB_PATH", default_value = DEFAULT_DB_PATH)]
    database: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Create the schema.
    #[command(name = "db_create")]
    Create,
    /// Drop every table.
    #[command(name = "db_drop")]
    Drop,
    /// Insert the sample galaxies and user.
    #[command(name = "db_seed")]
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let db = LibSqlBackend::open_local(&cli.database)
        .await
        .with_context(|| format!("Failed to open database at {}", cli.database.display()))?;

    match cli.command {
        Command::Create => {
            seed::create_schema(&db).await?;
            println!("Database created!");
        }
        Command::Drop => {
            seed::drop_schema(&db).await?;
            println!("Database dropped!");
        }
        Command::Seed => {
            let report = seed::seed(&db).await?;
            println!(
                "Database seeded! ({} galaxies, {} users inserted; {} galaxies, {} users already present)",
                report.galaxies_inserted,
                report.users_inserted,
                report.galaxies_skipped,
                report.users_skipped
            );
        }
    }
    Ok(())
}
