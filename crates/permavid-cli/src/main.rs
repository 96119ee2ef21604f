//! Permavid CLI — migrate legacy-hosted videos to permanent storage.
//!
//! Configuration comes from the environment (see `MigrationConfig`); the
//! collection, token ids, chain and account come from the command line. The
//! final report is printed as JSON on stdout.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use permavid_core::{MigrationConfig, TokenId};
use permavid_pipeline::{migrate_collection, MigrationDeps, MigrationRequest};

#[derive(Parser)]
#[command(name = "permavid", about = "Legacy video to permanent storage migration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate the videos behind the given tokens and repoint their metadata
    Migrate {
        /// Collection contract address
        #[arg(long)]
        collection: String,
        /// Account authorized to send the batched update transaction
        #[arg(long)]
        account: String,
        /// Chain id (84532 selects the test network)
        #[arg(long, default_value = "8453")]
        chain_id: u64,
        /// Token ids to migrate ("0" is the collection metadata token)
        #[arg(required = true)]
        token_ids: Vec<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize report")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate {
            collection,
            account,
            chain_id,
            token_ids,
        } => {
            let config = MigrationConfig::from_env()
                .context("Failed to load configuration from the environment")?;
            let deps = MigrationDeps::from_config(&config, chain_id)
                .context("Failed to construct migration clients")?;

            let request = MigrationRequest {
                collection,
                token_ids: token_ids.into_iter().map(TokenId::from).collect(),
                chain_id,
                account,
            };

            let report = migrate_collection(&deps, &request).await?;
            print_json(&report)?;
        }
    }

    Ok(())
}
