//! 4AMotos CLI - Record store schema and demo data tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the `categorias` and `repuestos` collections if missing
//! PB_USER=admin@example.com PB_PASS=... amotos migrate
//!
//! # Insert the ten categories and 2000 demo items
//! PB_USER=admin@example.com PB_PASS=... amotos seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Ensure the catalog collections exist
//! - `seed` - Populate the catalog with demo data

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "amotos")]
#[command(author, version, about = "4AMotos CLI tools")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Superuser connection to the record store.
#[derive(Args)]
struct StoreArgs {
    /// Record store base URL
    #[arg(long, env = "PB_URL", default_value = "http://127.0.0.1:8090")]
    url: Url,

    /// Superuser email
    #[arg(long, env = "PB_USER")]
    user: String,

    /// Superuser password
    #[arg(long, env = "PB_PASS", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure the catalog collections exist
    Migrate,
    /// Populate the catalog with demo categories and items
    Seed {
        /// Number of items to create
        #[arg(long, default_value_t = commands::seed::TOTAL_ITEMS)]
        count: usize,

        /// Items created concurrently per batch
        #[arg(long, default_value_t = commands::seed::BATCH_SIZE)]
        batch_size: usize,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "amotos=info,amotos_storefront=warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = commands::connect(cli.store.url, &cli.store.user, cli.store.password).await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&client).await?,
        Commands::Seed { count, batch_size } => {
            commands::seed::run(&client, count, batch_size).await?;
        }
    }
    Ok(())
}
