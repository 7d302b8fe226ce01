//! Shoes Lulu CLI - catalog inspection and WhatsApp link tools.
//!
//! Uses the same content API client, query pipeline and configuration
//! (`CATALOG_*`, `WHATSAPP_PHONE`) as the storefront.
//!
//! # Usage
//!
//! ```bash
//! # List available products, cheapest first
//! lulu-cli catalog list --available --sort price-asc
//!
//! # Let the content API do the filtering
//! lulu-cli catalog list --search sandalia --remote
//!
//! # Show one product as JSON
//! lulu-cli catalog show 12 --json
//!
//! # Print the WhatsApp inquiry link for a product
//! lulu-cli catalog inquiry 12
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lulu-cli")]
#[command(author, version, about = "Shoes Lulu CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the remote catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Case-insensitive match on name or description
        #[arg(short, long)]
        search: Option<String>,

        /// Only products in stock and active
        #[arg(short, long)]
        available: bool,

        /// Sort order (`default`, `price-asc`, `price-desc`, `name`)
        #[arg(long, default_value = "default")]
        sort: String,

        /// Filter on the content API instead of locally
        #[arg(long)]
        remote: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one product
    Show {
        /// Product id
        id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the WhatsApp inquiry link for a product
    Inquiry {
        /// Product id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lulu_cli=info,lulu_storefront=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                search,
                available,
                sort,
                remote,
                json,
            } => {
                let options = commands::catalog::ListOptions {
                    search,
                    available,
                    sort,
                    remote,
                    json,
                };
                commands::catalog::list(&options).await?;
            }
            CatalogAction::Show { id, json } => commands::catalog::show(&id, json).await?,
            CatalogAction::Inquiry { id } => commands::catalog::inquiry(&id).await?,
        },
    }
    Ok(())
}
