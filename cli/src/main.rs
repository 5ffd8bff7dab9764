mod report;

use anyhow::{Context, Result};
use calabash_core::scrape::{ScrapeOptions, DEFAULT_CATEGORY, DEFAULT_MAX_RECIPES};
use calabash_server::store::PgCatalogStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "calabash")]
#[command(about = "Calabash recipe catalog import tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import recipes from a JSON batch file
    ImportJson {
        /// Path to the JSON file
        path: PathBuf,
    },
    /// Scrape a recipe page or a listing page of recipe links
    Scrape {
        /// Recipe or listing URL
        url: String,
        /// Ethnicity to file scraped recipes under
        #[arg(long)]
        ethnicity: String,
        /// Category to file scraped recipes under
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
        /// Maximum number of recipes to import
        #[arg(long, default_value_t = DEFAULT_MAX_RECIPES)]
        max: usize,
    },
    /// Import recipes from a PDF cookbook
    ImportPdf {
        /// Path to the PDF file
        path: PathBuf,
        /// Ethnicity to file extracted recipes under
        #[arg(long)]
        ethnicity: String,
        /// Category to file extracted recipes under
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let mut store = PgCatalogStore::connect(&database_url)
        .with_context(|| "Failed to open the catalog store".to_string())?;
    tracing::debug!("catalog store ready");

    // Per-record failures land in the report; only batch-scope errors
    // (missing file, unreachable sole URL) bubble up as a non-zero exit.
    let report = match cli.command {
        Commands::ImportJson { path } => calabash_core::json::import_file(&mut store, &path)?,
        Commands::Scrape {
            url,
            ethnicity,
            category,
            max,
        } => {
            let options = ScrapeOptions {
                ethnicity,
                category,
                max_recipes: max,
            };
            calabash_core::scrape::scrape_into_store(&mut store, &url, &options).await?
        }
        Commands::ImportPdf {
            path,
            ethnicity,
            category,
        } => calabash_core::pdf::import_file(&mut store, &path, &ethnicity, &category)?,
    };

    report::print_summary(&report);

    Ok(())
}
