mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// mealcart - grocery list from your weekly meal plan
#[derive(Parser)]
#[command(name = "mealcart")]
#[command(about = "Derive the week's grocery list from the meal plan and pantry", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Load ingredients, recipes, meal plan and pantry from a JSON file
    Import {
        /// Path to the JSON fixture
        path: String,
    },
    /// Print the current grocery list
    List {
        /// Print as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Mark an ingredient as bought
    Bought {
        /// Ingredient id
        id: String,
    },
    /// Move an ingredient back to the to-buy list
    Unbought {
        /// Ingredient id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = mealcart::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealcart::observability::init_observability(
        "mealcart",
        env!("CARGO_PKG_VERSION"),
        &config.logging.level,
        &config.logging.format,
    )?;

    match cli.command {
        Commands::Migrate => mealcart::migrate::migrate(&config).await,
        Commands::Reset => mealcart::migrate::reset(&config).await,
        Commands::Import { path } => cli::import::import(config, path).await,
        Commands::List { json } => cli::grocery::list(config, json).await,
        Commands::Bought { id } => cli::grocery::mark(config, id.into(), true).await,
        Commands::Unbought { id } => cli::grocery::mark(config, id.into(), false).await,
    }
}
