use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ortelius::{GazetteerResolver, build_index, init_logging};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "ortelius",
    about = "Resolve free-text place names against a GeoNames-style gazetteer",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the search index from a gazetteer TSV file (no-op if it exists)
    Build {
        /// Path to the gazetteer file, e.g. GeoNames allCountries.txt
        #[arg(short, long)]
        gazetteer: PathBuf,

        /// Directory to create the index in
        #[arg(short, long)]
        index: PathBuf,
    },

    /// Resolve place names against a previously built index
    Search {
        /// Directory of the built index
        #[arg(short, long)]
        index: PathBuf,

        /// Number of best results to return per name
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Emit a JSON map instead of quoted-CSV lines
        #[arg(long)]
        json: bool,

        /// Place names to resolve
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() -> Result<()> {
    init_logging(Level::INFO)?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { gazetteer, index } => {
            build_index(&gazetteer, &index)?;
        }
        Commands::Search {
            index,
            count,
            json,
            names,
        } => {
            let resolver = GazetteerResolver::open(&index)?;
            let resolved = resolver.resolve(&names, count)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                for (name, places) in &resolved {
                    println!("{name}");
                    for place in places {
                        println!("{}", place.to_csv_line());
                    }
                }
            }
        }
    }
    Ok(())
}
