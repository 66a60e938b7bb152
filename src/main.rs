//! pcpartsdb CLI - rebuild a SQLite parts database from JSON schema and data files

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use pcpartsdb::builder;
use pcpartsdb::config::{BASE_FOLDERS, Config};
use pcpartsdb::registry::TypeRegistry;
use pcpartsdb::typegen;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "pcpartsdb")]
#[command(version)]
#[command(about = "Schema-driven SQLite database builder for PC part catalogs")]
#[command(long_about = r#"
pcpartsdb turns a folder of JSON Schema part definitions and JSON data files
into a single SQLite database, one table per part category.

Example usage:
  pcpartsdb generate -b data-staging
  pcpartsdb build -b data
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate record type definitions from the JSON Schema files
    Generate {
        /// Base data folder to work from
        #[arg(
            short,
            long,
            value_parser = PossibleValuesParser::new(BASE_FOLDERS),
            default_value_t = Config::default_base_folder().to_string()
        )]
        base_folder: String,

        /// External schema compiler command
        #[arg(long, default_value = typegen::DEFAULT_COMPILER)]
        compiler: String,
    },

    /// Rebuild the parts database from generated types and data files
    Build {
        /// Base data folder to work from
        #[arg(
            short,
            long,
            value_parser = PossibleValuesParser::new(BASE_FOLDERS),
            default_value_t = Config::default_base_folder().to_string()
        )]
        base_folder: String,

        /// External schema compiler command (used when types are missing)
        #[arg(long, default_value = typegen::DEFAULT_COMPILER)]
        compiler: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Generate {
            base_folder,
            compiler,
        } => {
            let config = Config::new(&base_folder);
            println!("📐 Generating record types from: {:?}", config.json_dir());

            let stats = typegen::generate_types(&config, &compiler)?;
            for class_name in &stats.generated {
                println!("   Created type:\t{}", class_name);
            }
            for stem in &stats.failed {
                println!("   Failed:\t{}", stem);
            }
            println!(
                "✅ Generated {} type definitions ({} failed)",
                stats.generated.len(),
                stats.failed.len()
            );
        }

        Commands::Build {
            base_folder,
            compiler,
        } => {
            let config = Config::new(&base_folder);
            if !TypeRegistry::manifest_exists(&config.types_dir()) {
                println!("🧩 No generated types found, running type generation first...");
                typegen::generate_types(&config, &compiler)?;
            }

            let registry = TypeRegistry::load(&config.types_dir())?;
            if registry.is_empty() {
                anyhow::bail!(
                    "no record types in {:?}; run `pcpartsdb generate` first",
                    config.types_dir()
                );
            }

            println!("🗄️  Rebuilding database: {:?}", config.db_path());
            let stats = builder::build_database(&config, &registry)?;
            println!("{}", stats);
            println!("✅ Build complete!");
        }
    }

    Ok(())
}
