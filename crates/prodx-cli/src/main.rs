mod extract;
mod summary;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "prodx-cli")]
#[command(about = "Extract structured product records from saved product pages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract one JSON record per saved HTML page
    Extract {
        /// Saved product page(s) to extract
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Source URL recorded in the output (single input only; defaults to `file://<path>`)
        #[arg(long)]
        url: Option<String>,

        /// Directory receiving JSON records (overrides `PRODX_OUTPUT_DIR`)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print a human-readable summary of each extracted product
        #[arg(long)]
        summary: bool,

        /// Print JSON records to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Parsed before configuration so `--help` works with a broken environment.
    let cli = Cli::parse();
    let config = prodx_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Some(Commands::Extract {
            inputs,
            url,
            output_dir,
            summary,
            stdout,
        }) => {
            let options = extract::ExtractOptions {
                url,
                output_dir: output_dir.unwrap_or_else(|| config.output_dir.clone()),
                summary,
                stdout,
                max_input_bytes: config.max_input_bytes,
            };
            extract::run_extract(&inputs, &options)?;
        }
        None => println!("prodx-cli ready; run `prodx-cli extract --help` for usage"),
    }

    Ok(())
}
