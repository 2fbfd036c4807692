use clap::Parser;
use notion2anki::config::Config;
use notion2anki::{logging, pipeline};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "notion2anki")]
#[command(about = "Notion HTML database export to Anki-ready CSV converter")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the Notion HTML export
    input: PathBuf,
    /// Path of the CSV file to write
    output: PathBuf,
    /// Optional TOML config file (notion2anki.toml is picked up if present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Abort on the first defective row instead of skipping it
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.strict {
        config.strict = true;
    }

    println!("🔄 Converting {} ...", cli.input.display());
    match pipeline::convert_file(&cli.input, &cli.output, &config) {
        Ok(report) => {
            println!("\n📊 Conversion results:");
            println!("   Total rows: {}", report.total_rows);
            println!("   Converted: {}", report.converted);
            println!("   Skipped: {}", report.skipped);
            println!("   Output file: {}", report.output_file);

            if !report.errors.is_empty() {
                println!("\n⚠️  Rows skipped:");
                for err in &report.errors {
                    println!("   - {err}");
                }
            }
            println!("✅ Conversion completed successfully");
        }
        Err(e) => {
            error!("Conversion failed: {}", e);
            println!("❌ Conversion failed: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}
