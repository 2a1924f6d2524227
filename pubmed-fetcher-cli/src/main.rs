use anyhow::Result;
use clap::Parser;
use pubmed_fetcher::{report, PubMedClient};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pubmed-fetcher",
    about = "Fetch research papers from PubMed and flag industry-affiliated authors"
)]
struct Cli {
    /// Search query for PubMed
    query: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Write results as CSV to this file instead of printing them
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(filter))
        .init();

    debug!(query = %cli.query, "Fetching papers for query");

    let client = PubMedClient::new();
    let papers = client.fetch_papers(&cli.query).await?;

    match &cli.file {
        Some(path) => {
            report::write_csv(&papers, path)?;
            println!("Results saved to {}", path.display());
        }
        None => {
            for line in report::display_lines(&papers) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
