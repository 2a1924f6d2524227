//! # pubmed-fetcher
//!
//! Query PubMed for articles matching a search term and flag authors with
//! commercial/industry affiliations.
//!
//! The library searches the NCBI E-utilities ESearch endpoint for matching
//! PMIDs, fetches the full records from EFetch as XML, and extracts one
//! [`Paper`] per article: authors whose affiliation text contains one of the
//! fixed industry keywords are listed as non-academic, their affiliations are
//! collected (deduplicated), and the first email address found in any named
//! author's affiliation is reported.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_fetcher::PubMedClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::new();
//!     let papers = client.fetch_papers("cancer immunotherapy").await?;
//!
//!     for paper in &papers {
//!         println!("{}", paper);
//!     }
//!
//!     pubmed_fetcher::report::write_csv(&papers, "papers.csv")?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pubmed;
pub mod report;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use error::{PubMedError, Result};
pub use pubmed::{parse_papers_from_xml, Paper, PubMedClient, NON_ACADEMIC_KEYWORDS, RESULT_CAP};
