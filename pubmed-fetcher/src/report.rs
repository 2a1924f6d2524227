//! Tabular output for extracted papers

use crate::error::Result;
use crate::pubmed::models::Paper;
use std::path::Path;
use tracing::info;

/// Column headers, in the fixed output order
pub const CSV_HEADERS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Write one CSV row per paper to `path`, header row first
///
/// Multi-valued fields are joined with `"; "` into a single cell.
pub fn write_csv<P: AsRef<Path>>(papers: &[Paper], path: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;

    writer.write_record(CSV_HEADERS)?;
    for paper in papers {
        let authors = paper.non_academic_authors.join("; ");
        let companies = paper.company_affiliations.join("; ");
        writer.write_record([
            paper.pmid.as_str(),
            paper.title.as_str(),
            paper.pub_date.as_str(),
            authors.as_str(),
            companies.as_str(),
            paper.email_or_sentinel(),
        ])?;
    }
    writer.flush()?;

    info!(
        papers_written = papers.len(),
        path = %path.as_ref().display(),
        "Wrote CSV report"
    );

    Ok(())
}

/// Render one human-readable line per paper, for console output
pub fn display_lines(papers: &[Paper]) -> Vec<String> {
    papers.iter().map(|paper| paper.to_string()).collect()
}
