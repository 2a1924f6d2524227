use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used when an article carries no publication year
pub const UNKNOWN_DATE: &str = "Unknown";

/// Sentinel used when no author affiliation contains an email address
pub const NO_EMAIL: &str = "N/A";

/// One PubMed article with its industry-affiliation report fields
///
/// Built once from parsed EFetch XML and only read afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Paper {
    /// PubMed ID
    pub pmid: String,
    /// Article title
    pub title: String,
    /// Publication year, or `"Unknown"` if the article has none
    pub pub_date: String,
    /// Full names of authors whose affiliation matched an industry keyword,
    /// in document order
    pub non_academic_authors: Vec<String>,
    /// Distinct affiliation strings of those authors, first-seen order
    pub company_affiliations: Vec<String>,
    /// First email address found in any named author's affiliation text
    pub corresponding_email: Option<String>,
}

impl Paper {
    /// Email rendered for output, substituting the `"N/A"` sentinel
    pub fn email_or_sentinel(&self) -> &str {
        self.corresponding_email.as_deref().unwrap_or(NO_EMAIL)
    }
}

impl fmt::Display for Paper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PubmedID: {} | Title: {} | Publication Date: {} | Non-academic Author(s): {} | Company Affiliation(s): {} | Corresponding Author Email: {}",
            self.pmid,
            self.title,
            self.pub_date,
            self.non_academic_authors.join("; "),
            self.company_affiliations.join("; "),
            self.email_or_sentinel(),
        )
    }
}
