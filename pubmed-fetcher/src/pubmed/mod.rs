//! PubMed search, fetch, and extraction
//!
//! - [`client`] - ESearch/EFetch HTTP operations
//! - [`parser`] - XML-to-[`Paper`] extraction and affiliation classification
//! - [`models`] - the [`Paper`] record
//! - `responses` - serde models for E-utilities JSON payloads

pub mod client;
pub mod models;
pub mod parser;
pub(crate) mod responses;

pub use client::{PubMedClient, RESULT_CAP};
pub use models::Paper;
pub use parser::{parse_papers_from_xml, NON_ACADEMIC_KEYWORDS};
