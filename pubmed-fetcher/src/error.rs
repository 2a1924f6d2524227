use thiserror::Error;

/// Error types for PubMed retrieval and extraction
#[derive(Error, Debug)]
pub enum PubMedError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Non-success response from the E-utilities API
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// XML parsing failed
    #[error("XML parsing error: {message}")]
    XmlParseError { message: String },

    /// Article record is missing a structurally required field
    #[error("article is missing required field: {field}")]
    MissingField { field: &'static str },

    /// IO error for file operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization failed
    #[error("CSV write failed: {0}")]
    CsvError(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PubMedError>;
