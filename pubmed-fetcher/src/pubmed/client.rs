use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::pubmed::models::Paper;
use crate::pubmed::parser::parse_papers_from_xml;
use crate::pubmed::responses::ESearchResult;
use reqwest::Client;
use tracing::{debug, info, warn};

/// Fixed cap on the number of search results requested per run
pub const RESULT_CAP: usize = 50;

/// Client for the PubMed E-utilities API
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
}

impl PubMedClient {
    /// Create a new client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_fetcher::PubMedClient;
    ///
    /// let client = PubMedClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_fetcher::{ClientConfig, PubMedClient};
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::new().with_timeout(Duration::from_secs(10));
    /// let client = PubMedClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let base_url = config.effective_base_url().to_string();

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Search PubMed for article identifiers matching a query
    ///
    /// Requests up to [`RESULT_CAP`] results in the database's default ranking
    /// order. A query with no matches returns an empty list.
    ///
    /// # Errors
    ///
    /// * [`PubMedError::RequestError`] - If the HTTP request fails
    /// * [`PubMedError::ApiError`] - On a non-success HTTP status
    /// * [`PubMedError::JsonError`] - If the response payload cannot be decoded
    pub async fn search_ids(&self, query: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmode=json&retmax={}",
            self.base_url,
            urlencoding::encode(query),
            RESULT_CAP
        );

        debug!("Making ESearch API request");
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            warn!(
                "Search API request failed with status: {}",
                response.status()
            );
            return Err(PubMedError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        let search_result: ESearchResult = response.json().await?;
        let pmids = search_result.esearchresult.idlist;

        info!(results_found = pmids.len(), "Search completed");

        Ok(pmids)
    }

    /// Fetch full article records in XML form for a list of PMIDs
    ///
    /// An empty identifier list returns an empty string with no network call.
    ///
    /// # Errors
    ///
    /// * [`PubMedError::RequestError`] - If the HTTP request fails
    /// * [`PubMedError::ApiError`] - On a non-success HTTP status
    pub async fn fetch_details(&self, pmids: &[String]) -> Result<String> {
        if pmids.is_empty() {
            debug!("No PMIDs to fetch, skipping EFetch request");
            return Ok(String::new());
        }

        let url = format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml",
            self.base_url,
            pmids.join(",")
        );

        debug!(pmid_count = pmids.len(), "Making EFetch API request");
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            warn!(
                "Fetch API request failed with status: {}",
                response.status()
            );
            return Err(PubMedError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Search for a query and return the extracted papers
    ///
    /// Chains [`search_ids`](Self::search_ids),
    /// [`fetch_details`](Self::fetch_details), and
    /// [`parse_papers_from_xml`] in sequence.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_fetcher::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let papers = client.fetch_papers("cancer immunotherapy").await?;
    ///     for paper in papers {
    ///         println!("{}", paper);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn fetch_papers(&self, query: &str) -> Result<Vec<Paper>> {
        let pmids = self.search_ids(query).await?;
        if pmids.is_empty() {
            return Ok(Vec::new());
        }
        let xml = self.fetch_details(&pmids).await?;
        parse_papers_from_xml(&xml)
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}
