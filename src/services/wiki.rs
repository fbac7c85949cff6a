use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::services::sources::{EnrichmentError, InfoSource};

/// Public Wikipedia API root.
pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org";

/// How many sentences of the article to request.
const MAX_SENTENCES: u32 = 7;

/// Wikipedia-backed breed info source.
///
/// Two-step flow: a search request resolves the breed name to the most
/// relevant page id, then an extracts request pulls the plain-text article
/// intro. Only the summary before the first section heading is returned.
pub struct WikiClient {
    http: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    pageid: u64,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: ExtractQuery,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    extract: Option<String>,
}

impl WikiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Breed names are searched as "Name_(dog)" to bias results towards the
    /// breed article rather than unrelated pages.
    fn search_term(full_breed_name: &str) -> String {
        format!("{}_(dog)", full_breed_name.replace(' ', "_"))
    }

    async fn search_page_id(&self, full_breed_name: &str) -> Result<u64, EnrichmentError> {
        let url = format!("{}/w/api.php", self.endpoint);
        let response: SearchResponse = self
            .http
            .get(&url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", &Self::search_term(full_breed_name)),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        first_page_id(&response).ok_or_else(|| {
            EnrichmentError::Parse(format!("no search results for \"{full_breed_name}\""))
        })
    }

    async fn fetch_extract(&self, page_id: u64) -> Result<String, EnrichmentError> {
        let url = format!("{}/w/api.php", self.endpoint);
        let response: ExtractResponse = self
            .http
            .get(&url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts"),
                ("exsentences", MAX_SENTENCES.to_string().as_str()),
                ("explaintext", "true"),
                ("pageids", page_id.to_string().as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        page_extract(response)
            .ok_or_else(|| EnrichmentError::Parse(format!("page {page_id} has no extract")))
    }
}

#[async_trait]
impl InfoSource for WikiClient {
    async fn fetch_info(&self, full_breed_name: &str) -> Result<String, EnrichmentError> {
        let page_id = self.search_page_id(full_breed_name).await?;
        tracing::debug!(breed = %full_breed_name, page_id, "resolved wikipedia page");

        let extract = self.fetch_extract(page_id).await?;
        Ok(summary_before_first_heading(&extract).to_string())
    }
}

fn first_page_id(response: &SearchResponse) -> Option<u64> {
    response.query.search.first().map(|hit| hit.pageid)
}

fn page_extract(response: ExtractResponse) -> Option<String> {
    response
        .query
        .pages
        .into_values()
        .find_map(|page| page.extract)
}

/// Keep only the article intro: everything before the first newline, which
/// in plain-text extracts marks the first section heading.
fn summary_before_first_heading(extract: &str) -> &str {
    match extract.find('\n') {
        Some(end) => &extract[..end],
        None => extract,
    }
}
