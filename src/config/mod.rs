use std::time::Duration;

use serde::Deserialize;

use crate::services::retry::RetryPolicy;
use crate::services::{dog_images, wiki};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Wikipedia API root (override for testing against a local stub).
    #[serde(default = "default_wiki_endpoint")]
    pub wiki_endpoint: String,

    /// dog.ceo API root.
    #[serde(default = "default_dog_api_endpoint")]
    pub dog_api_endpoint: String,

    /// Attempts per enrichment job; -1 retries until success.
    #[serde(default = "default_enrichment_max_tries")]
    pub enrichment_max_tries: i64,

    /// Wait between attempts, in milliseconds.
    #[serde(default = "default_enrichment_wait_ms")]
    pub enrichment_wait_ms: u64,

    /// Upper bound on concurrently executing enrichment attempts.
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
}

fn default_wiki_endpoint() -> String {
    wiki::DEFAULT_ENDPOINT.to_string()
}

fn default_dog_api_endpoint() -> String {
    dog_images::DEFAULT_ENDPOINT.to_string()
}

fn default_enrichment_max_tries() -> i64 {
    3
}

fn default_enrichment_wait_ms() -> u64 {
    1000
}

fn default_max_concurrent_jobs() -> usize {
    16
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Retry policy for enrichment jobs.
    pub fn retry_policy(&self) -> RetryPolicy {
        let wait = Duration::from_millis(self.enrichment_wait_ms);
        if self.enrichment_max_tries < 0 {
            RetryPolicy::unlimited(wait)
        } else {
            let max_tries = u32::try_from(self.enrichment_max_tries).unwrap_or(u32::MAX);
            RetryPolicy::new(max_tries, wait)
        }
    }
}
