use async_trait::async_trait;
use bytes::Bytes;

/// Source of descriptive text for a breed (Wikipedia in production).
#[async_trait]
pub trait InfoSource: Send + Sync {
    /// Fetch a short plain-text summary for the full breed name.
    async fn fetch_info(&self, full_breed_name: &str) -> Result<String, EnrichmentError>;
}

/// Source of sample breed imagery (dog.ceo in production).
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch `count` random image URLs for a breed/sub-breed pair. The
    /// sub-breed may be empty.
    async fn fetch_image_urls(
        &self,
        breed: &str,
        sub_breed: &str,
        count: usize,
    ) -> Result<Vec<String>, EnrichmentError>;

    /// Resolve one image URL to its bytes.
    async fn fetch_image_bytes(&self, url: &str) -> Result<Bytes, EnrichmentError>;
}

/// Per-job enrichment failures. All variants are retryable; they never
/// escape the job that observed them.
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("expected {expected} image urls, got {got}")]
    WrongImageCount { expected: usize, got: usize },
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EnrichmentError::Parse(err.to_string())
        } else {
            EnrichmentError::Network(err.to_string())
        }
    }
}
