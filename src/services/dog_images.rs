use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;

use crate::services::sources::{EnrichmentError, ImageSource};

/// Public dog.ceo API root.
pub const DEFAULT_ENDPOINT: &str = "https://dog.ceo";

/// dog.ceo-backed breed image source.
pub struct DogImagesClient {
    http: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct RandomImagesResponse {
    message: Vec<String>,
    status: String,
}

impl DogImagesClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint for random images of a breed; the sub-breed path segment is
    /// only present for breeds that have one.
    fn random_images_url(&self, breed: &str, sub_breed: &str, count: usize) -> String {
        let breed = breed.to_lowercase();
        if sub_breed.is_empty() {
            format!("{}/api/breed/{breed}/images/random/{count}", self.endpoint)
        } else {
            let sub_breed = sub_breed.to_lowercase();
            format!(
                "{}/api/breed/{breed}/{sub_breed}/images/random/{count}",
                self.endpoint
            )
        }
    }
}

#[async_trait]
impl ImageSource for DogImagesClient {
    async fn fetch_image_urls(
        &self,
        breed: &str,
        sub_breed: &str,
        count: usize,
    ) -> Result<Vec<String>, EnrichmentError> {
        let url = self.random_images_url(breed, sub_breed, count);
        let response: RandomImagesResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "success" {
            return Err(EnrichmentError::Parse(format!(
                "dog.ceo returned status \"{}\"",
                response.status
            )));
        }
        Ok(response.message)
    }

    async fn fetch_image_bytes(&self, url: &str) -> Result<Bytes, EnrichmentError> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes)
    }
}
