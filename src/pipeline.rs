use std::sync::Arc;

use image::RgbImage;

use crate::classifier::inference::Inference;
use crate::classifier::{Classifier, ClassifyError};
use crate::config::AppConfig;
use crate::models::breed::ClassificationResult;
use crate::models::labels::LabelTables;
use crate::services::dog_images::DogImagesClient;
use crate::services::enrichment::{EnrichmentCoordinator, EnrichmentHandle};
use crate::services::retry::RetryExecutor;
use crate::services::wiki::WikiClient;

/// Composition root for the whole classification-and-enrichment pipeline.
///
/// Owns the synchronous classification stage and the enrichment fan-out;
/// one instance serves many requests. The inference boundary is injected,
/// everything else is wired from configuration.
pub struct ClassificationPipeline {
    classifier: Classifier,
    coordinator: EnrichmentCoordinator,
}

impl ClassificationPipeline {
    pub fn new(classifier: Classifier, coordinator: EnrichmentCoordinator) -> Self {
        Self {
            classifier,
            coordinator,
        }
    }

    /// Wire the production boundary clients from configuration.
    pub fn from_config(
        config: &AppConfig,
        inference: Arc<dyn Inference>,
        labels: LabelTables,
    ) -> Self {
        tracing::info!(
            wiki_endpoint = %config.wiki_endpoint,
            dog_api_endpoint = %config.dog_api_endpoint,
            max_concurrent_jobs = config.max_concurrent_jobs,
            "initializing classification pipeline"
        );

        EnrichmentCoordinator::describe_metrics();

        let wiki = Arc::new(WikiClient::new(config.wiki_endpoint.clone()));
        let dog_images = Arc::new(DogImagesClient::new(config.dog_api_endpoint.clone()));
        let executor = RetryExecutor::new(config.max_concurrent_jobs);
        let coordinator =
            EnrichmentCoordinator::new(wiki, dog_images, executor, config.retry_policy());

        Self::new(Classifier::new(inference, labels), coordinator)
    }

    /// Classify an image and schedule its enrichment fan-out.
    ///
    /// The classification stages run to completion before any enrichment
    /// job is scheduled; a fatal classification error means no jobs start.
    /// Callers superseding a previous request should `cancel()` that
    /// request's handle.
    pub async fn run(
        &self,
        image: &RgbImage,
    ) -> Result<(ClassificationResult, EnrichmentHandle), ClassifyError> {
        let result = self.classifier.classify(image).await?;
        let handle = self.coordinator.enrich(&result);
        Ok((result, handle))
    }
}
