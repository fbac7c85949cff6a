pub mod inference;
pub mod preprocess;
pub mod ranking;

use std::sync::Arc;

use image::RgbImage;

use crate::classifier::inference::{Inference, InferenceError};
use crate::classifier::preprocess::PreprocessError;
use crate::models::breed::ClassificationResult;
use crate::models::labels::LabelTables;

/// The synchronous classification stage: preprocess, infer, rank.
///
/// Explicitly constructed with its inference boundary and label tables;
/// one instance can serve many classification requests.
pub struct Classifier {
    inference: Arc<dyn Inference>,
    labels: LabelTables,
}

impl Classifier {
    pub fn new(inference: Arc<dyn Inference>, labels: LabelTables) -> Self {
        Self { inference, labels }
    }

    pub fn labels(&self) -> &LabelTables {
        &self.labels
    }

    /// Classify a 256x256 dog photo into a ranked breed list.
    ///
    /// Fatal errors (wrong dimensions, inference failure, label/vector
    /// length mismatch) abort the whole request before any breed exists.
    pub async fn classify(&self, image: &RgbImage) -> Result<ClassificationResult, ClassifyError> {
        let tensor = preprocess::preprocess(image)?;

        let confidences = self.inference.infer(&tensor).await?;
        tracing::debug!(
            outputs = confidences.len(),
            labels = self.labels.len(),
            "model inference complete"
        );

        let result = ranking::rank(&confidences, &self.labels)?;
        tracing::info!(
            request_id = %result.request_id,
            candidates = result.len(),
            "classification ranked"
        );
        Ok(result)
    }
}

/// Fatal, whole-pipeline classification errors.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("model returned {confidences} confidences for {labels} labels")]
    LabelMismatch { labels: usize, confidences: usize },
}
