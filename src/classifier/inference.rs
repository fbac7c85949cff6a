use async_trait::async_trait;

use crate::classifier::preprocess::InputTensor;

/// Opaque model invocation boundary.
///
/// Given a normalized (1, 256, 256, 3) input tensor, returns one confidence
/// per label in the model's output order. The pipeline never inspects model
/// internals; implementations wrap whatever runtime actually executes the
/// network.
#[async_trait]
pub trait Inference: Send + Sync {
    async fn infer(&self, input: &InputTensor) -> Result<Vec<f32>, InferenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model invocation failed: {0}")]
    Model(String),
}
