//! Shared mock boundaries for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use breed_classify::classifier::inference::{Inference, InferenceError};
use breed_classify::classifier::preprocess::InputTensor;
use breed_classify::services::sources::{EnrichmentError, ImageSource, InfoSource};
use bytes::Bytes;

/// Initialize test logging once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}

/// Inference stub returning a fixed confidence vector.
pub struct FixedInference {
    pub confidences: Vec<f32>,
}

#[async_trait]
impl Inference for FixedInference {
    async fn infer(&self, _input: &InputTensor) -> Result<Vec<f32>, InferenceError> {
        Ok(self.confidences.clone())
    }
}

/// Inference stub that always fails.
pub struct BrokenInference;

#[async_trait]
impl Inference for BrokenInference {
    async fn infer(&self, _input: &InputTensor) -> Result<Vec<f32>, InferenceError> {
        Err(InferenceError::Model("model file corrupted".to_string()))
    }
}

/// Info source that fails its first `fail_first` calls, then returns fixed
/// text. Counts every call.
pub struct ScriptedInfoSource {
    pub fail_first: usize,
    pub text: String,
    pub calls: AtomicUsize,
}

impl ScriptedInfoSource {
    pub fn succeeding(text: &str) -> Self {
        Self {
            fail_first: 0,
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_first(fail_first: usize, text: &str) -> Self {
        Self {
            fail_first,
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always_failing() -> Self {
        Self {
            fail_first: usize::MAX,
            text: String::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InfoSource for ScriptedInfoSource {
    async fn fetch_info(&self, full_breed_name: &str) -> Result<String, EnrichmentError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            Err(EnrichmentError::Network(format!(
                "wiki unavailable for {full_breed_name}"
            )))
        } else {
            Ok(self.text.clone())
        }
    }
}

/// Image source whose URL count per call follows a script (the last entry
/// repeats forever). Byte resolution can be made to fail.
pub struct ScriptedImageSource {
    pub url_counts: Vec<usize>,
    pub fail_bytes: bool,
    pub url_calls: AtomicUsize,
    pub byte_calls: AtomicUsize,
}

impl ScriptedImageSource {
    pub fn well_behaved() -> Self {
        Self::with_url_counts(vec![2])
    }

    pub fn with_url_counts(url_counts: Vec<usize>) -> Self {
        Self {
            url_counts,
            fail_bytes: false,
            url_calls: AtomicUsize::new(0),
            byte_calls: AtomicUsize::new(0),
        }
    }

    pub fn broken_bytes() -> Self {
        Self {
            fail_bytes: true,
            ..Self::well_behaved()
        }
    }

    pub fn url_call_count(&self) -> usize {
        self.url_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for ScriptedImageSource {
    async fn fetch_image_urls(
        &self,
        breed: &str,
        sub_breed: &str,
        _count: usize,
    ) -> Result<Vec<String>, EnrichmentError> {
        let call = self.url_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = *self
            .url_counts
            .get(call)
            .or(self.url_counts.last())
            .unwrap_or(&2);

        let name = if sub_breed.is_empty() {
            breed.to_string()
        } else {
            format!("{breed}/{sub_breed}")
        };
        Ok((0..scripted)
            .map(|i| format!("https://images.test/{name}/{i}.jpg"))
            .collect())
    }

    async fn fetch_image_bytes(&self, url: &str) -> Result<Bytes, EnrichmentError> {
        self.byte_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_bytes {
            Err(EnrichmentError::Network(format!("cannot resolve {url}")))
        } else {
            Ok(Bytes::from(format!("bytes of {url}")))
        }
    }
}

/// Info source that never responds; used to verify cancellation.
pub struct StalledInfoSource;

#[async_trait]
impl InfoSource for StalledInfoSource {
    async fn fetch_info(&self, _full_breed_name: &str) -> Result<String, EnrichmentError> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Err(EnrichmentError::Network("unreachable".to_string()))
    }
}

/// Image source that never responds; used to verify cancellation.
pub struct StalledImageSource;

#[async_trait]
impl ImageSource for StalledImageSource {
    async fn fetch_image_urls(
        &self,
        _breed: &str,
        _sub_breed: &str,
        _count: usize,
    ) -> Result<Vec<String>, EnrichmentError> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Err(EnrichmentError::Network("unreachable".to_string()))
    }

    async fn fetch_image_bytes(&self, _url: &str) -> Result<Bytes, EnrichmentError> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Err(EnrichmentError::Network("unreachable".to_string()))
    }
}
