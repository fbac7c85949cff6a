use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::breed::{
    BreedImage, BreedUpdate, ClassificationResult, EnrichmentStatus, UpdatedField,
    PLACEHOLDER_INFO,
};
use crate::services::retry::{RetryExecutor, RetryPolicy};
use crate::services::sources::{EnrichmentError, ImageSource, InfoSource};

/// Every breed gets exactly two sample images; any other URL count from the
/// image source fails the attempt.
pub const IMAGES_PER_BREED: usize = 2;

/// Fans out per-breed enrichment jobs and publishes their terminal states.
///
/// For each ranked breed, two independent retry jobs run: one fetches the
/// Wikipedia summary, one fetches and resolves two sample images. Jobs never
/// touch the classification result directly; each terminal state is sent as
/// one `BreedUpdate` message carrying the complete new field-group, so
/// observers always see consistent snapshots. A job that exhausts its
/// retries falls back to placeholder content and is logged, never surfaced
/// as a pipeline failure.
pub struct EnrichmentCoordinator {
    info: Arc<dyn InfoSource>,
    images: Arc<dyn ImageSource>,
    executor: RetryExecutor,
    policy: RetryPolicy,
}

/// Live enrichment run: the update stream plus control over in-flight jobs.
#[derive(Debug)]
pub struct EnrichmentHandle {
    request_id: Uuid,
    events: UnboundedReceiver<BreedUpdate>,
    jobs: Vec<JoinHandle<()>>,
}

impl EnrichmentCoordinator {
    pub fn new(
        info: Arc<dyn InfoSource>,
        images: Arc<dyn ImageSource>,
        executor: RetryExecutor,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            info,
            images,
            executor,
            policy,
        }
    }

    /// Register metric descriptions with the installed recorder.
    pub fn describe_metrics() {
        metrics::describe_counter!(
            "enrichment_jobs_total",
            "Enrichment jobs scheduled across all classification runs"
        );
        metrics::describe_counter!(
            "enrichment_jobs_completed",
            "Enrichment jobs that loaded their content"
        );
        metrics::describe_counter!(
            "enrichment_jobs_failed",
            "Enrichment jobs that exhausted their retries"
        );
        metrics::describe_counter!(
            "enrichment_attempts_failed",
            "Individual failed enrichment attempts"
        );
    }

    /// Schedule both jobs for every breed in the result.
    ///
    /// Returns immediately; all jobs run concurrently on background tasks,
    /// bounded only by the executor pool. Each job emits exactly one update
    /// on reaching its terminal state, so a breed produces at most two
    /// updates per run.
    pub fn enrich(&self, result: &ClassificationResult) -> EnrichmentHandle {
        let (tx, events) = mpsc::unbounded_channel();
        let mut jobs = Vec::with_capacity(result.len() * 2);

        for (index, breed) in result.breeds.iter().enumerate() {
            jobs.push(self.spawn_info_job(
                result.request_id,
                index,
                breed.full_name(),
                tx.clone(),
            ));

            let (api_breed, api_sub_breed) = breed.api_breed_pair();
            jobs.push(self.spawn_images_job(
                result.request_id,
                index,
                api_breed,
                api_sub_breed,
                tx.clone(),
            ));
        }

        tracing::info!(
            request_id = %result.request_id,
            breeds = result.len(),
            jobs = jobs.len(),
            "enrichment fan-out scheduled"
        );

        EnrichmentHandle {
            request_id: result.request_id,
            events,
            jobs,
        }
    }

    fn spawn_info_job(
        &self,
        request_id: Uuid,
        index: usize,
        full_name: String,
        tx: UnboundedSender<BreedUpdate>,
    ) -> JoinHandle<()> {
        let info = Arc::clone(&self.info);
        let executor = self.executor.clone();
        let policy = self.policy;

        tokio::spawn(async move {
            metrics::counter!("enrichment_jobs_total").increment(1);

            let task_name = full_name.clone();
            let log_name = full_name.clone();
            let outcome = executor
                .run(
                    policy,
                    move |_attempt| {
                        let info = Arc::clone(&info);
                        let name = task_name.clone();
                        async move { info.fetch_info(&name).await }
                    },
                    move |attempt, err: &EnrichmentError| {
                        metrics::counter!("enrichment_attempts_failed").increment(1);
                        tracing::warn!(
                            breed = %log_name,
                            attempt,
                            error = %err,
                            "breed info fetch failed"
                        );
                    },
                )
                .await;

            let field = match outcome {
                Ok(text) => {
                    metrics::counter!("enrichment_jobs_completed").increment(1);
                    tracing::debug!(breed = %full_name, "breed info loaded");
                    UpdatedField::Info {
                        status: EnrichmentStatus::Loaded,
                        text,
                    }
                }
                Err(err) => {
                    metrics::counter!("enrichment_jobs_failed").increment(1);
                    tracing::warn!(
                        breed = %full_name,
                        error = %err,
                        "breed info enrichment gave up, keeping placeholder"
                    );
                    UpdatedField::Info {
                        status: EnrichmentStatus::FailedDefault,
                        text: PLACEHOLDER_INFO.to_string(),
                    }
                }
            };

            // Receiver gone means the run was superseded; the update is moot.
            let _ = tx.send(BreedUpdate {
                request_id,
                index,
                field,
            });
        })
    }

    fn spawn_images_job(
        &self,
        request_id: Uuid,
        index: usize,
        breed: String,
        sub_breed: String,
        tx: UnboundedSender<BreedUpdate>,
    ) -> JoinHandle<()> {
        let images = Arc::clone(&self.images);
        let executor = self.executor.clone();
        let policy = self.policy;

        tokio::spawn(async move {
            metrics::counter!("enrichment_jobs_total").increment(1);

            let task_breed = breed.clone();
            let task_sub_breed = sub_breed.clone();
            let log_breed = breed.clone();
            let outcome = executor
                .run(
                    policy,
                    move |_attempt| {
                        let images = Arc::clone(&images);
                        let breed = task_breed.clone();
                        let sub_breed = task_sub_breed.clone();
                        async move {
                            let urls = images
                                .fetch_image_urls(&breed, &sub_breed, IMAGES_PER_BREED)
                                .await?;
                            if urls.len() != IMAGES_PER_BREED {
                                return Err(EnrichmentError::WrongImageCount {
                                    expected: IMAGES_PER_BREED,
                                    got: urls.len(),
                                });
                            }
                            // Both images must resolve or the attempt fails
                            // as a whole.
                            let primary = images.fetch_image_bytes(&urls[0]).await?;
                            let secondary = images.fetch_image_bytes(&urls[1]).await?;
                            Ok((primary, secondary))
                        }
                    },
                    move |attempt, err: &EnrichmentError| {
                        metrics::counter!("enrichment_attempts_failed").increment(1);
                        tracing::warn!(
                            breed = %log_breed,
                            attempt,
                            error = %err,
                            "breed images fetch failed"
                        );
                    },
                )
                .await;

            let field = match outcome {
                Ok((primary, secondary)) => {
                    metrics::counter!("enrichment_jobs_completed").increment(1);
                    tracing::debug!(breed = %breed, "breed images loaded");
                    UpdatedField::Images {
                        status: EnrichmentStatus::Loaded,
                        primary: BreedImage::Fetched(primary),
                        secondary: BreedImage::Fetched(secondary),
                    }
                }
                Err(err) => {
                    metrics::counter!("enrichment_jobs_failed").increment(1);
                    tracing::warn!(
                        breed = %breed,
                        error = %err,
                        "breed images enrichment gave up, keeping placeholders"
                    );
                    UpdatedField::Images {
                        status: EnrichmentStatus::FailedDefault,
                        primary: BreedImage::Placeholder,
                        secondary: BreedImage::Placeholder,
                    }
                }
            };

            let _ = tx.send(BreedUpdate {
                request_id,
                index,
                field,
            });
        })
    }
}

impl EnrichmentHandle {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Receive the next terminal update, or `None` once every job has
    /// finished and all updates were consumed.
    pub async fn next_update(&mut self) -> Option<BreedUpdate> {
        self.events.recv().await
    }

    /// Abort all in-flight jobs of this run. Aborted jobs emit no update.
    ///
    /// Callers starting a new classification should cancel the previous
    /// handle so stale enrichment work stops competing for the pool.
    pub fn cancel(&self) {
        for job in &self.jobs {
            job.abort();
        }
    }

    /// Wait for every job to finish, then drain and return all updates.
    pub async fn join(mut self) -> Vec<BreedUpdate> {
        for job in self.jobs.drain(..) {
            // Aborted jobs resolve to a JoinError and emit no update.
            let _ = job.await;
        }

        let mut updates = Vec::new();
        while let Ok(update) = self.events.try_recv() {
            updates.push(update);
        }
        updates
    }
}
