use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Default info text shown until the Wikipedia summary arrives (or forever,
/// if enrichment exhausts its retries).
pub const PLACEHOLDER_INFO: &str = "Loading...";

/// Enrichment state of one field-group (info text or image pair) on a breed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnrichmentStatus {
    /// Placeholder content, enrichment job still in flight.
    Pending,
    /// Fetched content has been published.
    Loaded,
    /// Enrichment gave up; placeholder content is permanent for this run.
    FailedDefault,
}

/// An image attached to a breed: either the shared placeholder asset or
/// bytes fetched from the image source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreedImage {
    Placeholder,
    Fetched(Bytes),
}

impl BreedImage {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, BreedImage::Placeholder)
    }
}

/// One ranked classification candidate.
///
/// `label`/`sub_label` come from splitting the display name on whitespace:
/// the first token is the primary breed, the remaining tokens form the
/// sub-breed qualifier ("Hound Afghan" -> "Hound" / "Afghan"). This matches
/// the breed/sub-breed path order of the dog.ceo API.
#[derive(Debug, Clone, Serialize)]
pub struct Breed {
    pub label: String,
    pub sub_label: String,
    /// Name from the API-facing label table, used for image lookups.
    pub api_label: String,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    pub info_status: EnrichmentStatus,
    pub images_status: EnrichmentStatus,
    pub info_text: String,
    #[serde(skip)]
    pub primary_image: BreedImage,
    #[serde(skip)]
    pub secondary_image: BreedImage,
}

impl Breed {
    /// Build a pending breed with placeholder content.
    pub fn new(display_label: &str, api_label: &str, confidence: f64) -> Self {
        let (label, sub_label) = split_breed_name(display_label);
        Self {
            label,
            sub_label,
            api_label: api_label.to_string(),
            confidence,
            info_status: EnrichmentStatus::Pending,
            images_status: EnrichmentStatus::Pending,
            info_text: PLACEHOLDER_INFO.to_string(),
            primary_image: BreedImage::Placeholder,
            secondary_image: BreedImage::Placeholder,
        }
    }

    /// Full display name, e.g. "Hound Afghan" or "Beagle".
    pub fn full_name(&self) -> String {
        if self.sub_label.is_empty() {
            self.label.clone()
        } else {
            format!("{} {}", self.label, self.sub_label)
        }
    }

    /// Breed/sub-breed pair for the image source, derived from the
    /// API-facing label with the same splitting rule as the display name.
    pub fn api_breed_pair(&self) -> (String, String) {
        split_breed_name(&self.api_label)
    }
}

/// Split a breed display name into (breed, sub-breed). Single-token names
/// have an empty sub-breed.
fn split_breed_name(full_name: &str) -> (String, String) {
    let mut words = full_name.split_whitespace();
    let breed = words.next().unwrap_or_default().to_string();
    let sub_breed = words.collect::<Vec<_>>().join(" ");
    (breed, sub_breed)
}

/// Terminal enrichment message for one breed field-group.
///
/// Carries the complete new content of the field-group so receivers always
/// observe a consistent snapshot, never a partial write.
#[derive(Debug, Clone)]
pub struct BreedUpdate {
    /// The classification run this update belongs to.
    pub request_id: Uuid,
    /// Index of the breed in the ranked result.
    pub index: usize,
    pub field: UpdatedField,
}

/// The field-group mutated by a finished enrichment job.
#[derive(Debug, Clone)]
pub enum UpdatedField {
    Info {
        status: EnrichmentStatus,
        text: String,
    },
    Images {
        status: EnrichmentStatus,
        primary: BreedImage,
        secondary: BreedImage,
    },
}

/// Ordered classification outcome for one request.
///
/// Breeds are sorted descending by confidence at construction and never
/// re-sorted; enrichment only ever touches the per-breed content fields.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    pub request_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub breeds: Vec<Breed>,
}

impl ClassificationResult {
    pub fn new(breeds: Vec<Breed>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            created_at: Utc::now(),
            breeds,
        }
    }

    pub fn len(&self) -> usize {
        self.breeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breeds.is_empty()
    }

    /// Fold a terminal enrichment message into the owned snapshot.
    ///
    /// Updates from a different run or with an out-of-range index are
    /// ignored (stale messages from a superseded classification).
    pub fn apply(&mut self, update: &BreedUpdate) {
        if update.request_id != self.request_id {
            return;
        }
        let Some(breed) = self.breeds.get_mut(update.index) else {
            return;
        };
        match &update.field {
            UpdatedField::Info { status, text } => {
                breed.info_status = *status;
                breed.info_text = text.clone();
            }
            UpdatedField::Images {
                status,
                primary,
                secondary,
            } => {
                breed.images_status = *status;
                breed.primary_image = primary.clone();
                breed.secondary_image = secondary.clone();
            }
        }
    }
}
