//! Dog Breed Classification Pipeline
//!
//! This library classifies a 256x256 dog photo into a ranked list of breeds
//! through an injected inference boundary, then concurrently enriches each
//! candidate with a Wikipedia summary and two sample images from dog.ceo.
//! Enrichment runs as a bounded-retry fan-out that tolerates partial
//! failure: a job that exhausts its retries degrades to placeholder content
//! without affecting the classification result.

pub mod classifier;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod services;
