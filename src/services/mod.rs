pub mod dog_images;
pub mod enrichment;
pub mod retry;
pub mod sources;
pub mod wiki;
