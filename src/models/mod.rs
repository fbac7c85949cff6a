pub mod breed;
pub mod labels;
