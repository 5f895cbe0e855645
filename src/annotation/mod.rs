pub mod annotation_model;
pub mod resolution;
pub mod styles;
