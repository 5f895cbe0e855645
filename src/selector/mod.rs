pub mod builder;
pub mod escape;
pub mod matcher;
pub mod parser;
pub mod selector_model;
