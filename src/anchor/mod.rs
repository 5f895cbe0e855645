pub mod anchor_model;
pub mod capture;
pub mod normalize;
pub mod resolver;
