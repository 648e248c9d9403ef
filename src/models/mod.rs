pub mod base_model;
pub mod baseline;
pub mod options;
pub mod recommender;
