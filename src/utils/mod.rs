pub mod accuracy;
pub mod trainset;
