pub mod classifier;
pub mod transcript;
