pub mod growth;
pub mod trending;

pub use trending::{TrendObservation, TrendSnapshot, TrendingScorer, TrendingWeights};
