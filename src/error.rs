use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid tag name {name:?}: {reason}")]
    InvalidTagName { name: String, reason: &'static str },
    #[error("{field} out of range: {value} (expected {min} to {max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("invalid misleading pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
