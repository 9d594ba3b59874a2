use thiserror::Error;

/// Fatal load-time configuration errors.
///
/// Anything here means no bracket (or group) was constructed at all; there
/// is never a partially-built result to recover.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bracket has no teams")]
    EmptyBracket,

    #[error("team count {0} is not a power of two")]
    TeamCountNotPowerOfTwo(usize),

    #[error("no rating found for team {0:?}")]
    MissingRating(String),

    #[error("malformed bracket snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("invalid override line {line:?}: {reason}")]
    InvalidOverride { line: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
