use thiserror::Error;

/// Main error type for Kinpath
///
/// "No path found" is deliberately absent: a search that completes without
/// finding a qualifying path is a normal negative result (`distance = -1`,
/// `path = None`), not an error.
#[derive(Error, Debug)]
pub enum KinpathError {
    /// One of the requested people is unknown to the relationship provider
    #[error("Person not found: {0}")]
    PersonNotFound(String),

    /// Relationship filter spec could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenient Result type using KinpathError
pub type Result<T> = std::result::Result<T, KinpathError>;
