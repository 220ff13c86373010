use thiserror::Error;

/// Failure taxonomy for the service layer. Absent rows are not failures;
/// lookups, deletes and updates against a missing id return `Ok(None)`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before any persistence attempt.
    #[error("invalid input: {0}")]
    Invalid(&'static str),

    /// Registration hit an already-taken username.
    #[error("username is already taken")]
    UsernameTaken,

    /// Login failed. Deliberately silent on whether the username or the
    /// password was wrong.
    #[error("invalid username or password")]
    Unauthorized,

    /// The store itself failed (connectivity, constraint, poisoned lock).
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
