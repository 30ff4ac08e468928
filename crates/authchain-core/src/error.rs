//! Error types for authentication handling

use thiserror::Error;

/// Result type for authchain operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while registering, looking up or running
/// authentication handlers
#[derive(Error, Debug)]
pub enum AuthError {
    /// No handler registered under the requested name
    #[error("Unknown authentication handler: {0}")]
    UnknownHandler(String),

    /// Handler name is empty or whitespace only
    #[error("Invalid authentication handler name: {0:?}")]
    InvalidHandlerName(String),

    /// The dispatcher refused another chain link
    #[error("Authentication chain is full ({max} handlers)")]
    ChainFull { max: usize },

    /// A handler explicitly rejected the credentials
    #[error("Authentication rejected: {0}")]
    Rejected(String),

    /// Credentials were recognised but do not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Every handler deferred and the chain ran out
    #[error("No authentication handler accepted the credentials")]
    Exhausted,

    /// Credential has expired
    #[error("Credential expired at {0}")]
    Expired(String),

    /// Submitted credentials are malformed
    #[error("Invalid credential format: {0}")]
    InvalidFormat(String),

    /// Credential backend failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this error means "not authenticated" rather than a failure
    /// of the handler machinery itself
    ///
    /// Malformed credentials come from the caller, so they count as a
    /// rejection.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::Rejected(_)
                | AuthError::InvalidCredentials
                | AuthError::Exhausted
                | AuthError::Expired(_)
                | AuthError::InvalidFormat(_)
        )
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::InvalidFormat(err.to_string())
    }
}
