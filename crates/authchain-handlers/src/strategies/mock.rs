//! Mock Authenticator
//!
//! For testing purposes - accepts mock credentials.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use authchain_core::{AuthError, Authenticator, Credentials, Identity, Next, Outcome};

/// Default credentials key read by the mock authenticator
pub const DEFAULT_MOCK_FIELD: &str = "mock";

/// Mock authenticator for testing
///
/// Reads the `mock` key, accepting:
/// - "principal" - Authenticates that principal with all scopes
/// - "principal:scope1,scope2" - Authenticates with specific scopes
/// - "FAIL:message" - Rejects with the given message
///
/// Defers when the key is absent.
pub struct MockAuthenticator {
    field: String,
}

impl MockAuthenticator {
    pub fn new() -> Self {
        Self {
            field: DEFAULT_MOCK_FIELD.to_string(),
        }
    }

    /// Read from another credentials key
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    fn parse(credential: &str) -> Outcome {
        if let Some(message) = credential.strip_prefix("FAIL:") {
            return Err(AuthError::Rejected(message.to_string()));
        }

        let (principal_name, scopes): (&str, Vec<String>) = match credential.split_once(':') {
            Some((name, scopes)) if !scopes.is_empty() => (
                name,
                scopes.split(',').map(|s| s.trim().to_string()).collect(),
            ),
            Some((name, _)) => (name, vec!["*".to_string()]),
            None => (credential, vec!["*".to_string()]),
        };

        if principal_name.is_empty() {
            return Err(AuthError::InvalidFormat("Mock credential cannot be empty".into()));
        }

        Ok(Identity::new(format!("mock:{}", principal_name))
            .with_scopes(scopes)
            .with_expires_at(Utc::now() + Duration::hours(1))
            .with_issuer("mock")
            .with_claim("mock", serde_json::json!(true))
            .authenticated_by("mock"))
    }
}

impl Default for MockAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn process(&self, credentials: &Credentials, next: Next<'_>) -> Outcome {
        match credentials.get_str(&self.field) {
            Some(credential) => Self::parse(credential),
            None => next.run(credentials).await,
        }
    }

    fn description(&self) -> &str {
        "mock authenticator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_credential() {
        let identity = MockAuthenticator::parse("alice").unwrap();
        assert_eq!(identity.principal, "mock:alice");
        assert_eq!(identity.scopes, vec!["*"]);
    }

    #[test]
    fn test_credential_with_scopes() {
        let identity = MockAuthenticator::parse("bob:read:claims:*,write:data:*").unwrap();
        assert_eq!(identity.principal, "mock:bob");
        assert_eq!(identity.scopes, vec!["read:claims:*", "write:data:*"]);
    }

    #[test]
    fn test_explicit_failure() {
        match MockAuthenticator::parse("FAIL:test error") {
            Err(AuthError::Rejected(msg)) => assert_eq!(msg, "test error"),
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_credential() {
        let err = MockAuthenticator::parse("").unwrap_err();
        assert!(matches!(err, AuthError::InvalidFormat(_)));
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn test_absent_field_defers() {
        let chain: Vec<authchain_core::Link> = vec![std::sync::Arc::new(MockAuthenticator::new())];
        let result = Next::new(&chain).run(&Credentials::new()).await;
        assert!(matches!(result, Err(AuthError::Exhausted)));
    }
}
