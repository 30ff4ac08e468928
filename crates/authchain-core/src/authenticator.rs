//! The authenticator contract and the chain continuation

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::error::{AuthError, Result};
use crate::types::{Credentials, Identity};

/// Result of running an authenticator or a whole chain
pub type Outcome = Result<Identity>;

/// A shared chain link
pub type Link = Arc<dyn Authenticator>;

/// Trait for authentication strategies
///
/// An authenticator receives the credentials and the rest of the chain.
/// It can:
/// - return `Ok(identity)` to authenticate and stop the chain
/// - return `Err(..)` to reject (or fail) and stop the chain
/// - call `next.run(credentials).await` to defer to the following handlers,
///   optionally inspecting or transforming what they produce
///
/// Implementations must be re-entrant: the same instance may serve many
/// concurrent attempts.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn process(&self, credentials: &Credentials, next: Next<'_>) -> Outcome;

    /// Get a description of this authenticator (for logging)
    fn description(&self) -> &str {
        "authenticator"
    }
}

/// Continuation over the remaining chain links
///
/// `Next` is a cursor into an ordered slice of links. Running it invokes
/// the link under the cursor with a continuation advanced by one. It is
/// consumed by [`Next::run`], so a handler can continue the chain at most
/// once per attempt.
pub struct Next<'a> {
    chain: &'a [Link],
    cursor: usize,
}

impl<'a> Next<'a> {
    /// Start a walk at the head of `chain`
    pub fn new(chain: &'a [Link]) -> Self {
        Self { chain, cursor: 0 }
    }

    /// Position of the link this continuation will invoke
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Number of links not yet reached
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.cursor)
    }

    /// Hand control to the rest of the chain
    ///
    /// Resolves to [`AuthError::Exhausted`] when no links remain.
    pub async fn run(self, credentials: &Credentials) -> Outcome {
        let Some(link) = self.chain.get(self.cursor) else {
            debug!(links = self.chain.len(), "Authentication chain exhausted");
            return Err(AuthError::Exhausted);
        };

        debug!(
            position = self.cursor,
            description = link.description(),
            "Evaluating authenticator"
        );

        let next = Next {
            chain: self.chain,
            cursor: self.cursor + 1,
        };
        link.process(credentials, next).await
    }
}

/// Adapter turning an async closure into an [`Authenticator`]
///
/// ```ignore
/// let deny_all = FnAuthenticator::new("deny-all", |_creds, _next| {
///     Box::pin(async { Err(AuthError::Rejected("closed".into())) })
/// });
/// ```
pub struct FnAuthenticator<F> {
    description: String,
    func: F,
}

impl<F> FnAuthenticator<F>
where
    F: for<'a> Fn(&'a Credentials, Next<'a>) -> BoxOutcome<'a> + Send + Sync,
{
    pub fn new(description: impl Into<String>, func: F) -> Self {
        Self {
            description: description.into(),
            func,
        }
    }
}

/// Boxed future returned by closures wrapped in [`FnAuthenticator`]
pub type BoxOutcome<'a> =
    std::pin::Pin<Box<dyn std::future::Future<Output = Outcome> + Send + 'a>>;

#[async_trait]
impl<F> Authenticator for FnAuthenticator<F>
where
    F: for<'a> Fn(&'a Credentials, Next<'a>) -> BoxOutcome<'a> + Send + Sync,
{
    async fn process(&self, credentials: &Credentials, next: Next<'_>) -> Outcome {
        (self.func)(credentials, next).await
    }

    fn description(&self) -> &str {
        &self.description
    }
}
