//! Dispatcher contract and the default in-process chain dispatcher

use async_trait::async_trait;
use tracing::{info, warn};

use crate::authenticator::{Link, Next, Outcome};
use crate::error::{AuthError, Result};
use crate::types::Credentials;

/// Executes an ordered chain of authenticators with continuation semantics
///
/// The manager only appends links and asks for a dispatch. How the chain is
/// walked is up to the implementation, as long as:
/// - links run in the order they were registered
/// - a link that does not continue stops the walk
/// - an exhausted chain produces a rejection
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Append a link to the end of the chain
    ///
    /// An error means the link was not added.
    fn register(&mut self, link: Link) -> Result<()>;

    /// Run the chain against the credentials
    async fn dispatch(&self, credentials: &Credentials) -> Outcome;

    /// Number of links in the chain
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Vector-backed dispatcher walking links with a [`Next`] cursor
#[derive(Default)]
pub struct ChainDispatcher {
    links: Vec<Link>,
    max_links: Option<usize>,
}

impl ChainDispatcher {
    /// Create an unbounded dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the chain length; `register` fails once the cap is reached
    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.max_links = Some(max_links);
        self
    }

    /// Descriptions of the links, in chain order
    pub fn descriptions(&self) -> Vec<&str> {
        self.links.iter().map(|link| link.description()).collect()
    }
}

#[async_trait]
impl Dispatcher for ChainDispatcher {
    fn register(&mut self, link: Link) -> Result<()> {
        if let Some(max) = self.max_links {
            if self.links.len() >= max {
                return Err(AuthError::ChainFull { max });
            }
        }
        self.links.push(link);
        Ok(())
    }

    async fn dispatch(&self, credentials: &Credentials) -> Outcome {
        let result = Next::new(&self.links).run(credentials).await;

        match &result {
            Ok(identity) => {
                info!(
                    principal = %identity.principal,
                    authenticated_by = ?identity.authenticated_by,
                    "Authentication succeeded"
                );
            }
            Err(e) => {
                warn!(error = %e, rejection = e.is_rejection(), "Authentication failed");
            }
        }

        result
    }

    fn len(&self) -> usize {
        self.links.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authenticator::Authenticator;
    use crate::types::Identity;
    use std::sync::Arc;

    struct Named(&'static str);

    #[async_trait]
    impl Authenticator for Named {
        async fn process(&self, _credentials: &Credentials, _next: Next<'_>) -> Outcome {
            Ok(Identity::new(self.0))
        }

        fn description(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_register_appends_in_order() {
        let mut dispatcher = ChainDispatcher::new();
        dispatcher.register(Arc::new(Named("first"))).unwrap();
        dispatcher.register(Arc::new(Named("second"))).unwrap();

        assert_eq!(dispatcher.len(), 2);
        assert_eq!(dispatcher.descriptions(), vec!["first", "second"]);
    }

    #[test]
    fn test_max_links() {
        let mut dispatcher = ChainDispatcher::new().with_max_links(1);
        dispatcher.register(Arc::new(Named("first"))).unwrap();

        let err = dispatcher.register(Arc::new(Named("second"))).unwrap_err();
        assert!(matches!(err, AuthError::ChainFull { max: 1 }));
        assert_eq!(dispatcher.len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_first_link_wins() {
        let mut dispatcher = ChainDispatcher::new();
        dispatcher.register(Arc::new(Named("first"))).unwrap();
        dispatcher.register(Arc::new(Named("second"))).unwrap();

        let identity = dispatcher.dispatch(&Credentials::new()).await.unwrap();
        assert_eq!(identity.principal, "first");
    }

    #[tokio::test]
    async fn test_dispatch_empty_chain() {
        let dispatcher = ChainDispatcher::new();
        assert!(dispatcher.is_empty());

        let result = dispatcher.dispatch(&Credentials::new()).await;
        assert!(matches!(result, Err(AuthError::Exhausted)));
    }
}
