//! Authentication manager - binds the handler registry to the dispatch chain

use std::sync::Arc;
use tracing::{info, warn};

use crate::authenticator::{Authenticator, Link, Outcome};
use crate::dispatcher::{ChainDispatcher, Dispatcher};
use crate::error::{AuthError, Result};
use crate::registry::HandlerRegistry;
use crate::types::Credentials;

/// Authentication manager
///
/// Every registered handler is both appended to the dispatcher's chain and
/// stored in the registry under its name. Lookups only ever see handlers
/// that made it into the chain.
///
/// Registration takes `&mut self` and attempts take `&self`, so handlers are
/// wired during setup and the manager can then be shared (e.g. in an `Arc`)
/// across concurrent attempts.
pub struct AuthManager<D: Dispatcher = ChainDispatcher> {
    dispatcher: D,
    handlers: HandlerRegistry,
}

impl<D: Dispatcher> AuthManager<D> {
    /// Create a manager with an empty handler registry
    pub fn new(dispatcher: D) -> Self {
        Self {
            dispatcher,
            handlers: HandlerRegistry::new(),
        }
    }

    /// Create a manager from an existing handler container
    ///
    /// Each entry is appended to the dispatcher's chain in name order. Fails
    /// if the dispatcher refuses any of them.
    pub fn with_registry(dispatcher: D, registry: HandlerRegistry) -> Result<Self> {
        let mut manager = Self::new(dispatcher);
        for (name, handler) in registry.iter() {
            manager.register_shared(name, handler.clone())?;
        }
        Ok(manager)
    }

    /// Register an authenticator under `name`
    ///
    /// Returns the manager so registrations can be chained:
    ///
    /// ```ignore
    /// manager
    ///     .register("sso", sso_authenticator)?
    ///     .register("local", password_authenticator)?;
    /// ```
    pub fn register<H: Authenticator + 'static>(
        &mut self,
        name: impl Into<String>,
        handler: H,
    ) -> Result<&mut Self> {
        self.register_shared(name, Arc::new(handler))
    }

    /// Register an already shared authenticator under `name`
    ///
    /// The link is appended to the chain first; the registry is only updated
    /// once the dispatcher has accepted it. Re-using a name replaces the
    /// lookup entry but the earlier link stays in the chain.
    pub fn register_shared(&mut self, name: impl Into<String>, handler: Link) -> Result<&mut Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AuthError::InvalidHandlerName(name));
        }

        let description = handler.description().to_string();
        if let Err(e) = self.dispatcher.register(handler.clone()) {
            warn!(handler = %name, error = %e, "Dispatcher refused authentication handler");
            return Err(e);
        }

        let replaced = self.handlers.set(name.clone(), handler).is_some();
        info!(
            handler = %name,
            description = %description,
            position = self.dispatcher.len().saturating_sub(1),
            replaced,
            "Registered authentication handler"
        );

        Ok(self)
    }

    /// Get a registered authenticator by name
    pub fn using(&self, name: &str) -> Result<Arc<dyn Authenticator>> {
        self.handlers
            .get(name)
            .ok_or_else(|| AuthError::UnknownHandler(name.to_string()))
    }

    /// Attempt to authenticate with the given credentials
    ///
    /// Runs the dispatcher's chain and returns its outcome untouched.
    pub async fn attempt(&self, credentials: &Credentials) -> Outcome {
        self.dispatcher.dispatch(credentials).await
    }

    /// Names of registered handlers, sorted
    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.names()
    }

    /// Number of links in the dispatch chain
    ///
    /// May exceed the number of names when a name was registered twice.
    pub fn chain_len(&self) -> usize {
        self.dispatcher.len()
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.handlers
    }
}

impl Default for AuthManager<ChainDispatcher> {
    fn default() -> Self {
        Self::new(ChainDispatcher::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authenticator::Next;
    use crate::types::Identity;
    use async_trait::async_trait;

    struct Fixed(&'static str);

    #[async_trait]
    impl Authenticator for Fixed {
        async fn process(&self, _credentials: &Credentials, _next: Next<'_>) -> Outcome {
            Ok(Identity::new(self.0))
        }

        fn description(&self) -> &str {
            self.0
        }
    }

    /// Dispatcher that accepts a fixed number of links, then fails
    struct Flaky {
        inner: ChainDispatcher,
        accept: usize,
    }

    #[async_trait]
    impl Dispatcher for Flaky {
        fn register(&mut self, link: Link) -> Result<()> {
            if self.inner.len() >= self.accept {
                return Err(AuthError::Internal("dispatcher offline".into()));
            }
            self.inner.register(link)
        }

        async fn dispatch(&self, credentials: &Credentials) -> Outcome {
            self.inner.dispatch(credentials).await
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[test]
    fn test_fluent_registration() {
        let mut manager: AuthManager = AuthManager::default();
        manager
            .register("a", Fixed("a"))
            .unwrap()
            .register("b", Fixed("b"))
            .unwrap();

        assert_eq!(manager.handler_names(), vec!["a", "b"]);
        assert_eq!(manager.chain_len(), 2);
    }

    #[test]
    fn test_using_returns_registered_instance() {
        let mut manager: AuthManager = AuthManager::default();
        let handler: Link = Arc::new(Fixed("local"));
        manager.register_shared("local", handler.clone()).unwrap();

        let found = manager.using("local").unwrap();
        assert!(Arc::ptr_eq(&found, &handler));
    }

    #[test]
    fn test_using_unknown_handler() {
        let manager: AuthManager = AuthManager::default();
        let err = manager.using("nonexistent").err().unwrap();

        assert!(matches!(&err, AuthError::UnknownHandler(name) if name == "nonexistent"));
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut manager: AuthManager = AuthManager::default();

        let err = manager.register("  ", Fixed("blank")).err().unwrap();
        assert!(matches!(err, AuthError::InvalidHandlerName(_)));
        assert_eq!(manager.chain_len(), 0);
        assert!(manager.handler_names().is_empty());
    }

    #[test]
    fn test_registration_is_atomic() {
        let mut manager = AuthManager::new(Flaky {
            inner: ChainDispatcher::new(),
            accept: 1,
        });
        manager.register("first", Fixed("first")).unwrap();

        let err = manager.register("second", Fixed("second")).err().unwrap();
        assert!(matches!(err, AuthError::Internal(_)));
        assert!(matches!(manager.using("second"), Err(AuthError::UnknownHandler(_))));
        assert_eq!(manager.chain_len(), 1);
    }

    #[test]
    fn test_with_registry_wires_chain() {
        let mut registry = HandlerRegistry::new();
        registry.set("b", Arc::new(Fixed("b")));
        registry.set("a", Arc::new(Fixed("a")));

        let manager = AuthManager::with_registry(ChainDispatcher::new(), registry).unwrap();
        assert_eq!(manager.chain_len(), 2);
        assert_eq!(manager.dispatcher().descriptions(), vec!["a", "b"]);
        assert!(manager.using("a").is_ok());
    }

    #[test]
    fn test_with_registry_respects_dispatcher_refusal() {
        let mut registry = HandlerRegistry::new();
        registry.set("a", Arc::new(Fixed("a")));
        registry.set("b", Arc::new(Fixed("b")));

        let result = AuthManager::with_registry(ChainDispatcher::new().with_max_links(1), registry);
        assert!(matches!(result, Err(AuthError::ChainFull { max: 1 })));
    }

    #[tokio::test]
    async fn test_attempt_passes_through() {
        let mut manager: AuthManager = AuthManager::default();
        manager.register("only", Fixed("only")).unwrap();

        let identity = manager.attempt(&Credentials::new()).await.unwrap();
        assert_eq!(identity.principal, "only");
    }
}
