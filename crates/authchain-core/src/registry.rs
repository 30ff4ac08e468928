//! Name-keyed storage of authenticators

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::authenticator::{Authenticator, Link};

/// Lookup table from handler name to authenticator
///
/// The registry is not a chain: ordering of entries carries no meaning
/// beyond deterministic iteration by name.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Link>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a handler under `name`, returning the one it replaces
    pub fn set(&mut self, name: impl Into<String>, handler: Link) -> Option<Link> {
        self.handlers.insert(name.into(), handler)
    }

    /// Get the handler stored under `name`
    pub fn get(&self, name: &str) -> Option<Arc<dyn Authenticator>> {
        self.handlers.get(name).cloned()
    }

    /// Check if a handler is stored under `name`
    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Link)> {
        self.handlers.iter().map(|(name, handler)| (name.as_str(), handler))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(name, h)| (name, h.description())))
            .finish()
    }
}
