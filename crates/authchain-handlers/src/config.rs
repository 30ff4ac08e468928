//! Declarative manager configuration
//!
//! Builds a fully wired [`AuthManager`] from a JSON document. Handlers are
//! registered in document order, which is also their chain order.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use authchain_core::{AuthError, AuthManager, ChainDispatcher, Link, Result};

use crate::strategies::mock::{MockAuthenticator, DEFAULT_MOCK_FIELD};

/// Environment variable holding the path of the configuration file
pub const CONFIG_ENV: &str = "AUTHCHAIN_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Maximum number of chain links; unbounded if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chain_length: Option<usize>,

    /// Handlers, in chain order
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

/// A named handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub name: String,

    #[serde(flatten)]
    pub strategy: StrategyConfig,
}

/// Strategy-specific settings, tagged by `strategy`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyConfig {
    Mock {
        #[serde(default = "default_mock_field")]
        field: String,
    },
}

fn default_mock_field() -> String {
    DEFAULT_MOCK_FIELD.to_string()
}

impl StrategyConfig {
    /// Name of the strategy, as written in the `strategy` tag
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyConfig::Mock { .. } => "mock",
        }
    }

    /// Instantiate the authenticator
    pub fn build(&self) -> Link {
        match self {
            StrategyConfig::Mock { field } => {
                Arc::new(MockAuthenticator::new().with_field(field.as_str()))
            }
        }
    }
}

impl AuthConfig {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AuthError::Config(e.to_string()))
    }

    /// Read and parse a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AuthError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Load the file named by `AUTHCHAIN_CONFIG`
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(CONFIG_ENV)
    }

    /// Load the file named by the given environment variable
    pub fn from_env_var(var: &str) -> Result<Self> {
        let path = env::var(var).map_err(|_| AuthError::Config(format!("{} is not set", var)))?;
        Self::from_file(path)
    }

    /// Build a manager with every configured handler registered
    pub fn build_manager(&self) -> Result<AuthManager> {
        let dispatcher = match self.max_chain_length {
            Some(max) => ChainDispatcher::new().with_max_links(max),
            None => ChainDispatcher::new(),
        };

        let mut manager = AuthManager::new(dispatcher);
        for handler in &self.handlers {
            manager.register_shared(handler.name.as_str(), handler.strategy.build())?;
        }

        info!(
            handlers = self.handlers.len(),
            max_chain_length = ?self.max_chain_length,
            "Built authentication manager from configuration"
        );

        Ok(manager)
    }
}
