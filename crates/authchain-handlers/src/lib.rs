//! Authchain Handlers
//!
//! Companion crate to `authchain-core`:
//!
//! - **Mock**: a [`MockAuthenticator`] for wiring and testing chains
//!   without a real credential verifier
//! - **Config**: [`AuthConfig`] builds a wired manager from JSON
//!
//! Real credential verification (password hashing, token validation, OAuth)
//! lives in the host application, which implements
//! [`Authenticator`](authchain_core::Authenticator) for each strategy.
//!
//! ## Usage
//!
//! ```ignore
//! let manager = authchain_handlers::AuthConfig::from_env()?.build_manager()?;
//! let identity = manager.attempt(&Credentials::new().with("mock", "alice")).await?;
//! ```

pub mod config;
pub mod strategies;

pub use config::{AuthConfig, HandlerConfig, StrategyConfig};
pub use strategies::MockAuthenticator;
