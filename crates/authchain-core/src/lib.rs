//! # Authchain Core
//!
//! Named authentication handlers composed into a chain of responsibility.
//!
//! ## Key Concepts
//!
//! - **Authenticator**: a strategy that evaluates [`Credentials`] and either
//!   authenticates, rejects, or defers to the rest of the chain via [`Next`]
//! - **Dispatcher**: runs the ordered chain of authenticators
//! - **HandlerRegistry**: name → authenticator lookup table
//! - **AuthManager**: registers handlers into both and exposes `attempt`
//!
//! ## Usage
//!
//! ```ignore
//! use authchain_core::{AuthManager, Credentials};
//!
//! let mut manager = AuthManager::default();
//! manager
//!     .register("sso", sso_authenticator)?
//!     .register("local", password_authenticator)?;
//!
//! let identity = manager
//!     .attempt(&Credentials::new().with("username", "alice").with("password", "s3cret"))
//!     .await?;
//! println!("Principal: {}", identity.principal);
//! ```

pub mod authenticator;
pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod registry;
pub mod types;

pub use authenticator::{Authenticator, BoxOutcome, FnAuthenticator, Link, Next, Outcome};
pub use dispatcher::{ChainDispatcher, Dispatcher};
pub use error::{AuthError, Result};
pub use manager::AuthManager;
pub use registry::HandlerRegistry;
pub use types::{Credentials, Identity};

/// Create a manager around `dispatcher`, optionally seeded with a handler
/// container
pub fn create_manager<D: Dispatcher>(
    dispatcher: D,
    handlers: Option<HandlerRegistry>,
) -> Result<AuthManager<D>> {
    match handlers {
        Some(registry) => AuthManager::with_registry(dispatcher, registry),
        None => Ok(AuthManager::new(dispatcher)),
    }
}
