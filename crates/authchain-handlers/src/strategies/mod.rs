//! Authentication strategies

pub mod mock;

pub use mock::MockAuthenticator;
