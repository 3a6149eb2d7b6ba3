//! Credential and bearer-token primitives used by the lifecycle manager.

pub mod secret;
pub mod token;

pub use secret::{Credential, TokenSecret};
pub use token::{BearerToken, TokenState};
