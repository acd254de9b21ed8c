//! KVP API server library.
//!
//! Exposes the building blocks (config, state, error handling, router,
//! mailer) so integration tests and the binary entrypoint can both access
//! them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod response;
pub mod router;
pub mod state;
