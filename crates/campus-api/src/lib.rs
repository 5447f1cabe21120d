//! Campus API Library
//!
//! HTTP surface of the submission and upload gateway: handlers, the
//! authorization gate, audit logging, and application setup.

pub mod constants;
mod handlers;
pub mod middleware;
pub mod setup;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
