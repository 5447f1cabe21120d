//! Campus Core Library
//!
//! This crate provides the domain models, error types, configuration, and field
//! validation shared by every component of the submission and upload gateway.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, RateLimitConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AdmissionSubmission, AppRole, AuthenticatedUser, BucketConfig, BucketRegistry,
    ContactSubmission, NewAdmissionApplication, NewContactMessage,
};
pub use storage_types::StorageBackend;
