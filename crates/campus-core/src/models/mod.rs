//! Domain models for the gateway

pub mod bucket;
pub mod role;
pub mod submission;

pub use bucket::{BucketConfig, BucketRegistry};
pub use role::{AppRole, AuthenticatedUser};
pub use submission::{
    AdmissionSubmission, ContactSubmission, NewAdmissionApplication, NewContactMessage,
};
