//! Database repositories
//!
//! Each store is a trait so handlers can be exercised without a database; the
//! Postgres implementations are the production ones.

pub mod role;
pub mod submission;

pub use role::{PostgresRoleStore, RoleStore};
pub use submission::{PostgresSubmissionStore, SubmissionStore};
