//! Campus DB Library
//!
//! Persistence for the gateway: the two submission tables and the role lookup
//! behind the upload authorization gate.

pub mod db;

pub use db::{PostgresRoleStore, PostgresSubmissionStore, RoleStore, SubmissionStore};
