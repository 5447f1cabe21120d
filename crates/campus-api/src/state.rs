//! Application state shared by every handler.
//!
//! Collaborators are held behind traits so tests can swap in doubles and a
//! deployment can replace the in-memory limiters with a shared counter.

use crate::auth::IdentityProvider;
use campus_core::{BucketRegistry, Config};
use campus_db::{RoleStore, SubmissionStore};
use campus_infra::RateLimiter;
use campus_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub submissions: Arc<dyn SubmissionStore>,
    pub roles: Arc<dyn RoleStore>,
    /// Written with the gateway's own credentials, never the caller's
    pub storage: Arc<dyn Storage>,
    pub identity: Arc<dyn IdentityProvider>,
    pub contact_limiter: Arc<dyn RateLimiter>,
    pub admission_limiter: Arc<dyn RateLimiter>,
    pub buckets: BucketRegistry,
}

impl AppState {
    pub fn trusted_proxy_count(&self) -> usize {
        self.config.trusted_proxy_count
    }
}
