//! Collaborator wiring: stores, identity provider, rate limiters

use crate::auth::{IdentityProvider, JwtIdentityProvider, RemoteIdentityProvider};
use crate::state::AppState;
use anyhow::Result;
use campus_core::{BucketRegistry, Config};
use campus_db::{PostgresRoleStore, PostgresSubmissionStore};
use campus_infra::InMemoryRateLimiter;
use campus_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Limiters built for the form handlers, kept concrete so the eviction sweep
/// can reach them
pub struct SubmissionLimiters {
    pub contact: Arc<InMemoryRateLimiter>,
    pub admission: Arc<InMemoryRateLimiter>,
}

impl SubmissionLimiters {
    pub fn from_config(config: &Config) -> Self {
        let limits = &config.rate_limit;
        let window = Duration::from_secs(limits.window_secs);
        let build = |limit| {
            Arc::new(InMemoryRateLimiter::with_shards(
                limit,
                window,
                limits.shard_count,
                limits.max_entries,
            ))
        };

        tracing::info!(
            contact_limit = limits.contact_limit,
            admission_limit = limits.admission_limit,
            window_secs = limits.window_secs,
            shard_count = limits.shard_count,
            "Submission rate limiting enabled (per instance, in memory)"
        );

        Self {
            contact: build(limits.contact_limit),
            admission: build(limits.admission_limit),
        }
    }

    pub fn all(&self) -> Vec<Arc<InMemoryRateLimiter>> {
        vec![self.contact.clone(), self.admission.clone()]
    }
}

/// Pick the identity provider: the remote service when `AUTH_URL` is set,
/// local HS256 verification otherwise.
pub fn identity_provider(config: &Config) -> Result<Arc<dyn IdentityProvider>> {
    if let Some(auth_url) = &config.auth_url {
        tracing::info!(auth_url = %auth_url, "Resolving bearer tokens via identity service");
        return Ok(Arc::new(RemoteIdentityProvider::new(
            auth_url,
            config.auth_api_key.clone(),
        )?));
    }

    let secret = config
        .auth_jwt_secret
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("AUTH_JWT_SECRET must be set when AUTH_URL is not"))?;
    tracing::info!("Verifying bearer tokens locally (HS256)");
    Ok(Arc::new(JwtIdentityProvider::new(secret)))
}

/// Build the shared application state
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
    limiters: &SubmissionLimiters,
) -> Result<Arc<AppState>> {
    let identity = identity_provider(config)?;

    let buckets = BucketRegistry::builtin();
    tracing::info!(buckets = %buckets.names().join(","), "Upload buckets registered");

    Ok(Arc::new(AppState {
        config: config.clone(),
        submissions: Arc::new(PostgresSubmissionStore::new(pool.clone())),
        roles: Arc::new(PostgresRoleStore::new(pool)),
        storage,
        identity,
        contact_limiter: limiters.contact.clone(),
        admission_limiter: limiters.admission.clone(),
        buckets,
    }))
}
