//! Configuration module
//!
//! Settings are read from the process environment (after loading `.env` through
//! dotenvy), defaulted, and checked once at start-up by [`Config::validate`].

use std::env;

use crate::models::BucketRegistry;
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MIN_JWT_SECRET_LEN: usize = 32;

const CONTACT_RATE_LIMIT: u32 = 5;
const ADMISSION_RATE_LIMIT: u32 = 3;
const RATE_LIMIT_WINDOW_SECS: u64 = 3600;
const RATE_LIMIT_CLEANUP_INTERVAL_SECS: u64 = 300;
const RATE_LIMITER_SHARD_COUNT: usize = 16;
const RATE_LIMITER_MAX_ENTRIES: usize = 10_000;
const TRUSTED_PROXY_COUNT: usize = 1;

/// Headroom above the largest bucket for multipart framing and the `bucket` field
const BODY_LIMIT_HEADROOM_BYTES: usize = 1024 * 1024;

/// Quotas and housekeeping of the submission rate limiters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub contact_limit: u32,
    pub admission_limit: u32,
    pub window_secs: u64,
    /// Interval between expired-entry sweeps; 0 disables the sweep.
    pub cleanup_interval_secs: u64,
    pub shard_count: usize,
    /// Per-shard cap on tracked identities
    pub max_entries: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            contact_limit: CONTACT_RATE_LIMIT,
            admission_limit: ADMISSION_RATE_LIMIT,
            window_secs: RATE_LIMIT_WINDOW_SECS,
            cleanup_interval_secs: RATE_LIMIT_CLEANUP_INTERVAL_SECS,
            shard_count: RATE_LIMITER_SHARD_COUNT,
            max_entries: RATE_LIMITER_MAX_ENTRIES,
        }
    }
}

/// Gateway configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    /// One JSON object per log line (`LOG_FORMAT=json`)
    pub log_json: bool,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Identity service
    pub auth_jwt_secret: Option<String>,
    pub auth_url: Option<String>,
    pub auth_api_key: Option<String>,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_public_url: Option<String>,
    // Abuse prevention
    pub rate_limit: RateLimitConfig,
    /// Proxies in front of the gateway, each appending its peer to
    /// `X-Forwarded-For`. `0` means forwarding headers are ignored.
    pub trusted_proxy_count: usize,
    pub max_request_body_bytes: usize,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup and validate it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw
                .parse::<StorageBackend>()
                .map_err(|e| anyhow::anyhow!("STORAGE_BACKEND: {}", e))?,
            None => StorageBackend::Local,
        };

        let rate_limit = RateLimitConfig {
            contact_limit: var("CONTACT_RATE_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONTACT_RATE_LIMIT),
            admission_limit: var("ADMISSION_RATE_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(ADMISSION_RATE_LIMIT),
            window_secs: var("RATE_LIMIT_WINDOW_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(RATE_LIMIT_WINDOW_SECS),
            cleanup_interval_secs: var("RATE_LIMIT_CLEANUP_INTERVAL_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(RATE_LIMIT_CLEANUP_INTERVAL_SECS),
            shard_count: var("RATE_LIMITER_SHARD_COUNT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(RATE_LIMITER_SHARD_COUNT),
            max_entries: var("RATE_LIMITER_MAX_ENTRIES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(RATE_LIMITER_MAX_ENTRIES),
        };

        let default_body_limit =
            BucketRegistry::builtin().max_upload_size() + BODY_LIMIT_HEADROOM_BYTES;

        let config = Config {
            server_port: match var("PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => DEFAULT_PORT,
            },
            environment,
            log_json: var("LOG_FORMAT").is_some_and(|format| format.eq_ignore_ascii_case("json")),
            cors_origins,
            database_url: var("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            auth_jwt_secret: var("AUTH_JWT_SECRET"),
            auth_url: var("AUTH_URL").map(|url| url.trim_end_matches('/').to_string()),
            auth_api_key: var("AUTH_API_KEY"),
            storage_backend,
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            s3_public_url: var("S3_PUBLIC_URL"),
            rate_limit,
            trusted_proxy_count: var("TRUSTED_PROXY_COUNT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(TRUSTED_PROXY_COUNT),
            max_request_body_bytes: var("MAX_REQUEST_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(default_body_limit),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|origin| origin == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        match (&self.auth_url, &self.auth_jwt_secret) {
            (None, None) => {
                return Err(anyhow::anyhow!(
                    "AUTH_JWT_SECRET or AUTH_URL must be set for authentication"
                ));
            }
            (None, Some(secret)) if secret.len() < MIN_JWT_SECRET_LEN => {
                return Err(anyhow::anyhow!(
                    "AUTH_JWT_SECRET must be at least {} characters long",
                    MIN_JWT_SECRET_LEN
                ));
            }
            _ => {}
        }

        if self.rate_limit.contact_limit == 0 || self.rate_limit.admission_limit == 0 {
            return Err(anyhow::anyhow!("Rate limit quotas must be greater than zero"));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(anyhow::anyhow!(
                "RATE_LIMIT_WINDOW_SECS must be greater than zero"
            ));
        }
        if self.rate_limit.shard_count == 0 || self.rate_limit.max_entries == 0 {
            return Err(anyhow::anyhow!(
                "RATE_LIMITER_SHARD_COUNT and RATE_LIMITER_MAX_ENTRIES must be greater than zero"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
