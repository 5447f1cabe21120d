//! Campus Storage Library
//!
//! Object storage for uploaded media. The gateway writes with its own
//! credentials; callers never receive direct write access.
//!
//! # Storage key format
//!
//! Every backend stores an object under `{bucket}/{filename}`. Keys must not
//! contain `..` or a leading `/`. Key generation lives in the `keys` module so
//! all backends stay consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use campus_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
