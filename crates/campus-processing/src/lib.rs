//! Upload content checks
//!
//! Everything an uploaded file must pass before it is handed to storage: the
//! bucket's size and declared-type policy, and the byte-signature check that ties
//! the declared type to the actual content.

pub mod magic;
pub mod mime;
pub mod validator;

pub use magic::{sniff_mime_type, validate_magic_bytes};
pub use mime::extension_for_mime;
pub use validator::{UploadValidator, ValidationError};
