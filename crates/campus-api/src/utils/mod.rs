pub mod ip_extraction;
pub mod submission;
pub mod upload;
