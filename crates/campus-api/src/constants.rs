//! Route paths and client-facing messages shared by handlers and tests

// Paths the site's browser code already calls
pub const SUBMIT_CONTACT_PATH: &str = "/functions/v1/submit-contact";
pub const SUBMIT_ADMISSION_PATH: &str = "/functions/v1/submit-admission";
pub const UPLOAD_MEDIA_PATH: &str = "/functions/v1/upload-media";

pub const CONTACT_SUCCESS_MESSAGE: &str =
    "Thank you for your message! We will get back to you soon.";
pub const CONTACT_FAILURE_MESSAGE: &str = "Failed to submit message. Please try again later.";

pub const ADMISSION_SUCCESS_MESSAGE: &str =
    "Your application has been submitted successfully! We will contact you soon.";
pub const ADMISSION_FAILURE_MESSAGE: &str =
    "Failed to submit application. Please try again later.";

pub const UPLOAD_FAILURE_MESSAGE: &str = "Failed to upload file";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub const ADMIN_REQUIRED_MESSAGE: &str = "Admin access required";
