//! Security audit logging
//!
//! Structured records for security-relevant gateway events:
//! - Media uploads
//! - Rate limit violations
//! - Authentication failures and authorization denials
//! - Content-integrity violations (spoofed file signatures)
//! - Honeypot hits
//!
//! Records go to the `audit` tracing target as one JSON document each. Audit
//! logging is best effort: it never fails the request that triggered it.

use serde::Serialize;
use uuid::Uuid;

/// Audit event types for categorization
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    FileUploaded,
    RateLimitExceeded,
    AuthenticationFailure,
    AuthorizationDenied,
    ContentIntegrityViolation,
    HoneypotTriggered,
}

/// Structured audit log entry
#[derive(Debug, Serialize)]
pub struct AuditLogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub event_type: AuditEventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AuditLogEntry {
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            event_type,
            user_id: None,
            client_ip: None,
            request_path: None,
            details: None,
            success: true,
            error_message: None,
        }
    }

    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_client_ip(mut self, client_ip: &str) -> Self {
        self.client_ip = Some(client_ip.to_string());
        self
    }

    pub fn with_request_path(mut self, path: &str) -> Self {
        self.request_path = Some(path.to_string());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Mark as failure
    pub fn with_failure(mut self, error_message: impl Into<String>) -> Self {
        self.success = false;
        self.error_message = Some(error_message.into());
        self
    }

    /// Emit the entry on the `audit` target. Failures are logged at WARN.
    pub fn log(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, event_type = ?self.event_type, "Failed to serialize audit entry");
                return;
            }
        };

        if self.success {
            tracing::event!(
                target: "audit",
                tracing::Level::INFO,
                audit_entry = %json,
                event_type = ?self.event_type,
                user_id = ?self.user_id,
                success = self.success,
                "Security audit log"
            );
        } else {
            tracing::event!(
                target: "audit",
                tracing::Level::WARN,
                audit_entry = %json,
                event_type = ?self.event_type,
                user_id = ?self.user_id,
                success = self.success,
                error = ?self.error_message,
                "Security audit log - failure"
            );
        }
    }
}

/// Log a stored upload: who wrote which file into which bucket
pub fn log_file_uploaded(
    user_id: Uuid,
    client_ip: &str,
    bucket: &str,
    file_name: &str,
    content_type: &str,
    size_bytes: usize,
) {
    AuditLogEntry::new(AuditEventType::FileUploaded)
        .with_user_id(user_id)
        .with_client_ip(client_ip)
        .with_details(serde_json::json!({
            "bucket": bucket,
            "file_name": file_name,
            "content_type": content_type,
            "size_bytes": size_bytes,
        }))
        .log();
}

pub fn log_rate_limit_exceeded(client_ip: &str, request_path: &str, limit: u32) {
    AuditLogEntry::new(AuditEventType::RateLimitExceeded)
        .with_client_ip(client_ip)
        .with_request_path(request_path)
        .with_details(serde_json::json!({ "limit": limit }))
        .with_failure("Rate limit exceeded")
        .log();
}

pub fn log_authentication_failure(client_ip: &str, reason: &str) {
    AuditLogEntry::new(AuditEventType::AuthenticationFailure)
        .with_client_ip(client_ip)
        .with_failure(reason)
        .log();
}

pub fn log_authorization_denied(user_id: Uuid, client_ip: &str, bucket: &str) {
    AuditLogEntry::new(AuditEventType::AuthorizationDenied)
        .with_user_id(user_id)
        .with_client_ip(client_ip)
        .with_details(serde_json::json!({ "bucket": bucket, "required_role": "admin" }))
        .with_failure("Admin role required")
        .log();
}

/// Declared type and actual bytes disagree. Logged apart from ordinary
/// validation failures because it indicates a deliberate spoofing attempt.
pub fn log_content_integrity_violation(
    user_id: Uuid,
    client_ip: &str,
    bucket: &str,
    declared_type: &str,
    detected_type: Option<&str>,
) {
    AuditLogEntry::new(AuditEventType::ContentIntegrityViolation)
        .with_user_id(user_id)
        .with_client_ip(client_ip)
        .with_details(serde_json::json!({
            "bucket": bucket,
            "declared_type": declared_type,
            "detected_type": detected_type,
        }))
        .with_failure("File signature does not match declared type")
        .log();
}

pub fn log_honeypot_triggered(client_ip: &str, request_path: &str) {
    AuditLogEntry::new(AuditEventType::HoneypotTriggered)
        .with_client_ip(client_ip)
        .with_request_path(request_path)
        .with_failure("Honeypot field filled")
        .log();
}
