//! Audit logging for catalog mutations.
//!
//! Events go to the `audit` tracing target as structured fields, so the log
//! backend can route them separately from application logs.
//!
//! # Example
//! ```ignore
//! use axum_helpers::audit::{AuditEvent, AuditOutcome};
//!
//! AuditEvent::new(principal.as_ref(), "category.delete", "category:7", AuditOutcome::Success)
//!     .with_request_headers(&headers)
//!     .with_details(json!({ "cascade": true }))
//!     .log();
//! ```

use crate::auth::{Principal, Role};
use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    Failure,
    Denied,
}

/// Structured audit event. Build it, then call [`AuditEvent::log`].
#[derive(Debug, Serialize)]
pub struct AuditEvent {
    /// Authenticated caller, `None` when the request carried no principal
    pub username: Option<String>,
    pub role: Option<Role>,
    /// Dotted action name, e.g. `product.update`
    pub action: String,
    /// `kind:id` of the affected record
    pub resource: String,
    pub outcome: AuditOutcome,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        principal: Option<&Principal>,
        action: impl Into<String>,
        resource: impl Into<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            username: principal.map(|p| p.username.clone()),
            role: principal.map(|p| p.role),
            action: action.into(),
            resource: resource.into(),
            outcome,
            ip_address: None,
            user_agent: None,
            timestamp: Utc::now(),
            details: None,
        }
    }

    /// Fills client IP and user agent from request headers.
    pub fn with_request_headers(mut self, headers: &HeaderMap) -> Self {
        self.ip_address = extract_ip_from_headers(headers);
        self.user_agent = extract_user_agent(headers);
        self
    }

    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    pub fn log(self) {
        tracing::info!(
            target: "audit",
            username = self.username.as_deref(),
            role = self.role.map(|r| r.as_str()),
            action = %self.action,
            resource = %self.resource,
            outcome = ?self.outcome,
            ip = self.ip_address.as_deref(),
            user_agent = self.user_agent.as_deref(),
            details = ?self.details,
            "{}",
            serde_json::to_string(&self).unwrap_or_else(|_| "Failed to serialize audit event".to_string())
        );
    }
}

/// Client IP from `X-Forwarded-For` (first hop) or `X-Real-IP`.
pub fn extract_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
        })
}

pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
