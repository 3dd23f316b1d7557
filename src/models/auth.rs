use chrono::{DateTime, Utc};

/// Identity extracted from a verified bearer token.
///
/// Not persisted; it exists per request for audit attribution only.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub subject: String,
    pub role: String,
    pub expires_at: Option<DateTime<Utc>>,
}
