//! # Staff Sessions
//!
//! Authenticated identity handed from the gateway to the subsystem services.
//!
//! Services take `Option<&Session>` and call [`require_session`] before they
//! touch any store, so an unauthenticated mutation never leaves a trace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// A staff member acting on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable identifier of the staff account.
    pub user_id: String,
    /// Name recorded on published articles.
    pub display_name: String,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// A resolved, currently valid staff session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub actor: Actor,
    /// `None` for sessions backed by long-lived API tokens.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the session is still usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| now < exp).unwrap_or(true)
    }
}

/// Marker error returned when no valid session is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingSession;

/// Return the session if present and unexpired.
pub fn require_session(session: Option<&Session>) -> Result<&Session, MissingSession> {
    match session {
        Some(s) if s.is_valid_at(Utc::now()) => Ok(s),
        _ => Err(MissingSession),
    }
}

/// Constant-time string comparison for secrets (tokens, signatures).
///
/// Lengths are compared in constant time too, so a mismatch in length does
/// not return early.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let max_len = std::cmp::max(a.len(), b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = (a.len() as u64).ct_eq(&(b.len() as u64));
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}
