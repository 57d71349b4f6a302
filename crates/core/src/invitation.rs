//! Invitation lifecycle: token generation, expiry, and acceptance rules.
//!
//! States: `pending` → `accepted` | `expired` | `revoked`. Only a pending,
//! unexpired invitation can be accepted; an expired one is moved to
//! `expired` on the acceptance attempt.

use rand::Rng;
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Invitations expire this many days after being (re)issued.
pub const INVITATION_TTL_DAYS: i64 = 7;

/// Length of the generated invitation token (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 48;

pub const INVITATION_PENDING: &str = "pending";
pub const INVITATION_ACCEPTED: &str = "accepted";
pub const INVITATION_EXPIRED: &str = "expired";
pub const INVITATION_REVOKED: &str = "revoked";

/// Why an acceptance attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvitationError {
    #[error("This invitation is no longer active")]
    NotPending,

    /// The caller must persist the `expired` transition.
    #[error("This invitation has expired")]
    Expired,
}

impl From<InvitationError> for CoreError {
    fn from(err: InvitationError) -> Self {
        CoreError::Conflict(err.to_string())
    }
}

/// Generate a fresh random invitation token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Expiry for an invitation issued at `now`.
pub fn expires_at(now: Timestamp) -> Timestamp {
    now + chrono::Duration::days(INVITATION_TTL_DAYS)
}

/// Decide whether an invitation in `status` expiring at `expires_at` may be
/// accepted at `now`. An invitation without an expiry never expires.
pub fn check_acceptable(
    status: &str,
    expires_at: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), InvitationError> {
    if status != INVITATION_PENDING {
        return Err(InvitationError::NotPending);
    }
    if expires_at.is_some_and(|at| at < now) {
        return Err(InvitationError::Expired);
    }
    Ok(())
}

/// Validate and lowercase an invitee email address.
pub fn normalize_email(email: &str) -> Result<String, CoreError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "Invalid email address '{email}'"
        )));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn test_token_shape() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_expiry_is_seven_days() {
        let now = Utc::now();
        assert_eq!(expires_at(now) - now, Duration::days(7));
    }

    #[test]
    fn test_pending_unexpired_is_acceptable() {
        let now = Utc::now();
        assert!(check_acceptable("pending", Some(now + Duration::hours(1)), now).is_ok());
        assert!(check_acceptable("pending", None, now).is_ok());
    }

    #[test]
    fn test_expired_rejected() {
        let now = Utc::now();
        assert_eq!(
            check_acceptable("pending", Some(now - Duration::seconds(1)), now),
            Err(InvitationError::Expired)
        );
    }

    #[test]
    fn test_terminal_states_rejected() {
        let now = Utc::now();
        for status in [INVITATION_ACCEPTED, INVITATION_EXPIRED, INVITATION_REVOKED] {
            assert_eq!(
                check_acceptable(status, None, now),
                Err(InvitationError::NotPending)
            );
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("").is_err());
    }
}
