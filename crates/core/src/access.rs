//! Document access rules.
//!
//! The database layer supplies the facts (owner, visibility, whether the
//! caller holds an active collaborator row); this module decides what the
//! caller may do with them. A private document the caller cannot see is
//! reported as absent, never as forbidden, so its existence does not leak.

use crate::documents::VISIBILITY_PUBLIC;
use crate::error::CoreError;
use crate::types::DbId;

/// Message for mutations that require ownership.
pub const OWNER_REQUIRED_MSG: &str = "You do not have permission to modify this document";

/// Message for mutations that require contributor access.
pub const CONTRIBUTOR_REQUIRED_MSG: &str = "You do not have access to this document";

/// Message when an anonymous caller attempts a mutation.
pub const SIGN_IN_REQUIRED_MSG: &str = "Unauthorized";

/// What a resolved caller may do with a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessLevel {
    pub is_owner: bool,
    pub is_active_collaborator: bool,
}

impl AccessLevel {
    /// Owner or active collaborator: may post comments.
    pub fn is_contributor(&self) -> bool {
        self.is_owner || self.is_active_collaborator
    }
}

/// Decide the caller's access to a document.
///
/// Returns `None` when the caller may not see the document at all.
pub fn resolve(
    owner_id: DbId,
    visibility: &str,
    viewer: Option<DbId>,
    is_active_collaborator: bool,
) -> Option<AccessLevel> {
    let is_public = visibility == VISIBILITY_PUBLIC;

    let Some(viewer) = viewer else {
        return is_public.then_some(AccessLevel {
            is_owner: false,
            is_active_collaborator: false,
        });
    };

    let level = AccessLevel {
        is_owner: owner_id == viewer,
        is_active_collaborator,
    };

    if level.is_contributor() || is_public {
        Some(level)
    } else {
        None
    }
}

/// Require ownership. A missing or invisible document fails the same way as
/// a foreign one.
pub fn require_owner(viewer: Option<DbId>, level: Option<AccessLevel>) -> Result<(), CoreError> {
    if viewer.is_none() {
        return Err(CoreError::Unauthorized(SIGN_IN_REQUIRED_MSG.into()));
    }
    match level {
        Some(l) if l.is_owner => Ok(()),
        _ => Err(CoreError::Forbidden(OWNER_REQUIRED_MSG.into())),
    }
}

/// Require owner or active-collaborator access.
pub fn require_contributor(
    viewer: Option<DbId>,
    level: Option<AccessLevel>,
) -> Result<(), CoreError> {
    if viewer.is_none() {
        return Err(CoreError::Unauthorized(SIGN_IN_REQUIRED_MSG.into()));
    }
    match level {
        Some(l) if l.is_contributor() => Ok(()),
        _ => Err(CoreError::Forbidden(CONTRIBUTOR_REQUIRED_MSG.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: DbId = 1;
    const OTHER: DbId = 2;

    #[test]
    fn test_anonymous_sees_only_public() {
        assert_eq!(resolve(OWNER, "private", None, false), None);
        assert_eq!(
            resolve(OWNER, "public", None, false),
            Some(AccessLevel {
                is_owner: false,
                is_active_collaborator: false
            })
        );
    }

    #[test]
    fn test_owner_sees_private() {
        let level = resolve(OWNER, "private", Some(OWNER), false).unwrap();
        assert!(level.is_owner);
        assert!(level.is_contributor());
    }

    #[test]
    fn test_stranger_hidden_from_private_but_reads_public() {
        assert_eq!(resolve(OWNER, "private", Some(OTHER), false), None);
        let level = resolve(OWNER, "public", Some(OTHER), false).unwrap();
        assert!(!level.is_contributor());
    }

    #[test]
    fn test_active_collaborator_sees_private() {
        let level = resolve(OWNER, "private", Some(OTHER), true).unwrap();
        assert!(!level.is_owner);
        assert!(level.is_active_collaborator);
        assert!(level.is_contributor());
    }

    #[test]
    fn test_require_owner() {
        assert!(matches!(
            require_owner(None, None),
            Err(CoreError::Unauthorized(_))
        ));
        let collaborator = resolve(OWNER, "private", Some(OTHER), true);
        assert!(matches!(
            require_owner(Some(OTHER), collaborator),
            Err(CoreError::Forbidden(_))
        ));
        assert!(matches!(
            require_owner(Some(OTHER), None),
            Err(CoreError::Forbidden(_))
        ));
        let owner = resolve(OWNER, "private", Some(OWNER), false);
        assert!(require_owner(Some(OWNER), owner).is_ok());
    }

    #[test]
    fn test_require_contributor() {
        let reader = resolve(OWNER, "public", Some(OTHER), false);
        assert!(matches!(
            require_contributor(Some(OTHER), reader),
            Err(CoreError::Forbidden(_))
        ));
        let collaborator = resolve(OWNER, "public", Some(OTHER), true);
        assert!(require_contributor(Some(OTHER), collaborator).is_ok());
    }
}
