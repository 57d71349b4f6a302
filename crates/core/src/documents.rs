//! Document and comment constants and validation functions.
//!
//! Enumerated columns (`visibility`, `kind`, `status`, ...) are stored as
//! `TEXT` with `CHECK` constraints; the constants here are the single source
//! of truth for the accepted values on the Rust side.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Minimum length of a document title (after trimming).
pub const MIN_TITLE_LENGTH: usize = 3;

/// Maximum length of a document title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of a document summary.
pub const MAX_SUMMARY_LENGTH: usize = 240;

/// Maximum length of a comment body.
pub const MAX_COMMENT_LENGTH: usize = 10_000;

/// Slug base used when a title slugifies to nothing.
pub const DEFAULT_DOCUMENT_SLUG: &str = "untitled";

pub const VISIBILITY_PRIVATE: &str = "private";
pub const VISIBILITY_PUBLIC: &str = "public";

/// All valid document visibility values.
pub const VALID_VISIBILITIES: &[&str] = &[VISIBILITY_PRIVATE, VISIBILITY_PUBLIC];

pub const COMMENT_KIND_ANNOTATION: &str = "annotation";
pub const COMMENT_KIND_SUGGESTION: &str = "suggestion";

/// All valid comment kinds.
pub const VALID_COMMENT_KINDS: &[&str] = &[COMMENT_KIND_ANNOTATION, COMMENT_KIND_SUGGESTION];

pub const COMMENT_STATUS_OPEN: &str = "open";
pub const COMMENT_STATUS_RESOLVED: &str = "resolved";

/// All valid comment statuses.
pub const VALID_COMMENT_STATUSES: &[&str] = &[COMMENT_STATUS_OPEN, COMMENT_STATUS_RESOLVED];

pub const SUGGESTION_PENDING: &str = "pending";
pub const SUGGESTION_APPROVED: &str = "approved";
pub const SUGGESTION_REJECTED: &str = "rejected";

pub const COLLABORATOR_STATUS_PENDING: &str = "pending";
pub const COLLABORATOR_STATUS_ACTIVE: &str = "active";
pub const COLLABORATOR_STATUS_REVOKED: &str = "revoked";

pub const COLLABORATOR_ROLE_COMMENTER: &str = "commenter";
pub const COLLABORATOR_ROLE_VIEWER: &str = "viewer";

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Validate a document title: at least [`MIN_TITLE_LENGTH`] characters once
/// trimmed, at most [`MAX_TITLE_LENGTH`].
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let len = title.trim().chars().count();
    if len < MIN_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at least {MIN_TITLE_LENGTH} characters"
        )));
    }
    if len > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional summary against [`MAX_SUMMARY_LENGTH`].
pub fn validate_summary(summary: Option<&str>) -> Result<(), CoreError> {
    match summary {
        Some(s) if s.chars().count() > MAX_SUMMARY_LENGTH => Err(CoreError::Validation(format!(
            "Summary must be at most {MAX_SUMMARY_LENGTH} characters"
        ))),
        _ => Ok(()),
    }
}

/// Validate that a visibility string is one of the accepted values.
pub fn validate_visibility(visibility: &str) -> Result<(), CoreError> {
    if VALID_VISIBILITIES.contains(&visibility) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid visibility '{visibility}'. Must be one of: {}",
            VALID_VISIBILITIES.join(", ")
        )))
    }
}

/// Validate that a comment status string is one of the accepted values.
pub fn validate_comment_status(status: &str) -> Result<(), CoreError> {
    if VALID_COMMENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid comment status '{status}'. Must be one of: {}",
            VALID_COMMENT_STATUSES.join(", ")
        )))
    }
}

/// Reject manual status changes on suggestions.
///
/// A suggestion's status follows its decision; only annotations are opened
/// and resolved by hand.
pub fn ensure_status_editable(kind: &str) -> Result<(), CoreError> {
    if kind == COMMENT_KIND_SUGGESTION {
        return Err(CoreError::Conflict(
            "Suggestions are resolved by approving or rejecting them".into(),
        ));
    }
    Ok(())
}

/// Collapse an empty or whitespace-only optional string to `None`.
///
/// Forms submit empty strings for untouched optional fields; those are
/// stored as NULL.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// The anchor and replacement fields of a comment, as submitted.
#[derive(Debug, Clone, Copy)]
pub struct CommentDraft<'a> {
    pub kind: &'a str,
    pub body: &'a str,
    pub suggested_text: Option<&'a str>,
    pub anchor_start: Option<i32>,
    pub anchor_end: Option<i32>,
}

/// Validate a comment before insertion.
///
/// Checks run in field order and the first failure is reported:
/// body, kind, anchor ranges, then the suggestion-specific requirements
/// (replacement text and both anchors).
pub fn validate_comment(draft: &CommentDraft<'_>) -> Result<(), CoreError> {
    if draft.body.trim().is_empty() {
        return Err(CoreError::Validation("Comment cannot be empty".into()));
    }
    if draft.body.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    if !VALID_COMMENT_KINDS.contains(&draft.kind) {
        return Err(CoreError::Validation(format!(
            "Invalid comment kind '{}'. Must be one of: {}",
            draft.kind,
            VALID_COMMENT_KINDS.join(", ")
        )));
    }

    for (name, value) in [("anchor_start", draft.anchor_start), ("anchor_end", draft.anchor_end)] {
        if let Some(v) = value {
            if v < 0 {
                return Err(CoreError::Validation(format!("{name} must not be negative")));
            }
        }
    }
    if let (Some(start), Some(end)) = (draft.anchor_start, draft.anchor_end) {
        if start > end {
            return Err(CoreError::Validation(
                "anchor_start must not exceed anchor_end".into(),
            ));
        }
    }

    if draft.kind == COMMENT_KIND_SUGGESTION {
        if draft.suggested_text.is_none() {
            return Err(CoreError::Validation(
                "Suggestions must include replacement text".into(),
            ));
        }
        if draft.anchor_start.is_none() || draft.anchor_end.is_none() {
            return Err(CoreError::Validation(
                "Suggestions require a selection anchor".into(),
            ));
        }
    }

    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn draft<'a>(kind: &'a str, suggested: Option<&'a str>) -> CommentDraft<'a> {
        CommentDraft {
            kind,
            body: "Looks off",
            suggested_text: suggested,
            anchor_start: Some(4),
            anchor_end: Some(9),
        }
    }

    #[test]
    fn test_title_too_short_rejected() {
        let err = validate_title("  ab ").unwrap_err();
        assert!(err.to_string().contains("at least 3"));
        assert!(validate_title("abc").is_ok());
    }

    #[test]
    fn test_summary_length_enforced() {
        assert!(validate_summary(None).is_ok());
        assert!(validate_summary(Some(&"x".repeat(240))).is_ok());
        assert!(validate_summary(Some(&"x".repeat(241))).is_err());
    }

    #[test]
    fn test_visibility_values() {
        assert!(validate_visibility("public").is_ok());
        assert!(validate_visibility("private").is_ok());
        assert!(validate_visibility("secret").is_err());
    }

    #[test]
    fn test_comment_status_values() {
        assert!(validate_comment_status("open").is_ok());
        assert!(validate_comment_status("resolved").is_ok());
        assert!(validate_comment_status("closed").is_err());
    }

    #[test]
    fn test_only_annotations_take_manual_status() {
        assert!(ensure_status_editable(COMMENT_KIND_ANNOTATION).is_ok());
        let err = ensure_status_editable(COMMENT_KIND_SUGGESTION).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" hi ".into())), Some("hi".into()));
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn test_annotation_without_anchor_accepted() {
        let d = CommentDraft {
            anchor_start: None,
            anchor_end: None,
            ..draft(COMMENT_KIND_ANNOTATION, None)
        };
        assert!(validate_comment(&d).is_ok());
    }

    #[test]
    fn test_suggestion_requires_replacement_text() {
        let err = validate_comment(&draft(COMMENT_KIND_SUGGESTION, None)).unwrap_err();
        assert!(err.to_string().contains("replacement text"));
    }

    #[test]
    fn test_suggestion_requires_both_anchors() {
        let d = CommentDraft {
            anchor_end: None,
            ..draft(COMMENT_KIND_SUGGESTION, Some("slow"))
        };
        let err = validate_comment(&d).unwrap_err();
        assert!(err.to_string().contains("selection anchor"));
    }

    #[test]
    fn test_suggestion_with_empty_replacement_accepted() {
        // An empty replacement is a deletion.
        assert!(validate_comment(&draft(COMMENT_KIND_SUGGESTION, Some(""))).is_ok());
    }

    #[test]
    fn test_inverted_or_negative_anchor_rejected() {
        let inverted = CommentDraft {
            anchor_start: Some(9),
            anchor_end: Some(4),
            ..draft(COMMENT_KIND_ANNOTATION, None)
        };
        assert!(validate_comment(&inverted).is_err());

        let negative = CommentDraft {
            anchor_start: Some(-1),
            ..draft(COMMENT_KIND_ANNOTATION, None)
        };
        assert!(validate_comment(&negative).is_err());
    }

    #[test]
    fn test_empty_body_and_unknown_kind_rejected() {
        let empty = CommentDraft {
            body: "   ",
            ..draft(COMMENT_KIND_ANNOTATION, None)
        };
        assert!(validate_comment(&empty)
            .unwrap_err()
            .to_string()
            .contains("cannot be empty"));
        assert!(validate_comment(&draft("question", None)).is_err());
    }
}
