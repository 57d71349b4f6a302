//! Suggestion decisions and the text splice applied on approval.
//!
//! A suggestion anchors a `[start, end)` range of the document content as it
//! was when the comment was written. Approval replaces that range in the
//! *current* content. Offsets count Unicode scalar values (`char`s); they are
//! neither byte offsets nor grapheme clusters.

use serde::Deserialize;

use crate::documents::{COMMENT_KIND_SUGGESTION, SUGGESTION_PENDING};
use crate::error::CoreError;

/// Owner decision on a pending suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

/// Reasons a suggestion cannot be decided or applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestionError {
    #[error("Only suggestions can be approved or rejected")]
    NotASuggestion,

    #[error("This suggestion has already been processed")]
    AlreadyProcessed,

    #[error("Cannot apply suggestion without a selection anchor")]
    MissingAnchor,

    #[error("Suggestion selection is out of bounds")]
    OutOfBounds,

    #[error("Suggestion anchor no longer matches the document")]
    StaleAnchor,
}

impl From<SuggestionError> for CoreError {
    fn from(err: SuggestionError) -> Self {
        match err {
            SuggestionError::NotASuggestion | SuggestionError::MissingAnchor => {
                CoreError::Validation(err.to_string())
            }
            SuggestionError::AlreadyProcessed
            | SuggestionError::OutOfBounds
            | SuggestionError::StaleAnchor => CoreError::Conflict(err.to_string()),
        }
    }
}

/// The anchor fields of a suggestion comment.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionAnchor<'a> {
    pub start: Option<i32>,
    pub end: Option<i32>,
    /// Snapshot of the text originally selected.
    pub text: Option<&'a str>,
}

/// Check that a comment is a suggestion still awaiting a decision.
pub fn ensure_pending(kind: &str, suggestion_status: Option<&str>) -> Result<(), SuggestionError> {
    if kind != COMMENT_KIND_SUGGESTION {
        return Err(SuggestionError::NotASuggestion);
    }
    if suggestion_status != Some(SUGGESTION_PENDING) {
        return Err(SuggestionError::AlreadyProcessed);
    }
    Ok(())
}

/// Splice `replacement` into `content` over the anchored range.
///
/// Fails when an anchor is missing, when `end` lies past the end of the
/// current content, or when `start > end`. With `verify_anchor_text` set and
/// a stored snapshot present, the current text under the range must equal
/// the snapshot.
pub fn apply(
    content: &str,
    anchor: SuggestionAnchor<'_>,
    replacement: &str,
    verify_anchor_text: bool,
) -> Result<String, SuggestionError> {
    let (Some(start), Some(end)) = (anchor.start, anchor.end) else {
        return Err(SuggestionError::MissingAnchor);
    };
    let (start, end) = match (usize::try_from(start), usize::try_from(end)) {
        (Ok(s), Ok(e)) if s <= e => (s, e),
        _ => return Err(SuggestionError::OutOfBounds),
    };

    let char_len = content.chars().count();
    if end > char_len {
        return Err(SuggestionError::OutOfBounds);
    }

    let start_byte = byte_offset(content, start);
    let end_byte = byte_offset(content, end);

    if verify_anchor_text {
        if let Some(expected) = anchor.text {
            if &content[start_byte..end_byte] != expected {
                return Err(SuggestionError::StaleAnchor);
            }
        }
    }

    let mut out =
        String::with_capacity(content.len() - (end_byte - start_byte) + replacement.len());
    out.push_str(&content[..start_byte]);
    out.push_str(replacement);
    out.push_str(&content[end_byte..]);
    Ok(out)
}

/// Byte offset of the `n`th char; `content.len()` when `n` is the char count.
fn byte_offset(content: &str, n: usize) -> usize {
    content
        .char_indices()
        .nth(n)
        .map_or(content.len(), |(i, _)| i)
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
