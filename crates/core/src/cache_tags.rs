//! Cache tag names.
//!
//! Cached reads register the tags they depend on; mutations invalidate by
//! tag. Both sides must build tags through these functions.

use crate::types::DbId;

/// Tag for the public document listing.
pub const PUBLIC_DOCUMENTS: &str = "documents:public";

/// A single document's detail (metadata, collaborators).
pub fn document(document_id: DbId) -> String {
    format!("document:{document_id}")
}

/// A document's comment thread.
pub fn document_comments(document_id: DbId) -> String {
    format!("document:{document_id}:comments")
}

/// A document's invitation list.
pub fn document_invites(document_id: DbId) -> String {
    format!("document:{document_id}:invites")
}

/// The document list of one user (owned and collaborated).
pub fn document_list(user_id: DbId) -> String {
    format!("documents:user:{user_id}")
}

/// A single entry's profile.
pub fn entry_detail(entry_id: DbId) -> String {
    format!("entry:{entry_id}")
}

/// The entry list of one user.
pub fn entry_list(user_id: DbId) -> String {
    format!("entries:user:{user_id}")
}
