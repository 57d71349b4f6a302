//! Document comment models, DTOs, and thread assembly.

use std::collections::HashMap;

use keepsake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `document_comments` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: DbId,
    pub document_id: DbId,
    pub author_id: DbId,
    pub parent_id: Option<DbId>,
    pub kind: String,
    pub status: String,
    pub suggestion_status: Option<String>,
    pub body: String,
    pub suggested_text: Option<String>,
    pub anchor_start: Option<i32>,
    pub anchor_end: Option<i32>,
    pub anchor_text: Option<String>,
    pub anchor_meta: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for posting a comment or suggestion.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub body: String,
    /// Defaults to `annotation`.
    pub kind: Option<String>,
    pub parent_id: Option<DbId>,
    pub anchor_start: Option<i32>,
    pub anchor_end: Option<i32>,
    pub anchor_text: Option<String>,
    pub anchor_meta: Option<serde_json::Value>,
    pub suggested_text: Option<String>,
}

/// DTO for opening or resolving a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommentStatus {
    pub status: String,
}

/// Comment joined with its author's public fields.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub author_name: String,
    pub author_email: String,
    pub author_image_url: Option<String>,
}

/// A top-level comment and every reply beneath it, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub root: CommentWithAuthor,
    pub replies: Vec<CommentWithAuthor>,
}

/// Group comments (ordered by creation time) into threads.
///
/// Replies to replies are attached to their thread's root. A reply whose
/// parent is missing from `comments` is dropped.
pub fn build_threads(comments: Vec<CommentWithAuthor>) -> Vec<CommentThread> {
    let parents: HashMap<DbId, Option<DbId>> = comments
        .iter()
        .map(|c| (c.comment.id, c.comment.parent_id))
        .collect();

    let root_of = |mut id: DbId| -> Option<DbId> {
        // Bounded walk guards against a malformed parent cycle.
        for _ in 0..=parents.len() {
            match parents.get(&id)? {
                None => return Some(id),
                Some(parent) => id = *parent,
            }
        }
        None
    };

    let mut threads: Vec<CommentThread> = Vec::new();
    let mut index: HashMap<DbId, usize> = HashMap::new();
    let mut replies: Vec<(DbId, CommentWithAuthor)> = Vec::new();

    for c in comments {
        if c.comment.parent_id.is_none() {
            index.insert(c.comment.id, threads.len());
            threads.push(CommentThread {
                root: c,
                replies: Vec::new(),
            });
        } else if let Some(root) = root_of(c.comment.id) {
            replies.push((root, c));
        }
    }

    for (root, reply) in replies {
        if let Some(&i) = index.get(&root) {
            threads[i].replies.push(reply);
        }
    }

    threads
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn comment(id: DbId, parent_id: Option<DbId>) -> CommentWithAuthor {
        let now = Utc::now();
        CommentWithAuthor {
            comment: Comment {
                id,
                document_id: 1,
                author_id: 1,
                parent_id,
                kind: "annotation".into(),
                status: "open".into(),
                suggestion_status: None,
                body: format!("comment {id}"),
                suggested_text: None,
                anchor_start: None,
                anchor_end: None,
                anchor_text: None,
                anchor_meta: None,
                created_at: now,
                updated_at: now,
            },
            author_name: "Ada".into(),
            author_email: "ada@example.com".into(),
            author_image_url: None,
        }
    }

    #[test]
    fn test_replies_grouped_under_roots() {
        let threads = build_threads(vec![
            comment(1, None),
            comment(2, None),
            comment(3, Some(1)),
            comment(4, Some(2)),
            comment(5, Some(1)),
        ]);
        assert_eq!(threads.len(), 2);
        let first: Vec<_> = threads[0].replies.iter().map(|r| r.comment.id).collect();
        assert_eq!(first, vec![3, 5]);
        assert_eq!(threads[1].replies[0].comment.id, 4);
    }

    #[test]
    fn test_nested_reply_attached_to_root() {
        let threads = build_threads(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
        ]);
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].replies.len(), 2);
    }

    #[test]
    fn test_orphan_reply_dropped() {
        let threads = build_threads(vec![comment(1, None), comment(2, Some(99))]);
        assert_eq!(threads.len(), 1);
        assert!(threads[0].replies.is_empty());
    }
}
