//! Memorial entry models and DTOs.

use keepsake_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::upload::Upload;
use crate::models::user::UserSummary;

/// A row from the `entries` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Entry {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub slug: String,
    pub birth_date: Date,
    pub death_date: Date,
    pub cause_of_death: Option<String>,
    pub location: Option<String>,
    pub primary_image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an entry together with its already-uploaded profile
/// image.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntry {
    pub name: String,
    pub birth_date: Date,
    pub death_date: Date,
    pub cause_of_death: Option<String>,
    pub location: Option<String>,
    pub primary_image_url: String,
    pub primary_image_key: String,
}

/// Entry profile: the entry, its owner, and its uploads (primary first,
/// then newest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDetail {
    #[serde(flatten)]
    pub entry: Entry,
    pub owner: UserSummary,
    pub uploads: Vec<Upload>,
}
