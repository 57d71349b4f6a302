//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must run inside
//! a caller-owned transaction take `&mut PgConnection` instead.

pub mod collaborator_repo;
pub mod comment_repo;
pub mod document_repo;
pub mod entry_repo;
pub mod invitation_repo;
pub mod settings_repo;
pub mod upload_repo;
pub mod user_repo;

pub use collaborator_repo::CollaboratorRepo;
pub use comment_repo::CommentRepo;
pub use document_repo::DocumentRepo;
pub use entry_repo::EntryRepo;
pub use invitation_repo::InvitationRepo;
pub use settings_repo::UserSettingsRepo;
pub use upload_repo::UploadRepo;
pub use user_repo::UserRepo;
