//! Row structs (`FromRow`) and input DTOs, one module per table group.

pub mod collaborator;
pub mod comment;
pub mod document;
pub mod entry;
pub mod invitation;
pub mod settings;
pub mod upload;
pub mod user;
