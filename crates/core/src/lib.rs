//! Domain types, validation, and pure business rules shared by the database
//! and API layers. Nothing in this crate performs I/O.

pub mod access;
pub mod cache_tags;
pub mod documents;
pub mod entries;
pub mod error;
pub mod invitation;
pub mod settings;
pub mod slug;
pub mod suggestion;
pub mod types;
pub mod uploads;
