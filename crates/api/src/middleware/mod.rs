//! Request extractors.
//!
//! - [`auth::AuthUser`] -- requires a valid Bearer token and syncs the user row.
//! - [`auth::MaybeAuthUser`] -- same, but anonymous requests yield `None`.

pub mod auth;
