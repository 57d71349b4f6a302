//! Authentication primitives.
//!
//! - [`jwt`] -- verification of identity-provider access tokens (and a
//!   generator for tests and local tooling).

pub mod jwt;
