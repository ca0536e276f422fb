//! Authentication and authorization extractors and helpers.
//!
//! - [`auth::AuthUser`] -- the caller, from a provider-issued Bearer token.
//! - [`session::SessionContext`] -- the caller plus profile and active membership.
//! - [`rbac`] -- organization-role checks for projects and organizations.

pub mod auth;
pub mod rbac;
pub mod session;
