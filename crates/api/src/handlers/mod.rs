//! Request handlers, one submodule per resource.
//!
//! Handlers check access through [`crate::middleware::rbac`], delegate to
//! the repositories in `verde_db` or the clients in `verde_cloud`, and map
//! failures via [`crate::error::AppError`].

pub mod analytics;
pub mod auth;
pub mod daily_log;
pub mod location;
pub mod material;
pub mod member;
pub mod notification;
pub mod organization;
pub mod profile;
pub mod project;
pub mod storage;
pub mod targets;
pub mod upload;
