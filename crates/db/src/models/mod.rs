//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod daily_log;
pub mod material;
pub mod member;
pub mod notification;
pub mod organization;
pub mod project;
pub mod targets;
pub mod user;
