//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod daily_log_repo;
pub mod material_repo;
pub mod member_repo;
pub mod notification_repo;
pub mod organization_repo;
pub mod project_repo;
pub mod targets_repo;
pub mod user_repo;

pub use daily_log_repo::{DailyLogRepo, LogWindow};
pub use material_repo::MaterialRepo;
pub use member_repo::{MemberRepo, MembershipChange};
pub use notification_repo::NotificationRepo;
pub use organization_repo::OrganizationRepo;
pub use project_repo::ProjectRepo;
pub use targets_repo::TargetsRepo;
pub use user_repo::UserRepo;
