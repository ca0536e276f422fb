/// Primary keys are UUIDs, matching the auth provider's user ids.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
