/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Schema-less JSON object used for block configuration, content and styling.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
