/// Internal row identifiers are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All server-side timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Optimistic concurrency counter stored alongside each module document.
pub type Version = i64;

/// A free-form JSON object, used for opaque extra fields and patches.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
