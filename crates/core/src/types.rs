/// Job identifiers are short opaque hex strings, unique at creation time.
pub type JobId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
