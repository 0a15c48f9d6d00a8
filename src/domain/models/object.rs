use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::ObjectKey;

/// One entry of a bucket listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSummary {
    pub name: ObjectKey,
    pub size: u64,
    pub time_created: DateTime<Utc>,
    pub etag: Option<String>,
}

/// Result of storing an object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PutObjectResponse {
    pub etag: Option<String>,
    pub version_id: Option<String>,
}
