use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::{BucketName, CompartmentId, Namespace};

/// Request to create a bucket
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBucketDetails {
    pub name: BucketName,
    pub compartment_id: CompartmentId,
}

impl CreateBucketDetails {
    pub fn new(name: BucketName, compartment_id: CompartmentId) -> Self {
        Self {
            name,
            compartment_id,
        }
    }
}

/// A bucket as returned by the storage service after creation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub name: BucketName,
    pub namespace: Namespace,
    pub compartment_id: CompartmentId,
    pub time_created: DateTime<Utc>,
    pub etag: Option<String>,
}
