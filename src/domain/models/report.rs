use serde::Serialize;
use std::path::PathBuf;

use crate::domain::{
    models::{Bucket, ObjectSummary},
    value_objects::{BucketName, ObjectKey},
};

/// Outcome of a full create/upload/verify/clean-up run
#[derive(Debug, Clone, Default, Serialize)]
pub struct WalkthroughReport {
    pub bucket_name: Option<BucketName>,
    pub bucket: Option<Bucket>,
    pub uploaded: Vec<ObjectKey>,
    pub listed: Vec<ObjectSummary>,
    pub string_matches: Option<bool>,
    pub file_matches: Option<bool>,
    pub source_md5: Option<String>,
    pub retrieved_md5: Option<String>,
    pub retrieved_path: Option<PathBuf>,
    pub deleted: Vec<ObjectKey>,
    pub bucket_deleted: bool,
    pub artifact_removed: bool,
    pub cleanup_errors: Vec<String>,
    pub error: Option<String>,
}

impl WalkthroughReport {
    /// Names of the listed objects, in listing order
    pub fn listed_names(&self) -> Vec<&ObjectKey> {
        self.listed.iter().map(|o| &o.name).collect()
    }

    /// True when every step ran, both comparisons matched and cleanup was
    /// complete
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
            && self.cleanup_errors.is_empty()
            && self.string_matches == Some(true)
            && self.file_matches == Some(true)
            && self.bucket_deleted
    }
}
