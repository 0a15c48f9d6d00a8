use async_trait::async_trait;
use chrono::{DateTime, Utc};
use object_store::{local::LocalFileSystem, ObjectStore as ApacheObjectStore};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{bucket::BucketOperations, error::StoreError};
use crate::domain::{
    errors::{StorageError, StorageResult},
    models::{Bucket, CreateBucketDetails},
    value_objects::{BucketName, Namespace},
};

/// Buckets stored as directories below a root directory
#[derive(Debug, Clone)]
pub struct LocalBuckets {
    namespace: Namespace,
    root: PathBuf,
}

impl LocalBuckets {
    pub fn new(namespace: Namespace, root: impl Into<PathBuf>) -> Self {
        Self {
            namespace,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, name: &BucketName) -> PathBuf {
        self.root.join(name.as_str())
    }
}

#[async_trait]
impl BucketOperations for LocalBuckets {
    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn create_bucket(&self, details: &CreateBucketDetails) -> StorageResult<Bucket> {
        tokio::fs::create_dir_all(&self.root).await?;

        let dir = self.bucket_dir(&details.name);
        match tokio::fs::create_dir(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StorageError::BucketAlreadyExists {
                    bucket: details.name.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let time_created = tokio::fs::metadata(&dir)
            .await
            .and_then(|meta| meta.created())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        debug!(bucket = %details.name, path = %dir.display(), "created bucket directory");

        Ok(Bucket {
            name: details.name.clone(),
            namespace: self.namespace.clone(),
            compartment_id: details.compartment_id.clone(),
            time_created,
            etag: Some(uuid::Uuid::new_v4().to_string()),
        })
    }

    async fn bucket_exists(&self, name: &BucketName) -> StorageResult<bool> {
        match tokio::fs::metadata(self.bucket_dir(name)).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_bucket(&self, name: &BucketName) -> StorageResult<()> {
        let dir = self.bucket_dir(name);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::BucketNotFound {
                    bucket: name.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if entries.next_entry().await?.is_some() {
            return Err(StorageError::BucketNotEmpty {
                bucket: name.clone(),
            });
        }

        tokio::fs::remove_dir(&dir).await?;
        debug!(bucket = %name, path = %dir.display(), "removed bucket directory");
        Ok(())
    }

    async fn open_bucket(&self, name: &BucketName) -> StorageResult<Arc<dyn ApacheObjectStore>> {
        if !self.bucket_exists(name).await? {
            return Err(StorageError::BucketNotFound {
                bucket: name.clone(),
            });
        }

        // Empty directories left by nested names would keep the bucket from
        // being deleted
        let store = LocalFileSystem::new_with_prefix(self.bucket_dir(name))
            .map_err(|e| StoreError::from(e).into_storage_error(name, None))?
            .with_automatic_cleanup(true);
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::CompartmentId;

    fn details(name: &str) -> CreateBucketDetails {
        CreateBucketDetails::new(
            BucketName::new(name.to_string()).unwrap(),
            CompartmentId::new("ocid1.tenancy.oc1..test".to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_bucket_is_a_directory() {
        let root = tempfile::tempdir().unwrap();
        let ops = LocalBuckets::new(
            Namespace::new("local".to_string()).unwrap(),
            root.path().join("buckets"),
        );
        let details = details("dir-bucket");

        ops.create_bucket(&details).await.unwrap();
        assert!(root.path().join("buckets").join("dir-bucket").is_dir());
        assert!(ops.bucket_exists(&details.name).await.unwrap());

        assert!(matches!(
            ops.create_bucket(&details).await,
            Err(StorageError::BucketAlreadyExists { .. })
        ));

        ops.delete_bucket(&details.name).await.unwrap();
        assert!(!ops.bucket_exists(&details.name).await.unwrap());
        assert!(matches!(
            ops.delete_bucket(&details.name).await,
            Err(StorageError::BucketNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_deleting_nested_objects_leaves_bucket_empty() {
        let root = tempfile::tempdir().unwrap();
        let ops = LocalBuckets::new(Namespace::new("local".to_string()).unwrap(), root.path());
        let details = details("nested-bucket");
        ops.create_bucket(&details).await.unwrap();

        let store = ops.open_bucket(&details.name).await.unwrap();
        let path = object_store::path::Path::parse("notes/2024/greeting").unwrap();
        store
            .put(&path, object_store::PutPayload::from_static(b"hi"))
            .await
            .unwrap();
        assert!(root.path().join("nested-bucket/notes/2024").is_dir());

        store.delete(&path).await.unwrap();
        assert!(!root.path().join("nested-bucket/notes").exists());
        ops.delete_bucket(&details.name).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_refuses_non_empty_directory() {
        let root = tempfile::tempdir().unwrap();
        let ops = LocalBuckets::new(Namespace::new("local".to_string()).unwrap(), root.path());
        let details = details("full-bucket");
        ops.create_bucket(&details).await.unwrap();

        std::fs::write(root.path().join("full-bucket").join("obj"), b"data").unwrap();

        assert!(matches!(
            ops.delete_bucket(&details.name).await,
            Err(StorageError::BucketNotEmpty { .. })
        ));
    }
}
