use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use object_store::{memory::InMemory, ObjectStore as ApacheObjectStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{
    errors::{StorageError, StorageResult},
    models::{Bucket, CreateBucketDetails},
    value_objects::{BucketName, Namespace},
};

/// Bucket provisioning for a storage backend.
///
/// Object traffic goes through the `object_store` handle returned by
/// [`BucketOperations::open_bucket`]; everything that addresses the bucket
/// itself lives here.
#[async_trait]
pub trait BucketOperations: Send + Sync + 'static {
    /// Namespace served by this backend
    fn namespace(&self) -> &Namespace;

    /// Create a new bucket
    async fn create_bucket(&self, details: &CreateBucketDetails) -> StorageResult<Bucket>;

    /// Check if a bucket exists
    async fn bucket_exists(&self, name: &BucketName) -> StorageResult<bool>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, name: &BucketName) -> StorageResult<()>;

    /// Object store scoped to one bucket
    async fn open_bucket(&self, name: &BucketName) -> StorageResult<Arc<dyn ApacheObjectStore>>;
}

/// Buckets held in process memory, one `InMemory` store each
#[derive(Clone)]
pub struct InMemoryBuckets {
    namespace: Namespace,
    buckets: Arc<RwLock<HashMap<BucketName, Arc<InMemory>>>>,
}

impl InMemoryBuckets {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            buckets: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl BucketOperations for InMemoryBuckets {
    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn create_bucket(&self, details: &CreateBucketDetails) -> StorageResult<Bucket> {
        let mut buckets = self.buckets.write().await;
        if buckets.contains_key(&details.name) {
            return Err(StorageError::BucketAlreadyExists {
                bucket: details.name.clone(),
            });
        }

        buckets.insert(details.name.clone(), Arc::new(InMemory::new()));
        debug!(bucket = %details.name, "created in-memory bucket");

        Ok(Bucket {
            name: details.name.clone(),
            namespace: self.namespace.clone(),
            compartment_id: details.compartment_id.clone(),
            time_created: Utc::now(),
            etag: Some(uuid::Uuid::new_v4().to_string()),
        })
    }

    async fn bucket_exists(&self, name: &BucketName) -> StorageResult<bool> {
        Ok(self.buckets.read().await.contains_key(name))
    }

    async fn delete_bucket(&self, name: &BucketName) -> StorageResult<()> {
        let mut buckets = self.buckets.write().await;
        let store = buckets
            .get(name)
            .ok_or_else(|| StorageError::BucketNotFound {
                bucket: name.clone(),
            })?;

        if store.list(None).next().await.is_some() {
            return Err(StorageError::BucketNotEmpty {
                bucket: name.clone(),
            });
        }

        buckets.remove(name);
        debug!(bucket = %name, "deleted in-memory bucket");
        Ok(())
    }

    async fn open_bucket(&self, name: &BucketName) -> StorageResult<Arc<dyn ApacheObjectStore>> {
        let buckets = self.buckets.read().await;
        let store = buckets
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::BucketNotFound {
                bucket: name.clone(),
            })?;
        Ok(store as Arc<dyn ApacheObjectStore>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::CompartmentId;
    use object_store::{path::Path as ObjectPath, PutPayload};

    fn buckets() -> InMemoryBuckets {
        InMemoryBuckets::new(Namespace::new("local".to_string()).unwrap())
    }

    fn details(name: &str) -> CreateBucketDetails {
        CreateBucketDetails::new(
            BucketName::new(name.to_string()).unwrap(),
            CompartmentId::new("ocid1.tenancy.oc1..test".to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_bucket_lifecycle() {
        let ops = buckets();
        let details = details("lifecycle");

        let bucket = ops.create_bucket(&details).await.unwrap();
        assert_eq!(bucket.name, details.name);
        assert_eq!(bucket.namespace.as_str(), "local");
        assert!(ops.bucket_exists(&details.name).await.unwrap());

        assert_eq!(
            ops.create_bucket(&details).await.unwrap_err(),
            StorageError::BucketAlreadyExists {
                bucket: details.name.clone()
            }
        );

        ops.delete_bucket(&details.name).await.unwrap();
        assert!(!ops.bucket_exists(&details.name).await.unwrap());
        assert!(matches!(
            ops.open_bucket(&details.name).await,
            Err(StorageError::BucketNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_empty_bucket_is_kept() {
        let ops = buckets();
        let details = details("non-empty");
        ops.create_bucket(&details).await.unwrap();

        let store = ops.open_bucket(&details.name).await.unwrap();
        store
            .put(&ObjectPath::from("left-behind"), PutPayload::from_static(b"x"))
            .await
            .unwrap();

        assert_eq!(
            ops.delete_bucket(&details.name).await.unwrap_err(),
            StorageError::BucketNotEmpty {
                bucket: details.name.clone()
            }
        );
        assert!(ops.bucket_exists(&details.name).await.unwrap());
    }
}
