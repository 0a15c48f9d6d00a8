use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use object_store::{
    buffered::BufWriter, path::Path as ObjectPath, ObjectStore as ApacheObjectStore, PutPayload,
};
use std::io;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{bucket::BucketOperations, error::StoreError};
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{Bucket, CreateBucketDetails, ObjectSummary, PutObjectResponse},
        value_objects::{BucketName, Namespace, ObjectKey},
    },
    ports::storage::{ObjectBody, ObjectContent, ObjectStorageClient},
};

/// Adapter that implements our ObjectStorageClient on top of Apache
/// object_store, one store per bucket. `B` decides how buckets are created
/// and where they live.
pub struct ApacheObjectStoreAdapter<B> {
    buckets: B,
}

impl<B: BucketOperations> ApacheObjectStoreAdapter<B> {
    pub fn new(buckets: B) -> Self {
        Self { buckets }
    }

    pub fn buckets(&self) -> &B {
        &self.buckets
    }

    fn check_namespace(&self, namespace: &Namespace) -> StorageResult<()> {
        if namespace != self.buckets.namespace() {
            return Err(StorageError::NamespaceMismatch {
                expected: self.buckets.namespace().clone(),
                actual: namespace.clone(),
            });
        }
        Ok(())
    }

    async fn open(
        &self,
        namespace: &Namespace,
        bucket: &BucketName,
    ) -> StorageResult<Arc<dyn ApacheObjectStore>> {
        self.check_namespace(namespace)?;
        self.buckets.open_bucket(bucket).await
    }
}

/// Store location for `key`, taken verbatim. `ObjectPath::from` would
/// percent-encode characters such as `#` and `~`, and the listing would then
/// return a different name.
fn object_path(key: &ObjectKey) -> StorageResult<ObjectPath> {
    ObjectPath::parse(key.as_str()).map_err(|e| StorageError::ValidationError {
        message: format!("Invalid object name {:?}: {}", key.as_str(), e),
    })
}

/// Map an error raised through an AsyncWrite back to the store error that
/// caused it, if there is one
fn write_error(err: io::Error, bucket: &BucketName, key: &ObjectKey) -> StorageError {
    let from_store = err
        .get_ref()
        .map_or(false, |inner| inner.is::<object_store::Error>());
    if !from_store {
        return err.into();
    }
    match err.into_inner().map(|inner| inner.downcast::<object_store::Error>()) {
        Some(Ok(store_err)) => StoreError::from(*store_err).into_storage_error(bucket, Some(key)),
        _ => StorageError::IoError {
            message: "upload stream failed".to_string(),
        },
    }
}

#[async_trait]
impl<B: BucketOperations> ObjectStorageClient for ApacheObjectStoreAdapter<B> {
    async fn get_namespace(&self) -> StorageResult<Namespace> {
        Ok(self.buckets.namespace().clone())
    }

    async fn create_bucket(
        &self,
        namespace: &Namespace,
        details: CreateBucketDetails,
    ) -> StorageResult<Bucket> {
        self.check_namespace(namespace)?;
        self.buckets.create_bucket(&details).await
    }

    async fn delete_bucket(&self, namespace: &Namespace, bucket: &BucketName) -> StorageResult<()> {
        self.check_namespace(namespace)?;
        self.buckets.delete_bucket(bucket).await
    }

    async fn bucket_exists(&self, namespace: &Namespace, bucket: &BucketName) -> StorageResult<bool> {
        self.check_namespace(namespace)?;
        self.buckets.bucket_exists(bucket).await
    }

    async fn put_object(
        &self,
        namespace: &Namespace,
        bucket: &BucketName,
        key: &ObjectKey,
        body: ObjectBody,
    ) -> StorageResult<PutObjectResponse> {
        let store = self.open(namespace, bucket).await?;
        let path = object_path(key)?;

        match body {
            ObjectBody::Bytes(data) => {
                let size = data.len();
                let result = store
                    .put(&path, PutPayload::from(data))
                    .await
                    .map_err(|e| StoreError::from(e).into_storage_error(bucket, Some(key)))?;
                debug!(%bucket, %key, size, "stored object from memory");

                Ok(PutObjectResponse {
                    etag: result.e_tag,
                    version_id: result.version,
                })
            }
            ObjectBody::File(mut file) => {
                // Small files go up in a single put, larger ones as multipart
                let mut writer = BufWriter::new(store.clone(), path.clone());
                let size = tokio::io::copy(&mut file, &mut writer)
                    .await
                    .map_err(|e| write_error(e, bucket, key))?;
                writer
                    .shutdown()
                    .await
                    .map_err(|e| write_error(e, bucket, key))?;
                debug!(%bucket, %key, size, "streamed object from file");

                let meta = store
                    .head(&path)
                    .await
                    .map_err(|e| StoreError::from(e).into_storage_error(bucket, Some(key)))?;

                Ok(PutObjectResponse {
                    etag: meta.e_tag,
                    version_id: meta.version,
                })
            }
        }
    }

    async fn list_objects(
        &self,
        namespace: &Namespace,
        bucket: &BucketName,
        prefix: Option<&str>,
    ) -> StorageResult<Vec<ObjectSummary>> {
        let store = self.open(namespace, bucket).await?;
        let prefix_path = prefix
            .map(ObjectPath::parse)
            .transpose()
            .map_err(|e| StorageError::ValidationError {
                message: format!("Invalid prefix: {}", e),
            })?;

        let mut stream = store.list(prefix_path.as_ref());
        let mut objects = Vec::new();

        while let Some(result) = stream.next().await {
            let meta = result.map_err(|e| StoreError::from(e).into_storage_error(bucket, None))?;

            let name = ObjectKey::new(meta.location.to_string()).map_err(|e| {
                StorageError::ValidationError {
                    message: format!("Invalid object name from store: {}", e),
                }
            })?;

            objects.push(ObjectSummary {
                name,
                size: meta.size,
                time_created: meta.last_modified,
                etag: meta.e_tag,
            });
        }

        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    async fn get_object(
        &self,
        namespace: &Namespace,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<ObjectContent> {
        let store = self.open(namespace, bucket).await?;
        let path = object_path(key)?;

        let result = store
            .get(&path)
            .await
            .map_err(|e| StoreError::from(e).into_storage_error(bucket, Some(key)))?;

        let size = result.meta.size;
        let etag = result.meta.e_tag.clone();
        let (stream_bucket, stream_key) = (bucket.clone(), key.clone());
        let stream = result
            .into_stream()
            .map_err(move |e| StoreError::from(e).into_storage_error(&stream_bucket, Some(&stream_key)))
            .boxed();

        Ok(ObjectContent::new(key.clone(), size, etag, stream))
    }

    async fn delete_object(
        &self,
        namespace: &Namespace,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<()> {
        let store = self.open(namespace, bucket).await?;
        let path = object_path(key)?;

        store
            .delete(&path)
            .await
            .map_err(|e| StoreError::from(e).into_storage_error(bucket, Some(key)))?;
        debug!(%bucket, %key, "deleted object");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::storage::InMemoryBuckets;
    use crate::domain::value_objects::CompartmentId;
    use bytes::Bytes;
    use std::io::Write;

    async fn adapter_with_bucket() -> (ApacheObjectStoreAdapter<InMemoryBuckets>, Namespace, BucketName) {
        let namespace = Namespace::new("local".to_string()).unwrap();
        let adapter = ApacheObjectStoreAdapter::new(InMemoryBuckets::new(namespace.clone()));
        let bucket = BucketName::new("adapter-test".to_string()).unwrap();
        adapter
            .create_bucket(
                &namespace,
                CreateBucketDetails::new(
                    bucket.clone(),
                    CompartmentId::new("ocid1.tenancy.oc1..test".to_string()).unwrap(),
                ),
            )
            .await
            .unwrap();
        (adapter, namespace, bucket)
    }

    #[tokio::test]
    async fn test_basic_object_operations() {
        let (adapter, ns, bucket) = adapter_with_bucket().await;

        let key = ObjectKey::new("test/key".to_string()).unwrap();
        let data = Bytes::from_static(b"test data");

        // Test put
        adapter
            .put_object(&ns, &bucket, &key, data.clone().into())
            .await
            .unwrap();

        // Test get
        let retrieved = adapter.get_object(&ns, &bucket, &key).await.unwrap();
        assert_eq!(retrieved.content_length, data.len() as u64);
        assert_eq!(retrieved.bytes().await.unwrap(), data);

        // Test list
        let listed = adapter.list_objects(&ns, &bucket, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, key);
        assert_eq!(listed[0].size, data.len() as u64);

        // Test delete
        adapter.delete_object(&ns, &bucket, &key).await.unwrap();
        assert!(adapter.list_objects(&ns, &bucket, None).await.unwrap().is_empty());
        assert!(matches!(
            adapter.get_object(&ns, &bucket, &key).await,
            Err(StorageError::ObjectNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_upload_streams_whole_file() {
        let (adapter, ns, bucket) = adapter_with_bucket().await;
        let key = ObjectKey::new("from-file".to_string()).unwrap();

        let mut source = tempfile::NamedTempFile::new().unwrap();
        let contents: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        source.write_all(&contents).unwrap();

        let file = tokio::fs::File::open(source.path()).await.unwrap();
        adapter
            .put_object(&ns, &bucket, &key, file.into())
            .await
            .unwrap();

        let retrieved = adapter.get_object(&ns, &bucket, &key).await.unwrap();
        assert_eq!(retrieved.bytes().await.unwrap().as_ref(), contents.as_slice());
    }

    #[tokio::test]
    async fn test_list_with_prefix() {
        let (adapter, ns, bucket) = adapter_with_bucket().await;
        for name in ["logs/a", "logs/b", "data/c"] {
            let key = ObjectKey::new(name.to_string()).unwrap();
            adapter
                .put_object(&ns, &bucket, &key, Bytes::from_static(b"x").into())
                .await
                .unwrap();
        }

        let logs = adapter.list_objects(&ns, &bucket, Some("logs")).await.unwrap();
        let names: Vec<&str> = logs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["logs/a", "logs/b"]);
    }

    #[tokio::test]
    async fn test_names_are_stored_verbatim() {
        let (adapter, ns, bucket) = adapter_with_bucket().await;
        let names = ["50%off", "a#b", "c~d", "héllo wörld", "notes/x[1]{2}"];
        for name in names {
            let key = ObjectKey::new(name.to_string()).unwrap();
            adapter
                .put_object(&ns, &bucket, &key, Bytes::from(name.to_string()).into())
                .await
                .unwrap();
        }

        let listed = adapter.list_objects(&ns, &bucket, None).await.unwrap();
        let listed: Vec<&str> = listed.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(listed, names.to_vec());

        let key = ObjectKey::new("a#b".to_string()).unwrap();
        let body = adapter.get_object(&ns, &bucket, &key).await.unwrap();
        assert_eq!(body.bytes().await.unwrap(), Bytes::from_static(b"a#b"));
    }

    #[tokio::test]
    async fn test_wrong_namespace_is_rejected() {
        let (adapter, _, bucket) = adapter_with_bucket().await;
        let other = Namespace::new("other".to_string()).unwrap();

        assert!(matches!(
            adapter.list_objects(&other, &bucket, None).await,
            Err(StorageError::NamespaceMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_bucket() {
        let (adapter, ns, _) = adapter_with_bucket().await;
        let missing = BucketName::new("missing".to_string()).unwrap();
        let key = ObjectKey::new("k".to_string()).unwrap();

        assert!(matches!(
            adapter
                .put_object(&ns, &missing, &key, Bytes::from_static(b"x").into())
                .await,
            Err(StorageError::BucketNotFound { .. })
        ));
    }
}
