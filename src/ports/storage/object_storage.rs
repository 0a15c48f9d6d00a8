use crate::domain::{
    errors::{StorageError, StorageResult},
    models::{Bucket, CreateBucketDetails, ObjectSummary, PutObjectResponse},
    value_objects::{BucketName, Namespace, ObjectKey},
};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{stream::BoxStream, StreamExt, TryStreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;

/// Port for the object storage service.
///
/// Every call names the namespace and bucket explicitly, the way the remote
/// API addresses resources. Retries, signing and transport are the
/// implementation's concern.
#[async_trait]
pub trait ObjectStorageClient: Send + Sync + 'static {
    /// Namespace of the tenancy the client is configured for
    async fn get_namespace(&self) -> StorageResult<Namespace>;

    /// Create a bucket in the given compartment
    async fn create_bucket(
        &self,
        namespace: &Namespace,
        details: CreateBucketDetails,
    ) -> StorageResult<Bucket>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, namespace: &Namespace, bucket: &BucketName)
        -> StorageResult<()>;

    /// Check if a bucket exists
    async fn bucket_exists(&self, namespace: &Namespace, bucket: &BucketName)
        -> StorageResult<bool>;

    /// Store an object, replacing any object with the same name
    async fn put_object(
        &self,
        namespace: &Namespace,
        bucket: &BucketName,
        key: &ObjectKey,
        body: ObjectBody,
    ) -> StorageResult<PutObjectResponse>;

    /// List every object in the bucket, optionally restricted to a prefix
    async fn list_objects(
        &self,
        namespace: &Namespace,
        bucket: &BucketName,
        prefix: Option<&str>,
    ) -> StorageResult<Vec<ObjectSummary>>;

    /// Open an object for reading
    async fn get_object(
        &self,
        namespace: &Namespace,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<ObjectContent>;

    /// Delete an object
    async fn delete_object(
        &self,
        namespace: &Namespace,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<()>;
}

/// Payload of an upload
#[derive(Debug)]
pub enum ObjectBody {
    /// Bytes already in memory
    Bytes(Bytes),
    /// An open file, streamed to the service
    File(tokio::fs::File),
}

impl From<Bytes> for ObjectBody {
    fn from(value: Bytes) -> Self {
        ObjectBody::Bytes(value)
    }
}

impl From<Vec<u8>> for ObjectBody {
    fn from(value: Vec<u8>) -> Self {
        ObjectBody::Bytes(Bytes::from(value))
    }
}

impl From<tokio::fs::File> for ObjectBody {
    fn from(value: tokio::fs::File) -> Self {
        ObjectBody::File(value)
    }
}

/// An object opened for reading. The body is a stream of chunks that is
/// consumed either into memory or into a writer.
pub struct ObjectContent {
    pub key: ObjectKey,
    pub content_length: u64,
    pub etag: Option<String>,
    stream: BoxStream<'static, StorageResult<Bytes>>,
}

impl ObjectContent {
    pub fn new(
        key: ObjectKey,
        content_length: u64,
        etag: Option<String>,
        stream: BoxStream<'static, StorageResult<Bytes>>,
    ) -> Self {
        Self {
            key,
            content_length,
            etag,
            stream,
        }
    }

    /// Wrap bytes already held in memory
    pub fn from_bytes(key: ObjectKey, data: Bytes, etag: Option<String>) -> Self {
        let len = data.len() as u64;
        Self::new(key, len, etag, futures::stream::once(async move { Ok(data) }).boxed())
    }

    /// Collect the whole body into memory
    pub async fn bytes(self) -> StorageResult<Bytes> {
        let mut buf = BytesMut::with_capacity(self.content_length as usize);
        let mut stream = self.stream;
        while let Some(chunk) = stream.try_next().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }

    /// Stream the body into `writer`, issuing writes of `chunk_size` bytes.
    /// Returns the number of bytes written.
    pub async fn write_to<W>(self, writer: W, chunk_size: usize) -> StorageResult<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut reader = StreamReader::new(self.stream.map_err(std::io::Error::other));
        let mut writer = BufWriter::with_capacity(chunk_size.max(1), writer);

        let written = tokio::io::copy(&mut reader, &mut writer)
            .await
            .map_err(|e| match into_storage_error(e) {
                Ok(storage_err) => storage_err,
                Err(io_err) => io_err.into(),
            })?;
        writer.flush().await?;

        Ok(written)
    }
}

impl std::fmt::Debug for ObjectContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectContent")
            .field("key", &self.key)
            .field("content_length", &self.content_length)
            .field("etag", &self.etag)
            .finish_non_exhaustive()
    }
}

/// Recover a StorageError that was tunnelled through an io::Error by the
/// stream reader
fn into_storage_error(err: std::io::Error) -> Result<StorageError, std::io::Error> {
    let is_storage = err
        .get_ref()
        .map_or(false, |inner| inner.is::<StorageError>());
    if !is_storage {
        return Err(err);
    }
    match err.into_inner().map(|inner| inner.downcast::<StorageError>()) {
        Some(Ok(storage_err)) => Ok(*storage_err),
        _ => Err(std::io::Error::other("unrecoverable stream error")),
    }
}
