// Infrastructure error types
pub mod error;

// Storage implementations
pub mod apache_object_store_adapter;
pub mod bucket;
pub mod local;

// Provider-specific implementations
pub mod s3;

// Re-export key types
pub use apache_object_store_adapter::ApacheObjectStoreAdapter;
pub use bucket::{BucketOperations, InMemoryBuckets};
pub use error::StoreError;
pub use local::LocalBuckets;
pub use s3::{S3Buckets, S3Config};
