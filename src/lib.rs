pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core entities and value objects
pub use domain::{
    // Models
    Bucket,
    // Value objects
    BucketName,
    CompartmentId,
    CreateBucketDetails,
    DomainValidationError,
    Namespace,
    ObjectKey,
    ObjectSummary,
    PutObjectResponse,
    // Errors
    StorageError,
    StorageResult,
    WalkthroughReport,
};

// Port types - interfaces for external systems
pub use ports::{NoPause, ObjectBody, ObjectContent, ObjectStorageClient, OperatorPrompt};

// Services - the walkthrough itself
pub use services::{CleanupOutcome, CrudWalkthrough, WalkthroughOptions};

// Application factory and configuration
pub use app::{
    create_in_memory_client, create_local_client, AppBuilder, AppConfig, AppError,
    StorageBackend,
};
pub use config::{ClientConfig, ConfigError};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{
    ApacheObjectStoreAdapter, InMemoryBuckets, LocalBuckets, S3Buckets, S3Config,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_client, create_local_client, AppBuilder, BucketName, ClientConfig,
        CrudWalkthrough, Namespace, NoPause, ObjectKey, ObjectStorageClient, StorageBackend,
        WalkthroughOptions, WalkthroughReport,
    };
}
