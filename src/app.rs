use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    adapters::outbound::storage::{
        ApacheObjectStoreAdapter, InMemoryBuckets, LocalBuckets, S3Buckets, S3Config, StoreError,
    },
    config::{ClientConfig, ConfigError},
    domain::value_objects::{CompartmentId, Namespace},
    ports::storage::ObjectStorageClient,
};

/// Namespace used by the memory and local backends when the profile has none
pub const LOCAL_NAMESPACE: &str = "local";

/// Compartment used when no configuration file is involved
pub const LOCAL_COMPARTMENT: &str = "ocid1.tenancy.oc1..local";

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: Option<ClientConfig>,
    pub storage_backend: StorageBackend,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: None,
            storage_backend: StorageBackend::InMemory,
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    InMemory,
    /// Buckets as directories. Without a root, `storage_root` from the
    /// profile is used.
    Local { root: Option<PathBuf> },
    S3,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::InMemory),
            "local" | "fs" => Ok(Self::Local { root: None }),
            "s3" | "oci" => Ok(Self::S3),
            other => Err(AppError::Configuration {
                message: format!("Unknown storage backend: {}", other),
            }),
        }
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Use the settings of a loaded profile
    pub fn with_client_config(mut self, client: ClientConfig) -> Self {
        self.config.client = Some(client);
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Compartment that will own created buckets
    pub fn compartment_id(&self) -> Result<CompartmentId, AppError> {
        match &self.config.client {
            Some(client) => Ok(client.compartment_id().clone()),
            None => CompartmentId::new(LOCAL_COMPARTMENT.to_string()).map_err(|e| {
                AppError::Configuration {
                    message: e.to_string(),
                }
            }),
        }
    }

    /// Build the storage client for the configured backend
    pub fn build(self) -> Result<Arc<dyn ObjectStorageClient>, AppError> {
        match &self.config.storage_backend {
            StorageBackend::InMemory => {
                let buckets = InMemoryBuckets::new(self.local_namespace()?);
                Ok(Arc::new(ApacheObjectStoreAdapter::new(buckets)))
            }
            StorageBackend::Local { root } => {
                let root = root
                    .clone()
                    .or_else(|| self.config.client.as_ref()?.storage_root.clone())
                    .ok_or_else(|| AppError::Configuration {
                        message: "storage_root is required for the local backend".to_string(),
                    })?;
                let buckets = LocalBuckets::new(self.local_namespace()?, root);
                Ok(Arc::new(ApacheObjectStoreAdapter::new(buckets)))
            }
            StorageBackend::S3 => {
                let buckets = S3Buckets::new(self.s3_config()?)?;
                Ok(Arc::new(ApacheObjectStoreAdapter::new(buckets)))
            }
        }
    }

    fn local_namespace(&self) -> Result<Namespace, AppError> {
        if let Some(namespace) = self.config.client.as_ref().and_then(|c| c.namespace.clone()) {
            return Ok(namespace);
        }
        Namespace::new(LOCAL_NAMESPACE.to_string()).map_err(|e| AppError::Configuration {
            message: e.to_string(),
        })
    }

    fn s3_config(&self) -> Result<S3Config, AppError> {
        let client = self.config.client.as_ref().ok_or_else(|| AppError::Configuration {
            message: "A client configuration is required for the s3 backend".to_string(),
        })?;

        let namespace = client.namespace.clone().ok_or(ConfigError::MissingKey {
            key: "namespace",
            profile: client.profile.clone(),
        })?;

        Ok(S3Config {
            namespace,
            region: client.require("region", &client.region)?.to_string(),
            endpoint: client.endpoint.clone(),
            access_key_id: client.require("access_key_id", &client.access_key_id)?.to_string(),
            secret_access_key: client
                .require("secret_access_key", &client.secret_access_key)?
                .to_string(),
            allow_http: client.allow_http,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Storage initialization error: {0}")]
    StorageInit(#[from] StoreError),
}

/// Create an in-memory client for testing and dry runs
pub fn create_in_memory_client() -> Result<Arc<dyn ObjectStorageClient>, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .build()
}

/// Create a client whose buckets are directories under `root`
pub fn create_local_client(
    root: impl Into<PathBuf>,
) -> Result<Arc<dyn ObjectStorageClient>, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::Local {
            root: Some(root.into()),
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn client_config(pairs: &[(&str, &str)]) -> ClientConfig {
        let entries: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_entries("DEFAULT", entries).unwrap()
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::InMemory);
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "local".parse::<StorageBackend>().unwrap(),
            StorageBackend::Local { root: None }
        );
        assert!("minio".parse::<StorageBackend>().is_err());
    }

    #[tokio::test]
    async fn test_create_in_memory_client() {
        let client = create_in_memory_client().unwrap();
        assert_eq!(client.get_namespace().await.unwrap().as_str(), LOCAL_NAMESPACE);
    }

    #[tokio::test]
    async fn test_profile_namespace_is_used() {
        let client = AppBuilder::new()
            .with_client_config(client_config(&[
                ("tenancy", "ocid1.tenancy.oc1..abc"),
                ("namespace", "mytenancy"),
            ]))
            .build()
            .unwrap();
        assert_eq!(client.get_namespace().await.unwrap().as_str(), "mytenancy");
    }

    #[test]
    fn test_compartment_comes_from_tenancy() {
        let builder = AppBuilder::new()
            .with_client_config(client_config(&[("tenancy", "ocid1.tenancy.oc1..abc")]));
        assert_eq!(builder.compartment_id().unwrap().as_str(), "ocid1.tenancy.oc1..abc");
        assert_eq!(
            AppBuilder::new().compartment_id().unwrap().as_str(),
            LOCAL_COMPARTMENT
        );
    }

    #[test]
    fn test_local_backend_needs_root() {
        let result = AppBuilder::new()
            .with_storage_backend(StorageBackend::Local { root: None })
            .build();
        assert!(matches!(result, Err(AppError::Configuration { .. })));

        let dir = tempfile::tempdir().unwrap();
        let result = AppBuilder::new()
            .with_client_config(client_config(&[
                ("tenancy", "ocid1.tenancy.oc1..abc"),
                ("storage_root", dir.path().to_str().unwrap()),
            ]))
            .with_storage_backend(StorageBackend::Local { root: None })
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_s3_backend_requires_credentials() {
        let result = AppBuilder::new()
            .with_client_config(client_config(&[
                ("tenancy", "ocid1.tenancy.oc1..abc"),
                ("namespace", "mytenancy"),
                ("region", "us-ashburn-1"),
            ]))
            .with_storage_backend(StorageBackend::S3)
            .build();
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::MissingKey {
                key: "access_key_id",
                ..
            }))
        ));

        let result = AppBuilder::new()
            .with_client_config(client_config(&[
                ("tenancy", "ocid1.tenancy.oc1..abc"),
                ("namespace", "mytenancy"),
                ("region", "us-ashburn-1"),
                ("access_key_id", "AKID"),
                ("secret_access_key", "SECRET"),
            ]))
            .with_storage_backend(StorageBackend::S3)
            .build();
        assert!(result.is_ok());
    }
}
