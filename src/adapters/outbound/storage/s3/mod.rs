//! S3-compatible storage backend built on the object_store crate
//!
//! Object traffic uses `AmazonS3` scoped to one bucket. Bucket create, delete
//! and existence checks are plain HTTP requests against URLs pre-signed by
//! the same store, so they share its credentials and signing.

mod bucket_client;

pub use bucket_client::S3Buckets;

use object_store::aws::{AmazonS3, AmazonS3Builder};

use super::error::StoreError;
use crate::domain::value_objects::{BucketName, Namespace};

/// Configuration for S3 storage backend
#[derive(Debug, Clone)]
pub struct S3Config {
    pub namespace: Namespace,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub allow_http: bool,
}

impl S3Config {
    /// Endpoint to address. Without an explicit endpoint this is the Oracle
    /// Cloud S3 compatibility endpoint for the namespace and region.
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.compat.objectstorage.{}.oraclecloud.com",
                self.namespace, self.region
            ),
        }
    }
}

/// Create an S3 store scoped to `bucket`
pub fn create_s3_store(config: &S3Config, bucket: &BucketName) -> Result<AmazonS3, StoreError> {
    let store = AmazonS3Builder::new()
        .with_bucket_name(bucket.as_str())
        .with_region(&config.region)
        .with_endpoint(config.endpoint())
        .with_access_key_id(&config.access_key_id)
        .with_secret_access_key(&config.secret_access_key)
        .with_virtual_hosted_style_request(false)
        .with_allow_http(config.allow_http)
        .build()?;

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>) -> S3Config {
        S3Config {
            namespace: Namespace::new("axaxnpcrorw5".to_string()).unwrap(),
            region: "us-ashburn-1".to_string(),
            endpoint: endpoint.map(str::to_string),
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
            allow_http: false,
        }
    }

    #[test]
    fn test_default_endpoint_is_compat_api() {
        assert_eq!(
            config(None).endpoint(),
            "https://axaxnpcrorw5.compat.objectstorage.us-ashburn-1.oraclecloud.com"
        );
    }

    #[test]
    fn test_explicit_endpoint_wins() {
        assert_eq!(
            config(Some("http://localhost:9000/")).endpoint(),
            "http://localhost:9000"
        );
    }

    #[test]
    fn test_store_builds_without_network() {
        let bucket = BucketName::new("demo-bucket".to_string()).unwrap();
        assert!(create_s3_store(&config(None), &bucket).is_ok());
    }
}
