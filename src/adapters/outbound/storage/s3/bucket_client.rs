use async_trait::async_trait;
use chrono::Utc;
use http::Method;
use object_store::{path::Path as ObjectPath, signer::Signer, ObjectStore as ApacheObjectStore};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{create_s3_store, S3Config};
use crate::adapters::outbound::storage::{bucket::BucketOperations, error::StoreError};
use crate::domain::{
    errors::StorageResult,
    models::{Bucket, CreateBucketDetails},
    value_objects::{BucketName, Namespace},
};

/// Lifetime of the pre-signed URLs used for bucket requests
const PRESIGN_TTL: Duration = Duration::from_secs(300);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bucket operations against an S3-compatible endpoint
#[derive(Clone, Debug)]
pub struct S3Buckets {
    config: S3Config,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

impl S3Buckets {
    pub fn new(config: S3Config) -> Result<Self, StoreError> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Sign and execute a request addressed to the bucket itself
    async fn execute_request(
        &self,
        method: Method,
        bucket: &BucketName,
        body: Option<String>,
    ) -> Result<reqwest::Response, StoreError> {
        let store = create_s3_store(&self.config, bucket)?;
        let url = store
            .signed_url(method.clone(), &ObjectPath::default(), PRESIGN_TTL)
            .await?;

        let method = match method.as_str() {
            "HEAD" => reqwest::Method::HEAD,
            "PUT" => reqwest::Method::PUT,
            "DELETE" => reqwest::Method::DELETE,
            other => {
                return Err(StoreError::Other(format!(
                    "Method not supported for bucket requests: {}",
                    other
                )));
            }
        };

        let mut request = self.http_client.request(method, url.as_str());
        if let Some(body) = body {
            request = request.header("Content-Type", "application/xml").body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        Err(parse_service_error(status.as_u16(), &body))
    }
}

/// Turn an error response into a service error, using the XML error body
/// when there is one
fn parse_service_error(status: u16, body: &str) -> StoreError {
    match quick_xml::de::from_str::<ErrorResponse>(body) {
        Ok(err) => StoreError::Service {
            status,
            code: err.code,
            message: err.message,
        },
        Err(_) => StoreError::Service {
            status,
            code: match status {
                401 => "NotAuthenticated",
                403 => "Forbidden",
                404 => "NotFound",
                409 => "Conflict",
                _ => "Unknown",
            }
            .to_string(),
            message: body.trim().to_string(),
        },
    }
}

#[async_trait]
impl BucketOperations for S3Buckets {
    fn namespace(&self) -> &Namespace {
        &self.config.namespace
    }

    async fn create_bucket(&self, details: &CreateBucketDetails) -> StorageResult<Bucket> {
        let region = &self.config.region;

        // Build the request body with location constraint if needed
        let body = if region == "us-east-1" {
            None
        } else {
            Some(format!(
                "<CreateBucketConfiguration><LocationConstraint>{}</LocationConstraint></CreateBucketConfiguration>",
                region
            ))
        };

        self.execute_request(Method::PUT, &details.name, body)
            .await
            .map_err(|e| e.into_storage_error(&details.name, None))?;
        debug!(
            bucket = %details.name,
            compartment = %details.compartment_id,
            endpoint = %self.config.endpoint(),
            "created bucket"
        );

        Ok(Bucket {
            name: details.name.clone(),
            namespace: self.config.namespace.clone(),
            compartment_id: details.compartment_id.clone(),
            time_created: Utc::now(),
            etag: None,
        })
    }

    async fn bucket_exists(&self, name: &BucketName) -> StorageResult<bool> {
        match self.execute_request(Method::HEAD, name, None).await {
            Ok(_) => Ok(true),
            Err(StoreError::Service { status: 404, .. }) => Ok(false),
            Err(e) => Err(e.into_storage_error(name, None)),
        }
    }

    async fn delete_bucket(&self, name: &BucketName) -> StorageResult<()> {
        self.execute_request(Method::DELETE, name, None)
            .await
            .map_err(|e| e.into_storage_error(name, None))?;
        debug!(bucket = %name, "deleted bucket");
        Ok(())
    }

    async fn open_bucket(&self, name: &BucketName) -> StorageResult<Arc<dyn ApacheObjectStore>> {
        let store = create_s3_store(&self.config, name).map_err(|e| e.into_storage_error(name, None))?;
        Ok(Arc::new(store))
    }
}
