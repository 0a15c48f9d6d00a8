use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::local_files::{file_md5, files_identical, retrieved_path_for};
use crate::{
    domain::{
        errors::{StorageError, StorageResult, ValidationError},
        models::{CreateBucketDetails, ObjectSummary, PutObjectResponse, WalkthroughReport},
        value_objects::{BucketName, CompartmentId, Namespace, ObjectKey},
    },
    ports::{
        prompt::OperatorPrompt,
        storage::{ObjectBody, ObjectContent, ObjectStorageClient},
    },
};

pub const DEFAULT_BUCKET_NAME: &str = "rust-sdk-example-bucket";
pub const DEFAULT_DATA_OBJECT_NAME: &str = "rust-sdk-example-object";
pub const DEFAULT_FILE_OBJECT_NAME: &str = "example_file_object";

/// Downloads are written to disk in chunks of this size
pub const DOWNLOAD_CHUNK_SIZE: usize = 1024 * 1024;

pub const PAUSE_MESSAGE: &str =
    "\nPause to check object storage before cleaning up. Press Enter to continue> ";

/// The in-memory payload uploaded as the data object
pub fn example_payload() -> Bytes {
    Bytes::from("Hello, World!".repeat(3))
}

/// Names and payload used by a run
#[derive(Debug, Clone)]
pub struct WalkthroughOptions {
    pub bucket_name: BucketName,
    pub data_object: ObjectKey,
    pub file_object: ObjectKey,
    pub payload: Bytes,
    pub chunk_size: usize,
}

impl WalkthroughOptions {
    pub fn new(bucket_name: BucketName, data_object: ObjectKey, file_object: ObjectKey) -> Self {
        Self {
            bucket_name,
            data_object,
            file_object,
            payload: example_payload(),
            chunk_size: DOWNLOAD_CHUNK_SIZE,
        }
    }

    /// Options with the stock bucket and object names
    pub fn defaults() -> Result<Self, ValidationError> {
        Ok(Self::new(
            BucketName::new(DEFAULT_BUCKET_NAME.to_string())?,
            ObjectKey::new(DEFAULT_DATA_OBJECT_NAME.to_string())?,
            ObjectKey::new(DEFAULT_FILE_OBJECT_NAME.to_string())?,
        ))
    }

    pub fn with_payload(mut self, payload: Bytes) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Objects created by a run, in upload order
    pub fn object_names(&self) -> [ObjectKey; 2] {
        [self.data_object.clone(), self.file_object.clone()]
    }
}

/// What clean-up managed to remove
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanupOutcome {
    pub deleted: Vec<ObjectKey>,
    pub bucket_deleted: bool,
    pub errors: Vec<StorageError>,
}

/// Bucket and object lifecycle walkthrough over an object storage client
pub struct CrudWalkthrough {
    client: Arc<dyn ObjectStorageClient>,
    prompt: Arc<dyn OperatorPrompt>,
    compartment_id: CompartmentId,
    options: WalkthroughOptions,
}

impl CrudWalkthrough {
    pub fn new(
        client: Arc<dyn ObjectStorageClient>,
        prompt: Arc<dyn OperatorPrompt>,
        compartment_id: CompartmentId,
        options: WalkthroughOptions,
    ) -> Self {
        Self {
            client,
            prompt,
            compartment_id,
            options,
        }
    }

    pub fn options(&self) -> &WalkthroughOptions {
        &self.options
    }

    pub async fn upload_object(
        &self,
        namespace: &Namespace,
        name: &ObjectKey,
        body: ObjectBody,
    ) -> StorageResult<PutObjectResponse> {
        info!("Uploading new object {:?}", name.as_str());
        self.client
            .put_object(namespace, &self.options.bucket_name, name, body)
            .await
    }

    pub async fn retrieve_object(
        &self,
        namespace: &Namespace,
        name: &ObjectKey,
    ) -> StorageResult<ObjectContent> {
        info!("Retrieving object {:?}", name.as_str());
        self.client
            .get_object(namespace, &self.options.bucket_name, name)
            .await
    }

    /// List the bucket, logging name, size and creation time of each object
    pub async fn show_objects(&self, namespace: &Namespace) -> StorageResult<Vec<ObjectSummary>> {
        let bucket = &self.options.bucket_name;
        info!("List objects in bucket {:?}", bucket.as_str());

        let objects = self.client.list_objects(namespace, bucket, None).await?;
        for item in &objects {
            info!(
                "Object <{}> with size <{}> created on <{}>",
                item.name,
                item.size,
                item.time_created.to_rfc3339()
            );
        }
        Ok(objects)
    }

    /// Delete `names` in order, stopping at the first failure, then delete
    /// the bucket whatever happened to the objects
    pub async fn clean_up(&self, namespace: &Namespace, names: &[ObjectKey]) -> CleanupOutcome {
        let bucket = &self.options.bucket_name;
        let mut outcome = CleanupOutcome::default();

        for name in names {
            info!("Deleting object {}", name);
            match self.client.delete_object(namespace, bucket, name).await {
                Ok(()) => outcome.deleted.push(name.clone()),
                Err(e) => {
                    warn!(object = %name, error = %e, "failed to delete object");
                    outcome.errors.push(e);
                    break;
                }
            }
        }

        info!("Deleting bucket {}", bucket);
        match self.client.delete_bucket(namespace, bucket).await {
            Ok(()) => outcome.bucket_deleted = true,
            Err(e) => {
                error!(%bucket, error = %e, "failed to delete bucket");
                outcome.errors.push(e);
            }
        }

        outcome
    }

    /// Run the whole walkthrough for `source`.
    ///
    /// Errors from any step are recorded in the report rather than returned.
    /// Once the namespace is known, the operator pause and the clean-up always
    /// run, and the downloaded copy is removed whenever it exists.
    pub async fn run(&self, source: &Path) -> WalkthroughReport {
        let retrieved_path = retrieved_path_for(source);
        let mut report = WalkthroughReport {
            bucket_name: Some(self.options.bucket_name.clone()),
            retrieved_path: Some(retrieved_path.clone()),
            ..Default::default()
        };

        match self.client.get_namespace().await {
            Ok(namespace) => {
                if let Err(e) = self.exercise(&namespace, source, &retrieved_path, &mut report).await
                {
                    if e.is_service_error() {
                        error!(status = e.status(), error = %e, "object storage request failed");
                    } else {
                        error!(error = %e, "walkthrough step failed before reaching the service");
                    }
                    report.error = Some(e.to_string());
                }

                if let Err(e) = self.prompt.pause(PAUSE_MESSAGE).await {
                    warn!(error = %e, "operator prompt failed, continuing with clean-up");
                }

                let outcome = self
                    .clean_up(&namespace, &self.options.object_names())
                    .await;
                report.deleted = outcome.deleted;
                report.bucket_deleted = outcome.bucket_deleted;
                report
                    .cleanup_errors
                    .extend(outcome.errors.iter().map(|e| e.to_string()));
            }
            Err(e) => {
                error!(error = %e, "could not resolve namespace");
                report.error = Some(e.to_string());
            }
        }

        self.remove_artifact(&retrieved_path, &mut report).await;
        report
    }

    async fn exercise(
        &self,
        namespace: &Namespace,
        source: &Path,
        retrieved_path: &Path,
        report: &mut WalkthroughReport,
    ) -> StorageResult<()> {
        let options = &self.options;

        info!(
            "Creating a new bucket {:?} in compartment {:?} with namespace {:?}",
            options.bucket_name.as_str(),
            self.compartment_id.as_str(),
            namespace.as_str()
        );
        let details =
            CreateBucketDetails::new(options.bucket_name.clone(), self.compartment_id.clone());
        report.bucket = Some(self.client.create_bucket(namespace, details).await?);

        self.upload_object(namespace, &options.data_object, options.payload.clone().into())
            .await?;
        report.uploaded.push(options.data_object.clone());

        {
            let file = tokio::fs::File::open(source).await?;
            self.upload_object(namespace, &options.file_object, file.into())
                .await?;
        }
        report.uploaded.push(options.file_object.clone());

        report.listed = self.show_objects(namespace).await?;

        let retrieved = self
            .retrieve_object(namespace, &options.data_object)
            .await?
            .bytes()
            .await?;
        let string_matches = retrieved == options.payload;
        info!(
            "{:?} == {:?}: {}",
            String::from_utf8_lossy(&options.payload),
            String::from_utf8_lossy(&retrieved),
            string_matches
        );
        report.string_matches = Some(string_matches);

        info!("Retrieving file from object storage");
        let content = self.retrieve_object(namespace, &options.file_object).await?;
        let written = {
            let out = tokio::fs::File::create(retrieved_path).await?;
            content.write_to(out, options.chunk_size).await?
        };
        info!(path = %retrieved_path.display(), bytes = written, "downloaded file");

        let file_matches = files_identical(source, retrieved_path).await?;
        info!("Uploaded and downloaded files are the same: {}", file_matches);
        report.file_matches = Some(file_matches);
        report.source_md5 = Some(file_md5(source).await?);
        report.retrieved_md5 = Some(file_md5(retrieved_path).await?);

        Ok(())
    }

    async fn remove_artifact(&self, retrieved_path: &Path, report: &mut WalkthroughReport) {
        match tokio::fs::try_exists(retrieved_path).await {
            Ok(true) => {
                info!("Deleting downloaded file {}", retrieved_path.display());
                match tokio::fs::remove_file(retrieved_path).await {
                    Ok(()) => report.artifact_removed = true,
                    Err(e) => {
                        warn!(path = %retrieved_path.display(), error = %e, "failed to remove downloaded file");
                        report.cleanup_errors.push(e.to_string());
                    }
                }
            }
            Ok(false) => {}
            Err(e) => report.cleanup_errors.push(e.to_string()),
        }
    }
}
