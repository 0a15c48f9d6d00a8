use crate::domain::value_objects::{BucketName, Namespace, ObjectKey};

/// Errors that can occur during storage operations
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Bucket does not exist in the namespace
    BucketNotFound { bucket: BucketName },

    /// Bucket with the same name already exists
    BucketAlreadyExists { bucket: BucketName },

    /// Bucket still holds objects and cannot be deleted
    BucketNotEmpty { bucket: BucketName },

    /// Object not found
    ObjectNotFound { bucket: BucketName, key: ObjectKey },

    /// Request addressed a namespace other than the tenancy's
    NamespaceMismatch {
        expected: Namespace,
        actual: Namespace,
    },

    /// Error reported by the remote service
    ServiceError {
        status: u16,
        code: String,
        message: String,
    },

    /// Validation error
    ValidationError { message: String },

    /// Local I/O failure while reading or writing a file
    IoError { message: String },

    /// Infrastructure error with external source
    InfrastructureError {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },
}

impl StorageError {
    /// Status code equivalent, as the remote service would report it
    pub fn status(&self) -> u16 {
        match self {
            StorageError::BucketNotFound { .. } | StorageError::ObjectNotFound { .. } => 404,
            StorageError::BucketAlreadyExists { .. } | StorageError::BucketNotEmpty { .. } => 409,
            StorageError::NamespaceMismatch { .. } | StorageError::ValidationError { .. } => 400,
            StorageError::ServiceError { status, .. } => *status,
            StorageError::IoError { .. } | StorageError::InfrastructureError { .. } => 500,
        }
    }

    /// True for errors the storage service answered with. Local I/O,
    /// validation and transport failures never reached it.
    pub fn is_service_error(&self) -> bool {
        !matches!(
            self,
            StorageError::IoError { .. }
                | StorageError::ValidationError { .. }
                | StorageError::InfrastructureError { .. }
        )
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::BucketNotFound { bucket } => {
                write!(f, "Bucket not found: {}", bucket)
            }
            StorageError::BucketAlreadyExists { bucket } => {
                write!(f, "Bucket already exists: {}", bucket)
            }
            StorageError::BucketNotEmpty { bucket } => {
                write!(f, "Bucket is not empty: {}", bucket)
            }
            StorageError::ObjectNotFound { bucket, key } => {
                write!(f, "Object not found: {}/{}", bucket, key)
            }
            StorageError::NamespaceMismatch { expected, actual } => {
                write!(
                    f,
                    "Namespace mismatch: expected '{}', got '{}'",
                    expected, actual
                )
            }
            StorageError::ServiceError {
                status,
                code,
                message,
            } => {
                write!(f, "Service error {} ({}): {}", status, code, message)
            }
            StorageError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            StorageError::IoError { message } => {
                write!(f, "I/O error: {}", message)
            }
            StorageError::InfrastructureError { message, .. } => {
                write!(f, "Infrastructure error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket() -> BucketName {
        BucketName::new("demo".to_string()).unwrap()
    }

    #[test]
    fn test_service_errors() {
        assert!(StorageError::BucketNotEmpty { bucket: bucket() }.is_service_error());
        assert!(StorageError::ServiceError {
            status: 503,
            code: "ServiceUnavailable".to_string(),
            message: String::new(),
        }
        .is_service_error());
    }

    #[test]
    fn test_local_failures_are_not_service_errors() {
        let local = [
            StorageError::IoError {
                message: "disk full".to_string(),
            },
            StorageError::ValidationError {
                message: "bad name".to_string(),
            },
            StorageError::InfrastructureError {
                message: "connection refused".to_string(),
                source: None,
            },
        ];
        for err in local {
            assert!(!err.is_service_error(), "{err}");
        }
    }
}
