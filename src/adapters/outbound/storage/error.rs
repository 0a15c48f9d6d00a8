use crate::domain::{
    errors::{StorageError, ValidationError},
    value_objects::{BucketName, ObjectKey},
};
use std::io;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("Service error: {status} {code} - {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Convert into a domain error for an operation on `bucket`, and on `key`
    /// when the operation targets a single object
    pub fn into_storage_error(self, bucket: &BucketName, key: Option<&ObjectKey>) -> StorageError {
        match self {
            StoreError::ObjectStore(object_store::Error::NotFound { .. }) => match key {
                Some(key) => StorageError::ObjectNotFound {
                    bucket: bucket.clone(),
                    key: key.clone(),
                },
                None => StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                },
            },
            StoreError::Service { status, code, .. } if status == 404 && code == "NoSuchBucket" => {
                StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                }
            }
            StoreError::Service { status, code, .. }
                if status == 409
                    && (code == "BucketAlreadyExists" || code == "BucketAlreadyOwnedByYou") =>
            {
                StorageError::BucketAlreadyExists {
                    bucket: bucket.clone(),
                }
            }
            StoreError::Service { status, code, .. } if status == 409 && code == "BucketNotEmpty" => {
                StorageError::BucketNotEmpty {
                    bucket: bucket.clone(),
                }
            }
            other => other.into(),
        }
    }
}

/// Convert object_store errors to domain storage errors
impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotSupported { .. } | object_store::Error::NotImplemented => {
                StorageError::ServiceError {
                    status: 501,
                    code: "NotImplemented".to_string(),
                    message: err.to_string(),
                }
            }
            object_store::Error::PermissionDenied { .. } => StorageError::ServiceError {
                status: 403,
                code: "Forbidden".to_string(),
                message: err.to_string(),
            },
            object_store::Error::Unauthenticated { .. } => StorageError::ServiceError {
                status: 401,
                code: "NotAuthenticated".to_string(),
                message: err.to_string(),
            },
            object_store::Error::Precondition { .. } | object_store::Error::AlreadyExists { .. } => {
                StorageError::ServiceError {
                    status: 409,
                    code: "Conflict".to_string(),
                    message: err.to_string(),
                }
            }
            _ => StorageError::InfrastructureError {
                message: format!("Object store operation failed: {}", err),
                source: Some(err.to_string()),
            },
        }
    }
}

/// Convert infrastructure StoreError to domain StorageError
impl From<StoreError> for StorageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ObjectStore(object_err) => object_err.into(),
            StoreError::Io(io_err) => io_err.into(),
            StoreError::Transport(http_err) => StorageError::InfrastructureError {
                message: format!("Request failed: {}", http_err),
                source: Some(http_err.to_string()),
            },
            StoreError::Xml(xml_err) => StorageError::InfrastructureError {
                message: format!("Malformed service response: {}", xml_err),
                source: Some(xml_err.to_string()),
            },
            StoreError::Service {
                status,
                code,
                message,
            } => StorageError::ServiceError {
                status,
                code,
                message,
            },
            StoreError::Other(message) => StorageError::InfrastructureError {
                message,
                source: None,
            },
        }
    }
}

/// Convert standard io::Error to domain errors
impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<ValidationError> for StorageError {
    fn from(err: ValidationError) -> Self {
        StorageError::ValidationError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket() -> BucketName {
        BucketName::new("demo".to_string()).unwrap()
    }

    fn service(status: u16, code: &str) -> StoreError {
        StoreError::Service {
            status,
            code: code.to_string(),
            message: "from service".to_string(),
        }
    }

    #[test]
    fn test_not_found_maps_to_object_or_bucket() {
        let key = ObjectKey::new("obj".to_string()).unwrap();
        let not_found = || {
            StoreError::ObjectStore(object_store::Error::NotFound {
                path: "obj".to_string(),
                source: "missing".into(),
            })
        };

        assert_eq!(
            not_found().into_storage_error(&bucket(), Some(&key)),
            StorageError::ObjectNotFound {
                bucket: bucket(),
                key
            }
        );
        assert_eq!(
            not_found().into_storage_error(&bucket(), None),
            StorageError::BucketNotFound { bucket: bucket() }
        );
    }

    #[test]
    fn test_service_codes_map_to_bucket_errors() {
        assert_eq!(
            service(409, "BucketNotEmpty").into_storage_error(&bucket(), None),
            StorageError::BucketNotEmpty { bucket: bucket() }
        );
        assert_eq!(
            service(409, "BucketAlreadyOwnedByYou").into_storage_error(&bucket(), None),
            StorageError::BucketAlreadyExists { bucket: bucket() }
        );
        assert_eq!(
            service(404, "NoSuchBucket").into_storage_error(&bucket(), None),
            StorageError::BucketNotFound { bucket: bucket() }
        );

        let other = service(500, "InternalError").into_storage_error(&bucket(), None);
        assert_eq!(other.status(), 500);
    }

    #[test]
    fn test_io_error_is_not_a_service_error() {
        let err: StorageError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(!err.is_service_error());
    }
}
