/// Validation errors for domain value objects
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // ObjectKey validation errors
    EmptyObjectKey,
    ObjectKeyTooLong {
        actual: usize,
        max: usize,
    },
    InvalidObjectKeyCharacter(char),
    ObjectKeyStartsWithSlash,
    ObjectKeyContainsDoubleSlash,
    ObjectKeyEndsWithSlash,
    ObjectKeyRelativeSegment(String),

    // BucketName validation errors
    EmptyBucketName,
    BucketNameTooLong {
        actual: usize,
        max: usize,
    },
    BucketNameInvalidCharacter(char),

    // Namespace validation errors
    EmptyNamespace,
    NamespaceTooLong {
        actual: usize,
        max: usize,
    },
    InvalidNamespaceCharacter(char),

    // Compartment validation errors
    EmptyCompartmentId,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ObjectKey errors
            ValidationError::EmptyObjectKey => write!(f, "Object name cannot be empty"),
            ValidationError::ObjectKeyTooLong { actual, max } => {
                write!(f, "Object name too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidObjectKeyCharacter(c) => {
                write!(f, "Invalid character in object name: {:?}", c)
            }
            ValidationError::ObjectKeyStartsWithSlash => {
                write!(f, "Object name cannot start with '/'")
            }
            ValidationError::ObjectKeyContainsDoubleSlash => {
                write!(f, "Object name cannot contain '//'")
            }
            ValidationError::ObjectKeyEndsWithSlash => {
                write!(f, "Object name cannot end with '/'")
            }
            ValidationError::ObjectKeyRelativeSegment(segment) => {
                write!(f, "Object name cannot contain a {:?} segment", segment)
            }

            // BucketName errors
            ValidationError::EmptyBucketName => write!(f, "Bucket name cannot be empty"),
            ValidationError::BucketNameTooLong { actual, max } => {
                write!(
                    f,
                    "Bucket name too long: {} characters (max: {})",
                    actual, max
                )
            }
            ValidationError::BucketNameInvalidCharacter(c) => {
                write!(
                    f,
                    "Invalid character in bucket name: {:?}. Only letters, numbers, dashes, underscores and periods allowed",
                    c
                )
            }

            // Namespace errors
            ValidationError::EmptyNamespace => write!(f, "Namespace cannot be empty"),
            ValidationError::NamespaceTooLong { actual, max } => {
                write!(
                    f,
                    "Namespace too long: {} characters (max: {})",
                    actual, max
                )
            }
            ValidationError::InvalidNamespaceCharacter(c) => {
                write!(f, "Invalid character in namespace: {:?}", c)
            }

            ValidationError::EmptyCompartmentId => write!(f, "Compartment id cannot be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}
