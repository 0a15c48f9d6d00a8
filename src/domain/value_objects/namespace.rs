use crate::domain::errors::ValidationError;

/// Tenancy-scoped identifier that qualifies bucket names
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    const MAX_LEN: usize = 128;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyNamespace);
        }

        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::NamespaceTooLong {
                actual: value.len(),
                max: Self::MAX_LEN,
            });
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
        {
            return Err(ValidationError::InvalidNamespaceCharacter(c));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the compartment that owns a bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct CompartmentId(String);

impl CompartmentId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ValidationError::EmptyCompartmentId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompartmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_validation() {
        assert!(Namespace::new("axaxnpcrorw5".to_string()).is_ok());
        assert!(Namespace::new("local".to_string()).is_ok());
        assert_eq!(
            Namespace::new(String::new()),
            Err(ValidationError::EmptyNamespace)
        );
        assert_eq!(
            Namespace::new("Tenancy".to_string()),
            Err(ValidationError::InvalidNamespaceCharacter('T'))
        );
        assert!(Namespace::new("x".repeat(129)).is_err());
    }

    #[test]
    fn test_compartment_id_is_trimmed() {
        let id = CompartmentId::new("  ocid1.tenancy.oc1..aaaa ".to_string()).unwrap();
        assert_eq!(id.as_str(), "ocid1.tenancy.oc1..aaaa");
        assert!(CompartmentId::new("   ".to_string()).is_err());
    }
}
