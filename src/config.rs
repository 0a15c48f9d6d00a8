//! Client configuration read from an INI profile file
//!
//! The file uses the layout of the Oracle Cloud CLI configuration: one
//! `[PROFILE]` section per identity with `key=value` pairs. Profile names and
//! keys are matched case-insensitively.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::{CompartmentId, Namespace};

/// Location of the configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "./config.local";

pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("Profile '{profile}' not found in {path}")]
    ProfileNotFound { profile: String, path: PathBuf },

    #[error("Missing required key '{key}' in profile '{profile}'")]
    MissingKey { key: &'static str, profile: String },

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Settings of one profile
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub profile: String,
    /// Tenancy OCID; also the root compartment that owns created buckets
    pub tenancy: CompartmentId,
    pub region: Option<String>,
    pub namespace: Option<Namespace>,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Root directory for the local filesystem backend
    pub storage_root: Option<PathBuf>,
    pub allow_http: bool,
}

impl ClientConfig {
    /// Load `profile` from the INI file at `path`
    pub fn from_file(path: &Path, profile: &str) -> Result<Self, ConfigError> {
        let load_err = |source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        };

        let settings = config::Config::builder()
            .add_source(
                config::File::new(&path.to_string_lossy(), config::FileFormat::Ini).required(true),
            )
            .build()
            .map_err(load_err)?;

        let sections: HashMap<String, config::Value> =
            settings.try_deserialize().map_err(load_err)?;

        let section = sections
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(profile))
            .map(|(_, value)| value)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                profile: profile.to_string(),
                path: path.to_path_buf(),
            })?;

        let mut entries = HashMap::new();
        for (key, value) in section.into_table().map_err(load_err)? {
            entries.insert(key.to_ascii_lowercase(), value.into_string().map_err(load_err)?);
        }

        Self::from_entries(profile, entries)
    }

    /// Build from already-parsed `key -> value` pairs with lowercase keys
    pub fn from_entries(
        profile: &str,
        mut entries: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut take = |key: &str| {
            entries
                .remove(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tenancy = take("tenancy").ok_or_else(|| ConfigError::MissingKey {
            key: "tenancy",
            profile: profile.to_string(),
        })?;
        let tenancy = CompartmentId::new(tenancy).map_err(|e| ConfigError::InvalidValue {
            key: "tenancy",
            message: e.to_string(),
        })?;

        let namespace = take("namespace")
            .map(Namespace::new)
            .transpose()
            .map_err(|e| ConfigError::InvalidValue {
                key: "namespace",
                message: e.to_string(),
            })?;

        let allow_http = match take("allow_http") {
            None => false,
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            Some(v) => {
                return Err(ConfigError::InvalidValue {
                    key: "allow_http",
                    message: format!("expected true or false, got '{}'", v),
                });
            }
        };

        Ok(Self {
            profile: profile.to_string(),
            tenancy,
            region: take("region"),
            namespace,
            endpoint: take("endpoint"),
            access_key_id: take("access_key_id"),
            secret_access_key: take("secret_access_key"),
            storage_root: take("storage_root").map(PathBuf::from),
            allow_http,
        })
    }

    /// Compartment that owns buckets created by this client. The root
    /// compartment is the tenancy itself.
    pub fn compartment_id(&self) -> &CompartmentId {
        &self.tenancy
    }

    /// Value of a required optional key, or a MissingKey error
    pub fn require<'a>(
        &self,
        key: &'static str,
        value: &'a Option<String>,
    ) -> Result<&'a str, ConfigError> {
        value.as_deref().ok_or_else(|| ConfigError::MissingKey {
            key,
            profile: self.profile.clone(),
        })
    }
}
