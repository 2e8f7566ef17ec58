use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::errors::ConfigError;

/// Canonical remote store for published model weights.
pub const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com/peekingduck/models";

/// Directory created under the weights parent to hold all model families.
pub const WEIGHTS_SUBDIR: &str = "peekingduck_weights";

/// Named or numbered variant within a model family, e.g. "small" or 0.
///
/// The checksum manifest keys variants by their string form, so integer ids
/// are rendered without any decoration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ModelTypeId {
    Size(i64),
    Name(String),
}

impl fmt::Display for ModelTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTypeId::Size(size) => write!(f, "{size}"),
            ModelTypeId::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Per-format weights entry: archive and model filenames keyed by model type,
/// plus the remote namespace of the model family.
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsSpec {
    pub model_subdir: String,
    pub blob_file: BTreeMap<String, String>,
    pub model_file: BTreeMap<String, String>,
    #[serde(default)]
    pub classes_file: Option<String>,
}

/// Configuration surface consumed by the downloader and resolver. Supplied by
/// the owning pipeline node; this crate never mutates it.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Framework install root; its parent is the default weights parent.
    pub root: PathBuf,
    pub model_format: String,
    pub model_type: ModelTypeId,
    #[serde(default)]
    pub weights_parent_dir: Option<PathBuf>,
    #[serde(default)]
    pub is_local_url: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// file:// URI of an offline weights store, used when `is_local_url`.
    #[serde(default)]
    pub local_base_url: Option<String>,
    pub weights: BTreeMap<String, WeightsSpec>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ModelConfig {
    /// Weights entry for the selected `model_format`.
    pub fn weights_spec(&self) -> Result<&WeightsSpec, ConfigError> {
        self.weights
            .get(&self.model_format)
            .ok_or_else(|| ConfigError::MissingFormat(self.model_format.clone()))
    }

    /// Name of the selected archive on the weights store.
    pub fn blob_filename(&self) -> Result<&str, ConfigError> {
        let spec = self.weights_spec()?;
        spec.blob_file
            .get(&self.model_type.to_string())
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingModelType {
                kind: "blob_file",
                model_type: self.model_type.to_string(),
            })
    }

    /// Name of the selected weights file once extracted on disk.
    pub fn model_filename(&self) -> Result<&str, ConfigError> {
        let spec = self.weights_spec()?;
        spec.model_file
            .get(&self.model_type.to_string())
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingModelType {
                kind: "model_file",
                model_type: self.model_type.to_string(),
            })
    }

    /// Name of the classes IDs/labels file, if the model ships one.
    pub fn classes_filename(&self) -> Result<Option<&str>, ConfigError> {
        Ok(self.weights_spec()?.classes_file.as_deref())
    }

    pub fn model_subdir(&self) -> Result<&str, ConfigError> {
        Ok(self.weights_spec()?.model_subdir.as_str())
    }

    /// Base URL the session should target, honouring the local-store flag.
    pub fn resolved_base_url(&self) -> Result<&str, ConfigError> {
        if self.is_local_url {
            self.local_base_url
                .as_deref()
                .ok_or(ConfigError::MissingLocalUrl)
        } else {
            Ok(self.base_url.as_str())
        }
    }
}
