use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while validating node configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("badly formatted interval: {0:?}")]
    BadIntervalFormat(String),

    #[error("lower bound {lower} cannot be larger than upper bound {upper}")]
    InvertedBounds { lower: f64, upper: f64 },

    #[error("{key} must be {expected}")]
    OutOfBounds { key: String, expected: String },

    #[error("all elements of {key} must be {expected}")]
    ElementsOutOfBounds { key: String, expected: String },

    #[error("`key` must be a single config key")]
    WrongKeyType,

    #[error("{key} must be one of {choices:?}")]
    InvalidChoice { key: String, choices: Vec<String> },

    #[error("missing config key: {0}")]
    MissingKey(String),

    #[error("config value for {0} is not numeric")]
    NotNumeric(String),

    #[error("no weights entry for model format: {0}")]
    MissingFormat(String),

    #[error("no {kind} entry for model type: {model_type}")]
    MissingModelType { kind: &'static str, model_type: String },

    #[error("is_local_url is set but no local_base_url is configured")]
    MissingLocalUrl,
}

/// Failures raised by the transport layer before or instead of a 200 body.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{url} returned {status} {reason}")]
    Status {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("invalid url: {0}")]
    BadUrl(String),

    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failures raised while resolving, verifying or downloading model weights.
#[derive(Error, Debug)]
pub enum WeightsError {
    #[error("weights_parent_dir does not exist: {0}")]
    ParentDirNotFound(PathBuf),

    #[error("weights_parent_dir must be an absolute path: {0}")]
    ParentDirNotAbsolute(PathBuf),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("no checksum entry for {subdir}/{format}/{model_type}")]
    ManifestLookup {
        subdir: String,
        format: String,
        model_type: String,
    },

    #[error("failed to parse checksum manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("failed to extract weights archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
