//! Model weights acquisition and configuration validation for vision
//! pipeline nodes.
//!
//! Two independent capabilities, consumed by node setup code rather than
//! inherited into it:
//!
//! - [`ConfigValidator`] checks node configuration values against declarative
//!   interval bounds (`"[0.0, 1.0)"` syntax) and choice sets.
//! - [`WeightsDownloader`] resolves the canonical weights directory for a
//!   model, verifies any existing copy against the store's checksum manifest
//!   and, only when needed, streams the weights archive down, extracts it and
//!   fetches the optional classes file.
//!
//! Setting `is_local_url` in the [`ModelConfig`] points the downloader at an
//! offline `file://` store, served through [`transport::LocalFileAdapter`]
//! with HTTP status semantics so both modes share one code path.

pub mod config;
pub mod errors;
pub mod transport;
pub mod weights;

pub use config::{ConfigValidator, Interval, ModelConfig, ModelTypeId};
pub use errors::{ConfigError, TransportError, WeightsError};
pub use weights::WeightsDownloader;
