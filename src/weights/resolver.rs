use std::path::PathBuf;

use crate::config::{ModelConfig, WEIGHTS_SUBDIR};
use crate::errors::WeightsError;

/// Canonical on-disk directory for the configured model, i.e.
/// `<parent>/peekingduck_weights/<model_subdir>/<model_format>/`.
///
/// With no `weights_parent_dir` configured the parent of the framework
/// install root is used. A configured parent must exist and be absolute.
/// Pure apart from those two checks; computed fresh on every call.
pub fn resolve_model_dir(config: &ModelConfig) -> Result<PathBuf, WeightsError> {
    let weights_parent_dir = match &config.weights_parent_dir {
        None => config
            .root
            .parent()
            .unwrap_or(config.root.as_path())
            .to_path_buf(),
        Some(dir) => {
            if !dir.exists() {
                return Err(WeightsError::ParentDirNotFound(dir.clone()));
            }
            if !dir.is_absolute() {
                return Err(WeightsError::ParentDirNotAbsolute(dir.clone()));
            }
            dir.clone()
        }
    };

    Ok(weights_parent_dir
        .join(WEIGHTS_SUBDIR)
        .join(config.model_subdir()?)
        .join(&config.model_format))
}
