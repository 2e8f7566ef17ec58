use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use zip::ZipArchive;

use crate::config::ModelConfig;
use crate::errors::WeightsError;
use crate::transport::Session;
use crate::weights::checksum::has_verified_weights;
use crate::weights::resolver::resolve_model_dir;

// Weights archives are large, so stream in sizable chunks.
const DOWNLOAD_CHUNK_SIZE: usize = 32768;

/// Fetches model weights for one node configuration: resolves the target
/// directory, skips the download when a verified copy is already on disk,
/// otherwise streams the archive from the configured store, extracts it in
/// place and fetches the optional classes file.
///
/// Synchronous and lock-free; callers are expected to request a given target
/// directory from at most one thread at a time.
pub struct WeightsDownloader {
    config: ModelConfig,
}

impl WeightsDownloader {
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// Returns the directory holding verified weights, downloading them
    /// first if absent or corrupted.
    pub fn download_weights(&self) -> Result<PathBuf, WeightsError> {
        self.download_weights_with_progress(|_| {})
    }

    /// Like [`download_weights`](Self::download_weights), reporting
    /// cumulative bytes per fetched file to `progress`.
    pub fn download_weights_with_progress<F>(&self, mut progress: F) -> Result<PathBuf, WeightsError>
    where
        F: FnMut(u64),
    {
        let model_dir = resolve_model_dir(&self.config)?;
        // One session serves both the checksum fetch and the archive fetch.
        let session = Session::new(self.config.resolved_base_url()?)?;

        if has_verified_weights(&model_dir, &self.config, &session)? {
            return Ok(model_dir);
        }

        info!("proceeding to download...");
        fs::create_dir_all(&model_dir)?;

        let blob_file = self.config.blob_filename()?.to_string();
        self.download_to(&session, &blob_file, &model_dir, &mut progress)?;
        self.extract_archive(&model_dir, &blob_file)?;

        if let Some(classes_file) = self.config.classes_filename()? {
            let classes_file = classes_file.to_string();
            self.download_to(&session, &classes_file, &model_dir, &mut progress)?;
        }

        info!("weights downloaded to {}", model_dir.display());
        Ok(model_dir)
    }

    fn download_to<F>(
        &self,
        session: &Session,
        filename: &str,
        destination_dir: &Path,
        progress: &mut F,
    ) -> Result<(), WeightsError>
    where
        F: FnMut(u64),
    {
        let store_path = format!(
            "{}/{}/{filename}",
            self.config.model_subdir()?,
            self.config.model_format
        );
        let mut response = session.get(&store_path)?.error_for_status()?;

        let mut outfile = File::create(destination_dir.join(filename))?;
        let mut buffer = vec![0u8; DOWNLOAD_CHUNK_SIZE];
        let mut downloaded = 0u64;
        loop {
            let read = response.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            outfile.write_all(&buffer[..read])?;
            downloaded += read as u64;
            progress(downloaded);
        }
        Ok(())
    }

    fn extract_archive(&self, destination_dir: &Path, blob_file: &str) -> Result<(), WeightsError> {
        let zip_path = destination_dir.join(blob_file);
        let mut archive = ZipArchive::new(File::open(&zip_path)?)?;
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let dest = destination_dir.join(entry.mangled_name());
            if entry.is_dir() {
                fs::create_dir_all(&dest)?;
            } else {
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mut outfile = File::create(&dest)?;
                io::copy(&mut entry, &mut outfile)?;
            }
        }

        // Only a fully extracted archive is removed; a failed extraction
        // leaves it in place for inspection.
        fs::remove_file(&zip_path)?;
        Ok(())
    }
}
