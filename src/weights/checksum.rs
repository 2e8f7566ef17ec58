use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::errors::WeightsError;
use crate::transport::Session;

/// Manifest filename on the weights store.
pub const CHECKSUM_MANIFEST: &str = "weights_checksums.json";

// SHA-256 block size (64 bytes) x 1024, matching the reference digests.
const HASH_CHUNK_SIZE: usize = 64 * 1024;

// macOS droppings that must not influence a directory digest.
const IGNORED_ENTRIES: [&str; 2] = [".DS_Store", "__MACOSX"];

/// `model_subdir -> model_format -> model_type -> hex digest`.
type ChecksumManifest = HashMap<String, HashMap<String, HashMap<String, String>>>;

/// SHA-256 hex digest of a file, or of a directory tree hashed recursively
/// in lexicographic name order with one accumulator threaded through the
/// whole walk. The single accumulator is what makes a directory digest
/// comparable against the published manifest.
pub fn sha256sum(path: &Path) -> Result<String, WeightsError> {
    let mut hasher = Sha256::new();
    hash_tree(path, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn hash_tree(path: &Path, hasher: &mut Sha256) -> Result<(), WeightsError> {
    if path.is_dir() {
        let mut entries: Vec<_> = fs::read_dir(path)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<_, _>>()?;
        entries.sort();
        for entry in entries {
            let skip = entry
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| IGNORED_ENTRIES.contains(&name));
            if !skip {
                hash_tree(&entry, hasher)?;
            }
        }
    } else {
        let mut reader = BufReader::new(File::open(path)?);
        let mut buffer = [0u8; HASH_CHUNK_SIZE];
        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
    }
    Ok(())
}

/// Fetches the checksum manifest from the session's store and returns the
/// digest recorded for the configured model. Every missing level of the
/// manifest is a lookup error; nothing is defaulted.
pub fn fetch_remote_checksum(
    config: &ModelConfig,
    session: &Session,
) -> Result<String, WeightsError> {
    let response = session.get(CHECKSUM_MANIFEST)?.error_for_status()?;
    let manifest: ChecksumManifest = serde_json::from_reader(response)?;

    let subdir = config.model_subdir()?;
    let model_type = config.model_type.to_string();
    debug!("weights checksums for {subdir}: {:?}", manifest.get(subdir));

    manifest
        .get(subdir)
        .and_then(|formats| formats.get(&config.model_format))
        .and_then(|types| types.get(&model_type))
        .cloned()
        .ok_or_else(|| WeightsError::ManifestLookup {
            subdir: subdir.to_string(),
            format: config.model_format.clone(),
            model_type,
        })
}

/// Whether `model_dir` already holds the expected weights file with a digest
/// matching the manifest. Absence and mismatch both log a warning and return
/// false so the caller re-downloads; the stale copy is never deleted here.
pub fn has_verified_weights(
    model_dir: &Path,
    config: &ModelConfig,
    session: &Session,
) -> Result<bool, WeightsError> {
    let weights_path = model_dir.join(config.model_filename()?);
    if !weights_path.exists() {
        warn!("no weights detected at {}", weights_path.display());
        return Ok(false);
    }

    let expected = fetch_remote_checksum(config, session)?;
    if sha256sum(&weights_path)? != expected {
        warn!(
            "weights file is corrupted or out-of-date: {}",
            weights_path.display()
        );
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_file_hashes_identically_until_modified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.bin");
        fs::write(&path, b"0123456789").unwrap();

        let first = sha256sum(&path).unwrap();
        let second = sha256sum(&path).unwrap();
        assert_eq!(first, second);

        fs::write(&path, b"0123456780").unwrap();
        assert_ne!(sha256sum(&path).unwrap(), first);
    }

    #[test]
    fn directory_digest_is_independent_of_creation_order() {
        let first = tempfile::tempdir().unwrap();
        fs::write(first.path().join("b.txt"), b"bravo").unwrap();
        fs::write(first.path().join("a.txt"), b"alpha").unwrap();

        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("a.txt"), b"alpha").unwrap();
        fs::write(second.path().join("b.txt"), b"bravo").unwrap();

        assert_eq!(
            sha256sum(first.path()).unwrap(),
            sha256sum(second.path()).unwrap()
        );
    }

    #[test]
    fn macos_droppings_are_excluded() {
        let clean = tempfile::tempdir().unwrap();
        fs::write(clean.path().join("a.txt"), b"alpha").unwrap();

        let dirty = tempfile::tempdir().unwrap();
        fs::write(dirty.path().join("a.txt"), b"alpha").unwrap();
        fs::write(dirty.path().join(".DS_Store"), b"junk").unwrap();
        fs::create_dir(dirty.path().join("__MACOSX")).unwrap();
        fs::write(dirty.path().join("__MACOSX").join("x"), b"junk").unwrap();

        assert_eq!(
            sha256sum(clean.path()).unwrap(),
            sha256sum(dirty.path()).unwrap()
        );
    }

    #[test]
    fn directory_digest_threads_one_accumulator() {
        // The tree digest must equal one running hash fed each file's bytes
        // in name order, not a hash of per-file hashes.
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), b"first").unwrap();
        fs::write(dir.path().join("b.bin"), b"second").unwrap();

        let mut hasher = Sha256::new();
        hasher.update(b"first");
        hasher.update(b"second");
        let expected = format!("{:x}", hasher.finalize());

        assert_eq!(sha256sum(dir.path()).unwrap(), expected);
    }

    #[test]
    fn nested_directories_are_walked_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("inner.bin"), b"inner").unwrap();
        fs::write(dir.path().join("top.bin"), b"top").unwrap();

        let mut hasher = Sha256::new();
        // "sub" sorts before "top.bin"
        hasher.update(b"inner");
        hasher.update(b"top");
        let expected = format!("{:x}", hasher.finalize());

        assert_eq!(sha256sum(dir.path()).unwrap(), expected);
    }
}
