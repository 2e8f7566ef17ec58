mod checksum;
mod downloader;
mod resolver;

pub use checksum::{fetch_remote_checksum, has_verified_weights, sha256sum, CHECKSUM_MANIFEST};
pub use downloader::WeightsDownloader;
pub use resolver::resolve_model_dir;
