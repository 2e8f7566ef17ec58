use std::fs::File;
use std::io;
use std::path::Path;

use url::Url;

use super::{Method, Transport, TransportResponse};
use crate::errors::TransportError;

/// Serves `file://` URLs with HTTP status semantics so the download and
/// verification paths work unchanged against an offline weights store.
///
/// Conditional requests (If-Modified-Since and friends) are not supported.
pub struct LocalFileAdapter;

impl LocalFileAdapter {
    /// HTTP status for `method` against a filesystem path.
    fn check_path(method: Method, path: &Path) -> (u16, &'static str) {
        match method {
            Method::Put | Method::Delete => return (501, "Not Implemented"),
            Method::Get | Method::Head => {}
            _ => return (405, "Method Not Allowed"),
        }
        if path.is_dir() {
            return (400, "Path Not A File");
        }
        if !path.is_file() {
            return (404, "File Not Found");
        }
        match File::open(path) {
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => (403, "Access Denied"),
            _ => (200, "OK"),
        }
    }
}

impl Transport for LocalFileAdapter {
    fn send(&self, method: Method, url: &Url) -> Result<TransportResponse, TransportError> {
        let path = url
            .to_file_path()
            .map_err(|_| TransportError::BadUrl(url.to_string()))?;

        let (status, reason) = Self::check_path(method, &path);
        let mut response = TransportResponse::new(status, reason, url.to_string());

        // HEAD gets the status only; GET streams the file's bytes.
        if status == 200 && method == Method::Get {
            match File::open(&path) {
                Ok(file) => response = response.with_body(Box::new(file)),
                Err(err) => {
                    response.status = 500;
                    response.reason = err.to_string();
                }
            }
        }

        Ok(response)
    }
}
