mod file_adapter;
mod http;

use std::io::{self, Read};

use url::Url;

use crate::errors::TransportError;

pub use file_adapter::LocalFileAdapter;
pub use http::HttpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// HTTP-style response shared by all transports. The body, when present,
/// streams lazily; dropping the response releases the underlying handle.
pub struct TransportResponse {
    pub status: u16,
    pub reason: String,
    pub url: String,
    body: Option<Box<dyn Read>>,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: u16, reason: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            url: url.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Box<dyn Read>) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Converts a non-2xx status into a `TransportError`, mirroring
    /// `error_for_status` on full HTTP clients.
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                status: self.status,
                reason: self.reason,
                url: self.url,
            })
        }
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("url", &self.url)
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

impl Read for TransportResponse {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.body.as_mut() {
            Some(body) => body.read(buf),
            None => Ok(0),
        }
    }
}

/// A transport resolves one request against its scheme's backing store.
/// Implementations hold no per-request state; closing is a no-op.
pub trait Transport {
    fn send(&self, method: Method, url: &Url) -> Result<TransportResponse, TransportError>;

    fn close(&self) {}
}

/// Base URL plus the transport able to serve it. Scoped to one logical
/// operation; callers build a fresh session per download rather than keeping
/// one around as process state.
pub struct Session {
    base_url: Url,
    transport: Box<dyn Transport>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Builds a session for `base_url`, picking the transport from the URL
    /// scheme so download and verification code never branches on it.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        // Url::join drops the last segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|_| TransportError::BadUrl(normalized.clone()))?;
        let transport: Box<dyn Transport> = match base_url.scheme() {
            "file" => Box::new(LocalFileAdapter),
            "http" | "https" => Box::new(HttpTransport::new()?),
            other => return Err(TransportError::UnsupportedScheme(other.to_string())),
        };
        Ok(Self {
            base_url,
            transport,
        })
    }

    pub fn get(&self, path: &str) -> Result<TransportResponse, TransportError> {
        self.request(Method::Get, path)
    }

    pub fn request(&self, method: Method, path: &str) -> Result<TransportResponse, TransportError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|_| TransportError::BadUrl(format!("{}{path}", self.base_url)))?;
        self.transport.send(method, &url)
    }
}
