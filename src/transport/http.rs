use reqwest::blocking::Client;
use url::Url;

use super::{Method, Transport, TransportResponse};
use crate::errors::TransportError;

/// Plain blocking HTTP transport for the remote weights store.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, method: Method, url: &Url) -> Result<TransportResponse, TransportError> {
        let http_method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let response = self.client.request(http_method, url.clone()).send()?;
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("").to_string();

        let transport_response = TransportResponse::new(status.as_u16(), reason, url.to_string());
        if method == Method::Head {
            return Ok(transport_response);
        }
        Ok(transport_response.with_body(Box::new(response)))
    }
}
