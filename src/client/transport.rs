//! The transport seam between the client and the network.

use url::Url;

use super::config::ClientConfig;
use super::response::Response;
use crate::models::Host;
use crate::request::HttpRequest;
use crate::Result;

/// Executes one built request against a target host.
///
/// Implementations own connection handling, TLS, timeouts and cancellation.
/// The client calls `execute` exactly once per request and never retries.
pub trait Transport: Send + Sync {
    /// Send `request` to `target` and return the response.
    ///
    /// # Errors
    ///
    /// Returns a transport error when no response could be obtained.
    fn execute(&self, target: &Host, request: &HttpRequest) -> Result<Response>;
}

/// Blocking transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Build a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent);
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        Ok(Self {
            http: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, target: &Host, request: &HttpRequest) -> Result<Response> {
        let url = absolute_url(target, &request.uri);

        let mut builder = self
            .http
            .request(request.verb.method(), &url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes()?;

        Ok(Response::new(status, headers, body.to_vec()))
    }
}

/// Join a request target onto its host, unless it is already absolute.
pub(crate) fn absolute_url(target: &Host, uri: &str) -> String {
    if Url::parse(uri).is_ok() {
        uri.to_string()
    } else {
        format!("{}{}", target.to_url(), uri)
    }
}
