//! Deployment environments and the hosts they point at.
//!
//! An [`Environment`] pairs the REST API host with the web host that serves
//! the OAuth pages. Both share one [`Scheme`].

use std::borrow::Cow;
use std::fmt;

use url::Url;

/// URL scheme used by an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    /// Plain-text HTTP.
    Http,
    /// HTTP over TLS.
    #[default]
    Https,
}

impl Scheme {
    /// Pick the scheme from a TLS toggle.
    pub fn from_ssl(use_ssl: bool) -> Self {
        if use_ssl {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }

    /// The scheme name as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// The port used when none is given.
    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheme-qualified host, optionally with an explicit port.
///
/// A `None` port means "the default port for the scheme".
///
/// # Example
///
/// ```
/// use readmill_rs::models::{Host, Scheme};
///
/// let host = Host::new(Scheme::Https, "api.example.com", Some(8443));
/// assert_eq!(host.to_url(), "https://api.example.com:8443");
/// assert_eq!(host.effective_port(), 8443);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host {
    scheme: Scheme,
    name: Cow<'static, str>,
    port: Option<u16>,
}

impl Host {
    /// Create a host.
    pub fn new(scheme: Scheme, name: impl Into<Cow<'static, str>>, port: Option<u16>) -> Self {
        Self {
            scheme,
            name: name.into(),
            port,
        }
    }

    const fn preset(scheme: Scheme, name: &'static str) -> Self {
        Self {
            scheme,
            name: Cow::Borrowed(name),
            port: None,
        }
    }

    /// Extract the host part of an absolute URL.
    pub(crate) fn from_url(url: &Url) -> crate::Result<Self> {
        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(crate::Error::InvalidInput(format!(
                    "Unsupported URL scheme: {}",
                    other
                )))
            }
        };
        let name = url
            .host_str()
            .ok_or_else(|| crate::Error::InvalidInput(format!("URL has no host: {}", url)))?;

        Ok(Self::new(scheme, name.to_string(), url.port()))
    }

    /// The URL scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The host name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicit port, if one was configured.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The port a connection will actually use.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }

    /// Render as `scheme://name[:port]`.
    ///
    /// The port is only written when it differs from the scheme default.
    pub fn to_url(&self) -> String {
        match self.port {
            Some(port) if port != self.scheme.default_port() => {
                format!("{}://{}:{}", self.scheme, self.name, port)
            }
            _ => format!("{}://{}", self.scheme, self.name),
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// Environment configuration for the Readmill API.
///
/// Determines which API host requests go to and which web host serves the
/// OAuth authorize and token endpoints.
///
/// # Example
///
/// ```
/// use readmill_rs::Environment;
///
/// let env = Environment::new("some.api.host", "some.web.host", false);
/// assert_eq!(env.api_base_url(), "http://some.api.host");
///
/// let env = Environment::with_ports("some.api.host", None, "some.web.host", Some(8080), true);
/// assert_eq!(env.web_base_url(), "https://some.web.host:8080");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Environment {
    api: Host,
    web: Host,
}

impl Environment {
    /// Production deployment.
    pub const PRODUCTION: Environment = Environment {
        api: Host::preset(Scheme::Https, "api.readmill.com"),
        web: Host::preset(Scheme::Https, "m.readmill.com"),
    };

    /// Staging mirror. Served over plain HTTP.
    pub const STAGING: Environment = Environment {
        api: Host::preset(Scheme::Http, "api.stage-readmill.com"),
        web: Host::preset(Scheme::Http, "m.stage-readmill.com"),
    };

    /// Create an environment using the default ports of the scheme.
    pub fn new(
        api_host: impl Into<Cow<'static, str>>,
        web_host: impl Into<Cow<'static, str>>,
        use_ssl: bool,
    ) -> Self {
        Self::with_ports(api_host, None, web_host, None, use_ssl)
    }

    /// Create an environment with explicit ports.
    ///
    /// `None` selects the default port for the scheme.
    pub fn with_ports(
        api_host: impl Into<Cow<'static, str>>,
        api_port: Option<u16>,
        web_host: impl Into<Cow<'static, str>>,
        web_port: Option<u16>,
        use_ssl: bool,
    ) -> Self {
        let scheme = Scheme::from_ssl(use_ssl);
        Self {
            api: Host::new(scheme, api_host, api_port),
            web: Host::new(scheme, web_host, web_port),
        }
    }

    /// The host REST requests are sent to.
    pub fn api_host(&self) -> &Host {
        &self.api
    }

    /// The host serving the OAuth pages.
    pub fn web_host(&self) -> &Host {
        &self.web
    }

    /// Absolute base URL for REST API requests.
    pub fn api_base_url(&self) -> String {
        self.api.to_url()
    }

    /// Absolute base URL of the web/auth host.
    pub fn web_base_url(&self) -> String {
        self.web.to_url()
    }

    /// The scheme shared by both hosts.
    pub fn scheme(&self) -> Scheme {
        self.api.scheme
    }

    /// Returns `true` if requests go over TLS.
    pub fn is_secure(&self) -> bool {
        matches!(self.scheme(), Scheme::Https)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::PRODUCTION
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api={} web={}", self.api, self.web)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_names() {
        let env = Environment::new("some.api.host", "some.web.host", true);
        assert_eq!(env.api_host().name(), "some.api.host");
        assert_eq!(env.web_host().name(), "some.web.host");
    }

    #[test]
    fn test_scheme_toggle() {
        let env = Environment::new("some.api.host", "some.web.host", false);
        assert_eq!(env.api_host().scheme(), Scheme::Http);
        assert_eq!(env.web_host().scheme(), Scheme::Http);
        assert!(!env.is_secure());

        let env = Environment::new("some.api.host", "some.web.host", true);
        assert_eq!(env.api_host().scheme().as_str(), "https");
        assert_eq!(env.web_host().scheme().as_str(), "https");
        assert!(env.is_secure());
    }

    #[test]
    fn test_base_urls() {
        let env = Environment::new("some.api.host", "some.web.host", false);
        assert_eq!(env.api_base_url(), "http://some.api.host");
        assert_eq!(env.web_base_url(), "http://some.web.host");

        let env = Environment::with_ports("some.api.host", None, "some.web.host", Some(8080), true);
        assert_eq!(env.api_base_url(), "https://some.api.host");
        assert_eq!(env.web_base_url(), "https://some.web.host:8080");
    }

    #[test]
    fn test_explicit_default_port_is_not_rendered() {
        let host = Host::new(Scheme::Https, "api.example.com", Some(443));
        assert_eq!(host.to_url(), "https://api.example.com");
        assert_eq!(host.effective_port(), 443);
    }

    #[test]
    fn test_presets() {
        assert_eq!(
            Environment::PRODUCTION.api_base_url(),
            "https://api.readmill.com"
        );
        assert_eq!(
            Environment::PRODUCTION.web_base_url(),
            "https://m.readmill.com"
        );
        assert_eq!(
            Environment::STAGING.api_base_url(),
            "http://api.stage-readmill.com"
        );
        assert_eq!(Environment::default(), Environment::PRODUCTION);
    }

    #[test]
    fn test_host_from_url() {
        let url = Url::parse("http://localhost:3000/v2/users").unwrap();
        let host = Host::from_url(&url).unwrap();
        assert_eq!(host.scheme(), Scheme::Http);
        assert_eq!(host.name(), "localhost");
        assert_eq!(host.port(), Some(3000));

        let url = Url::parse("ftp://files.example.com/").unwrap();
        assert!(Host::from_url(&url).is_err());
    }
}
