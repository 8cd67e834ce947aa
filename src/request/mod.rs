//! Construction of individual API requests.
//!
//! A [`Request`] collects a resource path, form parameters and an optional
//! [`Token`]. It renders itself as a URL ([`Request::to_url`]) or as a
//! verb-specific [`HttpRequest`] ready for a transport ([`Request::build`]).
//!
//! ```
//! use readmill_rs::{request, Request, Token, Verb};
//!
//! let reading = Request::to("/readings")
//!     .with_param("reading[private]", true)
//!     .using_token(Token::non_expiring("my-access-token"));
//! let message = reading.build(Verb::Post)?;
//! assert_eq!(message.uri, "/v2/readings");
//! assert_eq!(message.header("Authorization"), Some("OAuth my-access-token"));
//!
//! let users = request!("/users/{}/{}", 9001, "readings");
//! assert_eq!(users.to_url(), "/v2/users/9001/readings");
//! # Ok::<(), readmill_rs::Error>(())
//! ```

mod builder;
mod params;

pub use builder::RequestBuilder;
pub use params::{TimeParam, PARAM_CATALOGUE};

use std::fmt;
use std::hash::{Hash, Hasher};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use url::{form_urlencoded, Url};

use crate::auth::Token;
use crate::{Error, Result};

/// Version segment every relative resource path lives under.
pub const API_VERSION_PREFIX: &str = "/v2";

/// Content type of encoded parameter bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Build a [`Request`] from a format string.
///
/// `request!("/users/{}/{}", 9001, "readings")` is
/// `Request::to(format!("/users/{}/{}", 9001, "readings"))`.
#[macro_export]
macro_rules! request {
    ($fmt:literal, $($arg:tt)+) => {
        $crate::Request::to(format!($fmt, $($arg)+))
    };
    ($resource:expr $(,)?) => {
        $crate::Request::to($resource)
    };
}

/// HTTP verbs understood by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Verb {
    /// Returns `true` if requests with this verb carry their parameters as
    /// a body rather than in the query string.
    pub fn encloses_body(&self) -> bool {
        matches!(self, Verb::Post | Verb::Put)
    }

    /// The verb as a `reqwest` method.
    pub fn method(&self) -> reqwest::Method {
        match self {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Put => reqwest::Method::PUT,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }

    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built HTTP message, handed to a [`Transport`](crate::client::Transport).
///
/// `uri` is the request target: a path (plus query for non-enclosing verbs)
/// relative to the target host, or an absolute URL for absolute resources.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP verb
    pub verb: Verb,
    /// Request target
    pub uri: String,
    /// Headers to send
    pub headers: HeaderMap,
    /// Form-encoded body, for enclosing verbs with parameters
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A single API request under construction.
///
/// Parameters are append-only and keep their insertion order; the same key
/// may appear more than once. Two requests are equal when their
/// [`to_url`](Self::to_url) renderings are.
#[derive(Debug, Clone, Default)]
pub struct Request {
    resource: Option<String>,
    params: Vec<(String, String)>,
    token: Option<Token>,
}

impl Request {
    /// Create a request to a resource.
    ///
    /// Relative resources are placed under [`API_VERSION_PREFIX`]; absolute
    /// URLs are used as they are. Use the [`request!`](crate::request!)
    /// macro to format the resource from arguments.
    pub fn to(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Default::default()
        }
    }

    /// Append key/value pairs given as a flat list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `args` has an odd length. No
    /// parameter is added in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use readmill_rs::Request;
    ///
    /// let request = Request::to("/readings")
    ///     .with_params(&[&"reading[progress]", &14.5, &"private", &false])?;
    /// assert_eq!(request.to_url(), "/v2/readings?reading%5Bprogress%5D=14.5&private=false");
    ///
    /// assert!(Request::to("/users").with_params(&[&"user_name"]).is_err());
    /// # Ok::<(), readmill_rs::Error>(())
    /// ```
    pub fn with_params(mut self, args: &[&dyn fmt::Display]) -> Result<Self> {
        if args.len() % 2 != 0 {
            return Err(Error::InvalidInput(format!(
                "Parameters must come in key/value pairs, got {} arguments",
                args.len()
            )));
        }

        self.params.extend(
            args.chunks_exact(2)
                .map(|pair| (pair[0].to_string(), pair[1].to_string())),
        );
        Ok(self)
    }

    /// Append a single parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Authorize this request with its own token.
    ///
    /// A request token always wins over the client's token.
    pub fn using_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// The token attached to this request, if any.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// The parameters in insertion order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The normalized resource path, or `None` for a resource-less request.
    pub fn resource(&self) -> Option<String> {
        self.resource.as_deref().map(normalize_resource)
    }

    /// Parameters in `application/x-www-form-urlencoded` form.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    /// The resource path followed by `?` and the query string when there
    /// are parameters.
    pub fn to_url(&self) -> String {
        let resource = self.resource().unwrap_or_default();
        if self.params.is_empty() {
            resource
        } else {
            format!("{}?{}", resource, self.query_string())
        }
    }

    /// Render the request as an HTTP message for `verb`.
    ///
    /// Enclosing verbs (`POST`, `PUT`) target the bare resource and carry the
    /// parameters as a form body, with a `Content-Type` header only when
    /// there are parameters. Other verbs target [`to_url`](Self::to_url)
    /// and have no body. A valid token adds `Authorization: OAuth <token>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the access token cannot be used as
    /// a header value.
    pub fn build(&self, verb: Verb) -> Result<HttpRequest> {
        let mut headers = HeaderMap::new();

        let (uri, body) = if verb.encloses_body() {
            let body = if self.params.is_empty() {
                None
            } else {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
                Some(self.query_string())
            };
            (self.resource().unwrap_or_default(), body)
        } else {
            (self.to_url(), None)
        };

        if let Some(access_token) = self.authorization_token() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("OAuth {}", access_token))
                    .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?,
            );
        }

        Ok(HttpRequest {
            verb,
            uri,
            headers,
            body,
        })
    }

    /// Returns `true` if this request carries a token usable for the
    /// `Authorization` header.
    pub(crate) fn has_valid_token(&self) -> bool {
        self.token.as_ref().is_some_and(Token::is_valid)
    }

    fn authorization_token(&self) -> Option<&str> {
        self.token
            .as_ref()
            .filter(|t| t.is_valid())
            .and_then(Token::access_token)
    }
}

impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.to_url() == other.to_url()
    }
}

impl Eq for Request {}

impl Hash for Request {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_url().hash(state);
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resource {
            Some(_) => f.write_str(&self.to_url()),
            None => f.write_str(&self.query_string()),
        }
    }
}

/// Prefix relative resources with the API version, with exactly one `/`
/// between the two. Absolute URLs pass through.
fn normalize_resource(resource: &str) -> String {
    if Url::parse(resource).is_ok() {
        return resource.to_string();
    }

    if resource.starts_with('/') {
        format!("{}{}", API_VERSION_PREFIX, resource)
    } else {
        format!("{}/{}", API_VERSION_PREFIX, resource)
    }
}
