//! The Readmill API client.

use std::sync::{Arc, OnceLock};

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::config::ClientConfig;
use super::response::Response;
use super::transport::{ReqwestTransport, Transport};
use crate::auth::{Grant, Token, AUTHORIZE_PATH, TOKEN_PATH};
use crate::models::{Environment, Host};
use crate::request::{Request, RequestBuilder, Verb};
use crate::{Error, Result};

/// Callback invoked whenever the client's token changes.
pub type TokenListener = Box<dyn Fn(Option<&Token>) + Send + Sync>;

/// The main client for the Readmill API.
///
/// The client holds the application's credentials, the target
/// [`Environment`] and the current user [`Token`]. Every request it executes
/// is authorized with the strongest credential available:
///
/// 1. the request's own valid token, left untouched;
/// 2. otherwise the client's token, if it is valid;
/// 3. otherwise a `client_id` query parameter;
/// 4. otherwise nothing.
///
/// An invalidated client token is skipped, not attached.
///
/// Requests are blocking and issued exactly once; there are no retries.
/// The client is `Send + Sync`, but changing the token needs `&mut self`,
/// so shared clients have to be wrapped in a lock by the caller.
///
/// # Example
///
/// ```no_run
/// use readmill_rs::{Environment, ReadmillClient, Token};
///
/// # fn example() -> readmill_rs::Result<()> {
/// let mut client = ReadmillClient::new("client-id", "client-secret", Environment::PRODUCTION);
/// let token = client.login("reader@example.com", "secret")?;
/// client.set_token(Some(token));
///
/// let me = client.get("/me").try_fetch_key("user")?;
/// println!("Hello {}", me["username"]);
/// # Ok(())
/// # }
/// ```
pub struct ReadmillClient {
    client_id: String,
    client_secret: SecretString,
    environment: Environment,
    token: Option<Token>,
    redirect_uri: Option<String>,
    scope: Option<String>,
    config: ClientConfig,
    custom_transport: Option<Arc<dyn Transport>>,
    default_transport: OnceLock<Arc<dyn Transport>>,
    token_listener: Option<TokenListener>,
}

impl ReadmillClient {
    /// Create a client for an application.
    ///
    /// An empty `client_id` counts as "not configured" and is never sent.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            environment,
            token: None,
            redirect_uri: None,
            scope: None,
            config: ClientConfig::default(),
            custom_transport: None,
            default_transport: OnceLock::new(),
            token_listener: None,
        }
    }

    /// Use a custom configuration for the default transport.
    ///
    /// A default transport built earlier is discarded and rebuilt from this
    /// configuration on next use. Injected transports are not affected.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self.default_transport = OnceLock::new();
        self
    }

    /// Use a specific transport instead of the default `reqwest` one.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.custom_transport = Some(transport);
        self
    }

    /// Set the redirect URI registered for the application.
    ///
    /// The URI is sent exactly as given, since providers compare it with
    /// the registered value character by character.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UrlParse`] if `redirect_uri` is not an absolute URL.
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Result<Self> {
        self.set_redirect_uri(Some(redirect_uri.into()))?;
        Ok(self)
    }

    /// Set the OAuth scope to request.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Start with a token, without notifying any listener.
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// The application's client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The application's client secret.
    pub fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    /// The environment requests go to.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Point the client at another environment.
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    /// The current user token.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Replace the current token and notify the registered listener.
    pub fn set_token(&mut self, token: Option<Token>) {
        self.token = token;
        tracing::info!(has_token = self.token.is_some(), "token changed");
        if let Some(listener) = &self.token_listener {
            listener(self.token.as_ref());
        }
    }

    /// Register the callback run by [`set_token`](Self::set_token).
    ///
    /// Replaces any previously registered listener.
    pub fn on_token_change(&mut self, listener: impl Fn(Option<&Token>) + Send + Sync + 'static) {
        self.token_listener = Some(Box::new(listener));
    }

    /// The redirect URI, if one is set.
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// Set or clear the redirect URI registered for the application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UrlParse`] if `redirect_uri` is not an absolute URL.
    /// The previous value is kept in that case.
    pub fn set_redirect_uri(&mut self, redirect_uri: Option<String>) -> Result<()> {
        if let Some(uri) = &redirect_uri {
            Url::parse(uri)?;
        }
        self.redirect_uri = redirect_uri;
        Ok(())
    }

    /// The OAuth scope, if one is set.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Set the OAuth scope to request.
    pub fn set_scope(&mut self, scope: Option<String>) {
        self.scope = scope;
    }

    /// The transport, created on first use and reused afterwards.
    pub fn transport(&self) -> Result<&dyn Transport> {
        if let Some(transport) = &self.custom_transport {
            return Ok(transport.as_ref());
        }
        if let Some(transport) = self.default_transport.get() {
            return Ok(transport.as_ref());
        }
        let created: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&self.config)?);
        Ok(self.default_transport.get_or_init(|| created).as_ref())
    }

    /// Start a `GET` request.
    pub fn get(&self, resource: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Verb::Get, resource)
    }

    /// Start a `POST` request.
    pub fn post(&self, resource: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Verb::Post, resource)
    }

    /// Start a `PUT` request.
    pub fn put(&self, resource: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Verb::Put, resource)
    }

    /// Start a `DELETE` request.
    pub fn delete(&self, resource: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Verb::Delete, resource)
    }

    /// Execute a prepared request with `GET`.
    pub fn execute_get(&self, request: Request) -> Result<Response> {
        self.execute(request, Verb::Get)
    }

    /// Execute a prepared request with `POST`.
    pub fn execute_post(&self, request: Request) -> Result<Response> {
        self.execute(request, Verb::Post)
    }

    /// Execute a prepared request with `PUT`.
    pub fn execute_put(&self, request: Request) -> Result<Response> {
        self.execute(request, Verb::Put)
    }

    /// Execute a prepared request with `DELETE`.
    pub fn execute_delete(&self, request: Request) -> Result<Response> {
        self.execute(request, Verb::Delete)
    }

    /// Authorize `request`, resolve its host and send it.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request could not be sent. The
    /// response is returned whatever its status.
    pub fn execute(&self, request: Request, verb: Verb) -> Result<Response> {
        let request = self.authorize(request);
        self.dispatch(&request, verb)
    }

    /// URL of the page where a user authorizes this application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no redirect URI is set.
    pub fn authorization_url(&self) -> Result<Url> {
        let redirect_uri = self.require_redirect_uri()?;

        let mut url = Url::parse(&self.environment.web_base_url())?.join(AUTHORIZE_PATH)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", redirect_uri);
            if let Some(scope) = &self.scope {
                query.append_pair("scope", scope);
            }
        }

        Ok(url)
    }

    /// Exchange an authorization code for a token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] before sending anything when no redirect URI
    /// is set, an [`Error::Api`] when the endpoint rejects the code, and
    /// transport or parse errors as they occur.
    pub fn try_obtain_token(&self, code: &str) -> Result<Token> {
        let redirect_uri = self.require_redirect_uri()?;
        self.request_token(Grant::AuthorizationCode {
            code: code.to_string(),
            redirect_uri: redirect_uri.to_string(),
        })
    }

    /// Like [`try_obtain_token`](Self::try_obtain_token), but returns `None`
    /// on any failure.
    pub fn obtain_token(&self, code: &str) -> Option<Token> {
        self.try_obtain_token(code)
            .map_err(|err| tracing::warn!(error = %err, "authorization code exchange failed"))
            .ok()
    }

    /// Exchange a user's credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either credential is empty, and
    /// otherwise fails like [`try_obtain_token`](Self::try_obtain_token).
    pub fn login(&self, username: &str, password: &str) -> Result<Token> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput(
                "Username and password are required".to_string(),
            ));
        }
        self.request_token(Grant::Password {
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
        })
    }

    fn require_redirect_uri(&self) -> Result<&str> {
        self.redirect_uri
            .as_deref()
            .ok_or_else(|| Error::Config("Redirect URI is not set".to_string()))
    }

    /// POST a grant to the token endpoint.
    ///
    /// The grant carries the client credentials, so the request skips
    /// [`authorize`](Self::authorize).
    fn request_token(&self, grant: Grant) -> Result<Token> {
        let endpoint = format!("{}{}", self.environment.web_base_url(), TOKEN_PATH);
        let request = grant
            .params(&self.client_id, &self.client_secret, self.scope.as_deref())
            .into_iter()
            .fold(Request::to(endpoint), |request, (key, value)| {
                request.with_param(key, value)
            });

        tracing::debug!(grant_type = grant.grant_type(), "requesting token");
        let response = self.dispatch(&request, Verb::Post)?.error_for_status()?;
        Token::parse(&response.text()?)
    }

    /// Apply the authorization precedence to a request.
    pub(crate) fn authorize(&self, request: Request) -> Request {
        if request.has_valid_token() {
            tracing::debug!("authorizing with request token");
            return request;
        }

        if request.token().is_none() {
            if let Some(token) = self.token.as_ref().filter(|t| t.is_valid()) {
                tracing::debug!("authorizing with client token");
                return request.using_token(token.clone());
            }
        }

        if !self.client_id.is_empty() {
            tracing::debug!("authorizing with client id");
            return request.with_param("client_id", &self.client_id);
        }

        tracing::debug!("sending unauthenticated request");
        request
    }

    /// Resolve the target host and hand the built message to the transport.
    fn dispatch(&self, request: &Request, verb: Verb) -> Result<Response> {
        let target = self.resolve_target(request)?;
        let message = request.build(verb)?;

        tracing::debug!(verb = %verb, target = %target, uri = %message.uri, "executing request");
        let response = self.transport()?.execute(&target, &message)?;
        tracing::debug!(status = response.status(), "received response");

        Ok(response)
    }

    /// The host a request goes to: the API host for relative resources, the
    /// URL's own host for absolute ones.
    fn resolve_target(&self, request: &Request) -> Result<Host> {
        let base = Url::parse(&self.environment.api_base_url())?;
        let resolved = base.join(&request.to_url())?;
        Host::from_url(&resolved)
    }
}

impl std::fmt::Debug for ReadmillClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadmillClient")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("token", &self.token)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ReadmillClient {
        ReadmillClient::new(
            "my_client_id",
            "my_client_secret",
            Environment::new("api.example.com", "www.example.com", true),
        )
    }

    #[test]
    fn test_basic_getters() {
        let client = client();
        assert_eq!(client.client_id(), "my_client_id");
        assert_eq!(client.client_secret(), "my_client_secret");
        assert_eq!(client.environment().api_base_url(), "https://api.example.com");
        assert!(client.token().is_none());
    }

    #[test]
    fn test_authorize_precedence() {
        let client = client().with_token(Token::non_expiring("client_token"));

        let own = client.authorize(Request::to("/users/1").using_token(Token::non_expiring("own")));
        assert_eq!(own.token().and_then(Token::access_token), Some("own"));
        assert!(own.params().is_empty());

        let inherited = client.authorize(Request::to("/users/1"));
        assert_eq!(
            inherited.token().and_then(Token::access_token),
            Some("client_token")
        );
        assert!(inherited.params().is_empty());
    }

    #[test]
    fn test_authorize_falls_back_to_client_id() {
        let request = client().authorize(Request::to("/users/1"));
        assert!(request.token().is_none());
        assert_eq!(request.to_url(), "/v2/users/1?client_id=my_client_id");
    }

    #[test]
    fn test_authorize_keeps_invalid_request_token() {
        let mut stale = Token::non_expiring("stale");
        stale.invalidate();

        let client = client().with_token(Token::non_expiring("client_token"));
        let request = client.authorize(Request::to("/me").using_token(stale.clone()));

        assert_eq!(request.token(), Some(&stale));
        assert_eq!(request.to_url(), "/v2/me?client_id=my_client_id");
    }

    #[test]
    fn test_authorize_without_credentials() {
        let client = ReadmillClient::new("", "", Environment::PRODUCTION);
        let request = client.authorize(Request::to("/books"));
        assert_eq!(request.to_url(), "/v2/books");
        assert!(request.token().is_none());
    }

    #[test]
    fn test_resolve_target() {
        let client = client();
        let host = client.resolve_target(&Request::to("/users/1")).unwrap();
        assert_eq!(host.to_url(), "https://api.example.com");

        let host = client
            .resolve_target(&Request::to("http://www.example.com:8080/oauth/token"))
            .unwrap();
        assert_eq!(host.to_url(), "http://www.example.com:8080");
    }

    #[test]
    fn test_redirect_uri_validated_and_kept_verbatim() {
        let client = client().with_redirect_uri("http://wrappertest.com").unwrap();
        assert_eq!(client.redirect_uri(), Some("http://wrappertest.com"));

        let mut client = client;
        assert!(client
            .set_redirect_uri(Some("not a url".to_string()))
            .unwrap_err()
            .is_client_error());
        assert_eq!(client.redirect_uri(), Some("http://wrappertest.com"));

        client.set_redirect_uri(None).unwrap();
        assert!(client.redirect_uri().is_none());
    }

    #[test]
    fn test_with_config_resets_default_transport() {
        let client = client();
        client.transport().unwrap();
        assert!(client.default_transport.get().is_some());

        let client = client.with_config(ClientConfig::default());
        assert!(client.default_transport.get().is_none());
    }

    #[test]
    fn test_with_config_keeps_injected_transport() {
        let mock = Arc::new(crate::testing::MockTransport::new());
        let client = client()
            .with_transport(mock.clone())
            .with_config(ClientConfig::default());

        client.execute_get(Request::to("/me")).unwrap();
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug_str = format!("{:?}", client());
        assert!(debug_str.contains("my_client_id"));
        assert!(!debug_str.contains("my_client_secret"));
    }
}
