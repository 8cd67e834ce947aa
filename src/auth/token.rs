//! OAuth access tokens.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use crate::Result;

/// Scope marker carried by tokens that never expire.
pub const NON_EXPIRING_SCOPE: &str = "non-expiring";

/// An OAuth token: access and refresh credentials plus their scope.
///
/// A token is *valid* when both the access and the refresh token are
/// present. The refresh token may be an empty string and still count as
/// present. Expiry is never consulted: a token whose `expires_in` has long
/// passed is still reported as valid.
///
/// Equality compares the access token, refresh token and scope only;
/// `expires_in` is not part of it.
///
/// # Example
///
/// ```
/// use readmill_rs::Token;
///
/// let token = Token::parse(r#"{
///     "access_token": "04u7h-4cc355-70k3n",
///     "refresh_token": "04u7h-r3fr35h-70k3n",
///     "scope": "non-expiring",
///     "expires_in": 3600
/// }"#)?;
///
/// assert!(token.is_valid());
/// assert_eq!(token.access_token(), Some("04u7h-4cc355-70k3n"));
/// # Ok::<(), readmill_rs::Error>(())
/// ```
#[derive(Clone)]
pub struct Token {
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    scope: Option<String>,
    expires_in: i64,
}

impl Token {
    /// Create a token from an access token, refresh token and scope.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::from_parts(
            Some(access_token.into()),
            Some(refresh_token.into()),
            Some(scope.into()),
        )
    }

    /// Create a non-expiring token from a bare access token.
    ///
    /// Such tokens have an empty refresh token and the
    /// [`NON_EXPIRING_SCOPE`] scope.
    pub fn non_expiring(access_token: impl Into<String>) -> Self {
        Self::new(access_token, "", NON_EXPIRING_SCOPE)
    }

    /// Create a token where any of the parts may be missing.
    pub fn from_parts(
        access_token: Option<String>,
        refresh_token: Option<String>,
        scope: Option<String>,
    ) -> Self {
        Self {
            access_token: access_token.map(SecretString::from),
            refresh_token: refresh_token.map(SecretString::from),
            scope,
            expires_in: 0,
        }
    }

    /// Parse a token from a token endpoint JSON object.
    ///
    /// `access_token`, `scope` and `expires_in` are required; a missing
    /// `refresh_token` becomes an empty one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] when a required field is absent or has
    /// the wrong type.
    pub fn from_json(json: &Value) -> Result<Self> {
        let response = TokenResponse::deserialize(json)?;
        Ok(response.into())
    }

    /// Parse a token from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        let response: TokenResponse = serde_json::from_str(text)?;
        Ok(response.into())
    }

    /// Serialize back into the token endpoint JSON shape.
    ///
    /// An invalidated access token is written as `null`; a missing refresh
    /// token is left out.
    pub fn to_json(&self) -> Value {
        let mut json = serde_json::json!({
            "access_token": self.access_token(),
            "scope": self.scope(),
            "expires_in": self.expires_in,
        });
        if let Some(refresh) = self.refresh_token() {
            json["refresh_token"] = Value::String(refresh.to_string());
        }
        json
    }

    /// The access token, or `None` once invalidated.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(|t| t.expose_secret())
    }

    /// The refresh token.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|t| t.expose_secret())
    }

    /// The scope the token was granted for.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Lifetime in seconds, as reported when the token was issued.
    ///
    /// Tokens built by hand report `0`.
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Returns `true` if both access and refresh tokens are present.
    pub fn is_valid(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }

    /// Drop the access token. The refresh token and scope are kept.
    pub fn invalidate(&mut self) {
        self.access_token = None;
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.access_token() == other.access_token()
            && self.refresh_token() == other.refresh_token()
            && self.scope == other.scope
    }
}

impl Eq for Token {}

/// A token equals a string when its access token does.
impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.access_token() == Some(other)
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.access_token() == Some(*other)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |t: &Option<SecretString>| t.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Token")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    scope: String,
    expires_in: i64,
}

impl From<TokenResponse> for Token {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: Some(SecretString::from(response.access_token)),
            refresh_token: Some(SecretString::from(
                response.refresh_token.unwrap_or_default(),
            )),
            scope: Some(response.scope),
            expires_in: response.expires_in,
        }
    }
}
