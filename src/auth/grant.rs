//! OAuth2 grants accepted by the token endpoint.

use secrecy::{ExposeSecret, SecretString};

/// Path of the token endpoint on the web host.
pub const TOKEN_PATH: &str = "/oauth/token";

/// Path of the authorize page on the web host.
pub const AUTHORIZE_PATH: &str = "/oauth/authorize";

/// An exchange that yields a [`Token`](super::Token).
pub enum Grant {
    /// Trade an authorization code from the redirect for a token.
    AuthorizationCode {
        /// Code received on the redirect URI.
        code: String,
        /// Redirect URI registered for the client.
        redirect_uri: String,
    },
    /// Trade a user's own credentials for a token.
    Password {
        /// Username or email.
        username: String,
        /// Password.
        password: SecretString,
    },
}

impl Grant {
    /// The `grant_type` value sent to the endpoint.
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::AuthorizationCode { .. } => "authorization_code",
            Grant::Password { .. } => "password",
        }
    }

    /// Form parameters for this grant, in wire order.
    ///
    /// Client credentials come right after `grant_type`; `scope` is appended
    /// last when given.
    pub(crate) fn params(
        &self,
        client_id: &str,
        client_secret: &SecretString,
        scope: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("grant_type", self.grant_type().to_string()),
            ("client_id", client_id.to_string()),
            ("client_secret", client_secret.expose_secret().to_string()),
        ];

        match self {
            Grant::AuthorizationCode { code, redirect_uri } => {
                params.push(("code", code.clone()));
                params.push(("redirect_uri", redirect_uri.clone()));
            }
            Grant::Password { username, password } => {
                params.push(("username", username.clone()));
                params.push(("password", password.expose_secret().to_string()));
            }
        }

        if let Some(scope) = scope {
            params.push(("scope", scope.to_string()));
        }

        params
    }
}

impl std::fmt::Debug for Grant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grant::AuthorizationCode { redirect_uri, .. } => f
                .debug_struct("AuthorizationCode")
                .field("code", &"[REDACTED]")
                .field("redirect_uri", redirect_uri)
                .finish(),
            Grant::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}
