//! Tokens and OAuth2 grants for the Readmill API.
//!
//! Requests are authorized with an OAuth [`Token`] in an
//! `Authorization: OAuth <access token>` header. Tokens are obtained from
//! the web host's token endpoint with one of two [`Grant`]s:
//!
//! 1. **Authorization code** - the user approves the client on the
//!    authorize page and is redirected back with a code.
//! 2. **Password** - the client sends the user's own credentials.
//!
//! ```no_run
//! use readmill_rs::{Environment, ReadmillClient};
//!
//! # fn example() -> readmill_rs::Result<()> {
//! let client = ReadmillClient::new("client-id", "client-secret", Environment::PRODUCTION)
//!     .with_redirect_uri("myapp://callback")?;
//!
//! // Send the user here, then exchange the code from the redirect.
//! let url = client.authorization_url()?;
//! # let code = "";
//! let token = client.try_obtain_token(code)?;
//! # Ok(())
//! # }
//! ```

mod grant;
mod token;

pub use grant::{Grant, AUTHORIZE_PATH, TOKEN_PATH};
pub use token::{Token, NON_EXPIRING_SCOPE};
