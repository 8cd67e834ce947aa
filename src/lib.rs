//! # readmill-rs
//!
//! A Rust client for the Readmill REST API.
//!
//! The crate builds authenticated requests, runs the OAuth2 flows that
//! produce access tokens, and unwraps the API's JSON conventions.
//!
//! ## Features
//!
//! - **Authentication**: authorization-code and password grants, per-request
//!   or client-wide tokens, `client_id` fallback for public endpoints
//! - **Requests**: `/v2` path namespacing, form-encoded parameters, a
//!   catalogue of named parameters with typed coercion
//! - **Responses**: unwrapping of `{"user": {...}}` and
//!   `{"items": [{"book": {...}}]}` shapes
//! - **Pluggable transport**: blocking `reqwest` by default, any
//!   [`Transport`] for tests or custom stacks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use readmill_rs::{Environment, ReadmillClient};
//!
//! fn main() -> readmill_rs::Result<()> {
//!     let mut client = ReadmillClient::new("client-id", "client-secret", Environment::PRODUCTION)
//!         .with_scope("non-expiring");
//!
//!     // Persist rotated tokens
//!     client.on_token_change(|token| {
//!         if let Some(token) = token {
//!             println!("new token scope: {:?}", token.scope());
//!         }
//!     });
//!
//!     let token = client.login("reader@example.com", "password")?;
//!     client.set_token(Some(token));
//!
//!     // Fetch the current user's readings
//!     let readings = client
//!         .get("/me/readings")
//!         .states("reading,finished")
//!         .count(20)
//!         .try_fetch_items_by("reading")?;
//!     println!("Found {} readings", readings.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Building Requests By Hand
//!
//! ```rust
//! use readmill_rs::{request, Verb};
//!
//! let request = request!("/users/{}/readings", 9001).with_param("count", 5);
//! assert_eq!(request.to_url(), "/v2/users/9001/readings?count=5");
//!
//! let message = request.build(Verb::Put)?;
//! assert_eq!(message.uri, "/v2/users/9001/readings");
//! assert_eq!(message.body.as_deref(), Some("count=5"));
//! # Ok::<(), readmill_rs::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod request;
pub mod testing;

// Re-export primary types at crate root for convenience
pub use auth::{Grant, Token};
pub use client::{ClientConfig, ReadmillClient, Response, Transport};
pub use error::{Error, Result};
pub use models::{Environment, Host, Scheme};
pub use request::{HttpRequest, Request, RequestBuilder, Verb};

/// Prelude module for convenient imports.
///
/// ```rust
/// use readmill_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{Grant, Token};
    pub use crate::client::{ClientConfig, JsonObject, ReadmillClient, Response, Transport};
    pub use crate::error::{Error, Result};
    pub use crate::models::{Environment, Host, Scheme};
    pub use crate::request;
    pub use crate::request::{HttpRequest, Request, RequestBuilder, TimeParam, Verb};
}
