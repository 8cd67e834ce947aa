//! HTTP client and transport layer for the Readmill API.
//!
//! This module provides the main entry point [`ReadmillClient`], the
//! [`Transport`] seam it sends through, and the [`Response`] type with the
//! JSON unwrapping helpers used by [`RequestBuilder`](crate::RequestBuilder).
//!
//! # Example
//!
//! ```no_run
//! use readmill_rs::{Environment, ReadmillClient, Token};
//!
//! # fn example() -> readmill_rs::Result<()> {
//! let client = ReadmillClient::new("client-id", "client-secret", Environment::PRODUCTION)
//!     .with_token(Token::non_expiring("access-token"));
//!
//! let books = client.get("/books").count(50).try_fetch_items_by("book")?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
mod response;
mod transport;

pub use config::ClientConfig;
pub use http::{ReadmillClient, TokenListener};
pub use response::{
    parse_object, unwrap_items, unwrap_items_by, unwrap_object, JsonObject, Response, ITEMS_KEY,
};
pub use transport::{ReqwestTransport, Transport};
