//! Fluent request builder bound to a client.

use std::fmt;

use serde_json::Value;

use super::{Request, Verb};
use crate::client::{self, JsonObject, ReadmillClient, Response};
use crate::Result;

/// Fluent builder for one request, executed through the [`ReadmillClient`]
/// that created it.
///
/// Named parameter methods (`title`, `count`, `reading_private`, ...) each
/// append one wire key; see [`PARAM_CATALOGUE`](super::PARAM_CATALOGUE).
///
/// Terminal methods come in pairs. The `try_` variant surfaces every
/// failure; the plain variant logs it and returns an empty value instead.
///
/// # Example
///
/// ```no_run
/// # fn example(client: readmill_rs::ReadmillClient) -> readmill_rs::Result<()> {
/// let readings = client
///     .get("/users/1/readings")
///     .order("popular")
///     .highlights_count_from(5)
///     .try_fetch_items_by("reading")?;
///
/// client
///     .put("/readings/42")
///     .reading_private(true)
///     .try_send()?;
/// # Ok(())
/// # }
/// ```
pub struct RequestBuilder<'a> {
    client: &'a ReadmillClient,
    request: Request,
    verb: Verb,
}

impl<'a> RequestBuilder<'a> {
    pub(crate) fn new(client: &'a ReadmillClient, verb: Verb, resource: impl Into<String>) -> Self {
        Self {
            client,
            request: Request::to(resource),
            verb,
        }
    }

    /// The request built so far.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The verb this builder sends with.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Append a parameter that has no named method.
    pub fn param(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.request = self.request.with_param(key, value);
        self
    }

    /// Execute the request and return the raw response.
    pub fn send_request(self) -> Result<Response> {
        self.client.execute(self.request, self.verb)
    }

    /// Execute the request and return the response body as text.
    pub fn response_text(self) -> Result<String> {
        self.send_request()?.text()
    }

    /// Execute the request and parse the body as a JSON object.
    pub fn try_fetch(self) -> Result<JsonObject> {
        let text = self.response_text()?;
        client::parse_object(&text)
    }

    /// Like [`try_fetch`](Self::try_fetch), but returns an empty object on
    /// any failure.
    pub fn fetch(self) -> JsonObject {
        or_empty(self.try_fetch(), "fetch")
    }

    /// Execute the request and unwrap the top-level object under `key`.
    pub fn try_fetch_key(self, key: &str) -> Result<JsonObject> {
        let fetched = self.try_fetch()?;
        client::unwrap_object(fetched, key)
    }

    /// Like [`try_fetch_key`](Self::try_fetch_key), but returns an empty
    /// object on any failure.
    pub fn fetch_key(self, key: &str) -> JsonObject {
        or_empty(self.try_fetch_key(key), "fetch_key")
    }

    /// Execute the request and unwrap the `items` array of a collection
    /// response.
    pub fn try_fetch_items(self) -> Result<Vec<Value>> {
        let fetched = self.try_fetch()?;
        client::unwrap_items(fetched)
    }

    /// Like [`try_fetch_items`](Self::try_fetch_items), but returns an empty
    /// list on any failure.
    pub fn fetch_items(self) -> Vec<Value> {
        or_empty(self.try_fetch_items(), "fetch_items")
    }

    /// Execute the request, unwrap `items`, then unwrap every element by
    /// `key`.
    ///
    /// Fails if any element is not wrapped by `key`, which includes
    /// collections mixing different wrapper keys.
    pub fn try_fetch_items_by(self, key: &str) -> Result<Vec<Value>> {
        let items = self.try_fetch_items()?;
        client::unwrap_items_by(items, key)
    }

    /// Like [`try_fetch_items_by`](Self::try_fetch_items_by), but returns an
    /// empty list on any failure.
    pub fn fetch_items_by(self, key: &str) -> Vec<Value> {
        or_empty(self.try_fetch_items_by(key), "fetch_items_by")
    }

    /// Execute the request, requiring a JSON object back, and discard it.
    pub fn try_send(self) -> Result<()> {
        self.try_fetch().map(drop)
    }

    /// Execute the request and ignore the outcome.
    pub fn send(self) {
        self.fetch();
    }
}

impl fmt::Debug for RequestBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("verb", &self.verb)
            .field("request", &self.request)
            .finish()
    }
}

fn or_empty<T: Default>(result: Result<T>, operation: &str) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(operation, error = %err, "request failed, returning empty result");
        T::default()
    })
}
