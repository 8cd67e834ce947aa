//! Responses and the JSON unwrapping conventions of the API.
//!
//! Single resources come back wrapped in their type name
//! (`{"user": {...}}`); collections come back as
//! `{"items": [{"book": {...}}, {"book": {...}}]}`.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A JSON object.
pub type JsonObject = Map<String, Value>;

/// Key holding the elements of a collection response.
pub const ITEMS_KEY: &str = "items";

/// A response as returned by a [`Transport`](super::Transport).
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// Create a response.
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.clone())
            .map_err(|e| Error::UnexpectedResponse(format!("Body is not UTF-8: {}", e)))
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-2xx response into [`Error::Api`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let body: Value = serde_json::from_slice(&self.body).unwrap_or_default();
        Err(Error::from_api_response(self.status, body))
    }
}

/// Parse text that must hold a JSON object.
pub fn parse_object(text: &str) -> Result<JsonObject> {
    match serde_json::from_str(text)? {
        Value::Object(object) => Ok(object),
        other => Err(Error::UnexpectedResponse(format!(
            "Expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Take the object stored under `key`.
pub fn unwrap_object(mut object: JsonObject, key: &str) -> Result<JsonObject> {
    match object.remove(key) {
        Some(Value::Object(inner)) => Ok(inner),
        Some(other) => Err(Error::UnexpectedResponse(format!(
            "Expected `{}` to be an object, got {}",
            key,
            json_kind(&other)
        ))),
        None => Err(Error::UnexpectedResponse(format!("Missing key `{}`", key))),
    }
}

/// Take the `items` array of a collection response.
pub fn unwrap_items(mut object: JsonObject) -> Result<Vec<Value>> {
    match object.remove(ITEMS_KEY) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(Error::UnexpectedResponse(format!(
            "Expected `{}` to be an array, got {}",
            ITEMS_KEY,
            json_kind(&other)
        ))),
        None => Err(Error::UnexpectedResponse(format!("Missing key `{}`", ITEMS_KEY))),
    }
}

/// Unwrap every collection element by the shared wrapper `key`.
///
/// All elements must be objects wrapped by `key`; the first one that is not
/// fails the whole call.
pub fn unwrap_items_by(items: Vec<Value>, key: &str) -> Result<Vec<Value>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(object) => unwrap_object(object, key)
                .map(Value::Object)
                .map_err(|_| {
                    Error::UnexpectedResponse(format!("Item {} is not wrapped by `{}`", index, key))
                }),
            other => Err(Error::UnexpectedResponse(format!(
                "Item {} is {}, not an object",
                index,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(object) => object,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_unwrap_items_by() {
        let fetched = object(json!({"items": [{"book": {"id": 1}}, {"book": {"id": 2}}]}));
        let items = unwrap_items(fetched).unwrap();
        let books = unwrap_items_by(items, "book").unwrap();
        assert_eq!(books, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn test_unwrap_items_by_heterogeneous_keys() {
        let items = vec![json!({"book": {"id": 1}}), json!({"reading": {"id": 1}})];
        let err = unwrap_items_by(items, "book").unwrap_err();
        assert!(err.to_string().contains("Item 1"));
    }

    #[test]
    fn test_unwrap_items_missing_or_wrong_type() {
        assert!(unwrap_items(object(json!({"users": []}))).is_err());
        assert!(unwrap_items(object(json!({"items": {}}))).is_err());
        assert!(unwrap_items(object(json!({"items": []}))).unwrap().is_empty());
    }

    #[test]
    fn test_parse_object() {
        assert!(parse_object(r#"{"a": 1}"#).is_ok());
        assert!(matches!(parse_object("[1, 2]"), Err(Error::UnexpectedResponse(_))));
        assert!(matches!(parse_object("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_response_accessors() {
        let response = Response::new(402, HeaderMap::new(), "hello");
        assert_eq!(response.status(), 402);
        assert!(!response.is_success());
        assert_eq!(response.text().unwrap(), "hello");
    }

    #[test]
    fn test_error_for_status() {
        let ok = Response::new(200, HeaderMap::new(), "{}");
        assert!(ok.error_for_status().is_ok());

        let failed = Response::new(401, HeaderMap::new(), r#"{"error": "invalid_grant"}"#);
        match failed.error_for_status() {
            Err(Error::Api { status, message, .. }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid_grant");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_response_json() {
        #[derive(serde::Deserialize)]
        struct User {
            id: u64,
        }

        let response = Response::new(200, HeaderMap::new(), r#"{"id": 9001}"#);
        let user: User = response.json().unwrap();
        assert_eq!(user.id, 9001);
    }
}
