//! Test doubles for code built on this crate.
//!
//! [`MockTransport`] answers every request with a canned response (or a
//! simulated transport failure) and records what it was sent.
//!
//! ```
//! use readmill_rs::testing::mock_client;
//!
//! let (client, mock) = mock_client();
//! mock.respond_with_text(r#"{ "unicorn": 42 }"#);
//!
//! let response = client.get("/irrelevant/endpoint").fetch();
//! assert_eq!(response["unicorn"], 42);
//! assert_eq!(mock.last_request().unwrap().uri, "/v2/irrelevant/endpoint?client_id=mocked-client-id");
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::header::HeaderMap;

use crate::client::{ReadmillClient, Response, Transport};
use crate::models::{Environment, Host};
use crate::request::HttpRequest;
use crate::{Error, Result};

/// Client id used by [`mock_client`].
pub const MOCK_CLIENT_ID: &str = "mocked-client-id";

/// Client secret used by [`mock_client`].
pub const MOCK_CLIENT_SECRET: &str = "mocked-client-secret";

/// A [`Transport`] that never touches the network.
///
/// Starts out answering `200 OK` with an empty body.
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

#[derive(Debug)]
struct MockState {
    status: u16,
    body: String,
    fail: bool,
    sent: Vec<(Host, HttpRequest)>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            status: 200,
            body: String::new(),
            fail: false,
            sent: Vec::new(),
        }
    }
}

impl MockTransport {
    /// Create a mock answering `200 OK` with an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer with `200 OK` and `text` as the body.
    pub fn respond_with_text(&self, text: impl Into<String>) {
        self.respond_with_status_and_text(200, text);
    }

    /// Answer with the given status and body.
    pub fn respond_with_status_and_text(&self, status: u16, text: impl Into<String>) {
        let mut state = self.state();
        state.status = status;
        state.body = text.into();
        state.fail = false;
    }

    /// Fail every request with a transport error.
    pub fn respond_with_transport_error(&self) {
        self.state().fail = true;
    }

    /// The last request handed to the transport.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state().sent.last().map(|(_, request)| request.clone())
    }

    /// The host the last request was sent to.
    pub fn last_target(&self) -> Option<Host> {
        self.state().sent.last().map(|(target, _)| target.clone())
    }

    /// Every request handed to the transport, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state()
            .sent
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MockTransport {
    fn execute(&self, target: &Host, request: &HttpRequest) -> Result<Response> {
        let mut state = self.state();
        state.sent.push((target.clone(), request.clone()));

        if state.fail {
            return Err(Error::Transport("simulated connection failure".to_string()));
        }
        Ok(Response::new(state.status, HeaderMap::new(), state.body.clone()))
    }
}

/// A client wired to a fresh [`MockTransport`].
///
/// Uses [`MOCK_CLIENT_ID`], [`MOCK_CLIENT_SECRET`] and plain-HTTP hosts
/// `api.example.com` / `web.example.com`.
pub fn mock_client() -> (ReadmillClient, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let client = ReadmillClient::new(
        MOCK_CLIENT_ID,
        MOCK_CLIENT_SECRET,
        Environment::new("api.example.com", "web.example.com", false),
    )
    .with_transport(mock.clone());
    (client, mock)
}
