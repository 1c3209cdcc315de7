//! Canned-response transport shared by the unit tests.

use std::cell::RefCell;

use url::Url;

use crate::client::Client;
use crate::config::Config;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Replays one canned response and records what was sent.
pub(crate) struct Recorder {
    pub(crate) response: HttpResponse,
    pub(crate) sent: RefCell<Vec<HttpRequest>>,
}

impl crate::client::Transport for Recorder {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        Ok(self.response.clone())
    }
}

pub(crate) fn client(status: u16, body: &str) -> Client<Recorder> {
    let config = Config::new(Url::parse("https://akab-host.luna.akamaiapis.net").unwrap());
    Client::new(
        config,
        Recorder {
            response: HttpResponse::new(status, body),
            sent: RefCell::new(Vec::new()),
        },
    )
}

pub(crate) fn sent(client: &Client<Recorder>) -> Vec<HttpRequest> {
    client.transport().sent.borrow().clone()
}

pub(crate) const INTERNAL_ERROR: &str = r#"{
    "type": "internal_error",
    "title": "Internal Server Error",
    "detail": "Error making request",
    "status": 500
}"#;
