//! In-memory stand-in for the CPS and DataStream2 management APIs.
//!
//! Serves the subset of routes the client core's integration tests drive:
//! enrollment and change lifecycle for CPS, stream lifecycle for DataStream.
//! Request media types are checked literally, and errors are returned as
//! problem-detail bodies, so header and error decoding are exercised over
//! real HTTP.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    http::{header, HeaderMap},
    Router,
};
use serde::de::DeserializeOwned;
use tokio::{net::TcpListener, sync::RwLock};

pub mod cps;
pub mod datastream;
pub mod problem;

pub use problem::{Problem, ProblemItem};

/// Everything the server remembers between requests.
#[derive(Debug, Default)]
pub struct Store {
    last_id: i64,
    pub enrollments: BTreeMap<i64, cps::Enrollment>,
    pub streams: BTreeMap<i64, datastream::Stream>,
}

impl Store {
    /// Ids are shared across resources and never reused.
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .merge(cps::routes())
        .merge(datastream::routes())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn require_content_type(headers: &HeaderMap, expected: &str) -> Result<(), Problem> {
    let got = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    if got == Some(expected) {
        Ok(())
    } else {
        tracing::warn!(?got, expected, "rejecting request media type");
        Err(Problem::unsupported_media_type(got))
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, Problem> {
    serde_json::from_str(body).map_err(|err| Problem::bad_request(format!("malformed JSON body: {err}")))
}
