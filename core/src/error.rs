//! Error taxonomy for every operation.
//!
//! # Design
//! Every failure is an [`Error`]: the operation that failed plus an
//! [`ErrorKind`] saying which stage gave up. Validation failures never
//! reach the transport, transport failures never reach the decoder, and a
//! non-success status always becomes an [`ApiError`] problem detail, even
//! when the server answered with HTML or plain text.

use std::num::ParseIntError;

use serde::{Deserialize, Deserializer, Serialize};

use crate::endpoint::{Api, Operation};
use crate::validate::ValidationErrors;

/// A failed operation.
///
/// Displays as `<operation>: <kind>`, e.g.
/// `create enrollment: struct validation: contract_id: cannot be blank`.
#[derive(Debug, thiserror::Error)]
#[error("{operation}: {kind}")]
pub struct Error {
    pub operation: Operation,
    #[source]
    pub kind: ErrorKind,
}

impl Error {
    pub fn new(operation: Operation, kind: impl Into<ErrorKind>) -> Self {
        Self {
            operation,
            kind: kind.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation(_))
    }

    pub fn is_invalid_location(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidLocation(_))
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match &self.kind {
            ErrorKind::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// The problem detail returned by the API, if the call got that far.
    pub fn api_error(&self) -> Option<&ApiError> {
        match &self.kind {
            ErrorKind::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of a rejected call.
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|err| err.status_code)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("struct validation: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid location: {0}")]
    InvalidLocation(#[from] LocationError),
}

/// The round trip did not produce a usable response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("encoding request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("decoding response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("{0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    pub fn network(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TransportError::Network(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("parsing location {location:?}: {source}")]
    Url {
        location: String,
        source: url::ParseError,
    },
    #[error("location {0:?} has no id segment")]
    MissingId(String),
    #[error("location segment {segment:?} is not an id: {source}")]
    NotAnId {
        segment: String,
        source: ParseIntError,
    },
}

/// RFC 7807 style problem detail returned with every non-success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub error_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detail: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub instance: String,
    /// Always the HTTP status of the response, whatever the body claims.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status_code: u16,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub error_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detail: String,
}

/// Problem details may send `null` for any member; it reads as absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ApiError {
    /// Decodes a problem-detail body returned with `status`.
    ///
    /// Bodies that are not a JSON problem detail (HTML gateway pages, plain
    /// text, XML, nothing at all) are kept verbatim in `detail`.
    pub fn from_response(api: Api, status: u16, body: &str) -> Self {
        let mut err = match serde_json::from_str::<ApiError>(body) {
            Ok(err) => err,
            Err(parse_err) => {
                tracing::error!(%api, status, error = %parse_err, "could not unmarshal API error");
                ApiError {
                    title: format!(
                        "Failed to unmarshal error body. {api} API failed. Check details for more information."
                    ),
                    detail: body.to_string(),
                    ..ApiError::default()
                }
            }
        };
        err.status_code = status;
        err
    }
}

impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        if self.status_code != other.status_code {
            return false;
        }
        match (serde_json::to_string(self), serde_json::to_string(other)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => write!(f, "API error: \n{json}"),
            Err(err) => write!(f, "error marshaling API error: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}
