use serde::{Deserialize, Serialize};

use super::{stream_path, DetailedStreamVersion, StreamStatus};
use crate::endpoint::{Endpoint, Operation, RequestSpec};
use crate::error::TransportError;
use crate::validate::{required, Fields, ValidationErrors};

/// One activation or deactivation of a stream version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivationHistoryEntry {
    pub modified_by: String,
    pub modified_date: String,
    pub status: StreamStatus,
    pub stream_id: i64,
    pub stream_version: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivateStreamRequest {
    pub stream_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeactivateStreamRequest {
    pub stream_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetActivationHistoryRequest {
    pub stream_id: i64,
}

fn stream_only(stream_id: i64) -> Result<(), ValidationErrors> {
    Fields::new()
        .check("stream_id", required(&stream_id))
        .finish()
}

impl Endpoint for ActivateStreamRequest {
    type Response = DetailedStreamVersion;
    const OPERATION: Operation = Operation::ActivateStream;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        stream_only(self.stream_id)
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::post(format!("{}/activate", stream_path(self.stream_id))))
    }
}

impl Endpoint for DeactivateStreamRequest {
    type Response = DetailedStreamVersion;
    const OPERATION: Operation = Operation::DeactivateStream;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        stream_only(self.stream_id)
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::post(format!("{}/deactivate", stream_path(self.stream_id))))
    }
}

impl Endpoint for GetActivationHistoryRequest {
    type Response = Vec<ActivationHistoryEntry>;
    const OPERATION: Operation = Operation::GetActivationHistory;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        stream_only(self.stream_id)
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(format!(
            "{}/activation-history",
            stream_path(self.stream_id)
        )))
    }
}
