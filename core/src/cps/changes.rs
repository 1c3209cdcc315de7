use serde::{Deserialize, Serialize};

use super::{change_path, DeploymentSchedule, GetChangeRequest, CHANGE_ID};
use crate::endpoint::{MediaType, RequestSpec};
use crate::validate::wire_enum;

wire_enum! {
    /// Follow-up input a pending change can accept.
    pub enum AllowedInputType {
        ChangeManagementInfo => "change-management-info",
        LetsEncryptChallenges => "lets-encrypt-challenges",
        ThirdPartyCertificate => "third-party-certificate",
        ThirdPartyCsr => "third-party-csr",
        PreVerificationWarnings => "pre-verification-warnings",
        PostVerificationWarnings => "post-verification-warnings",
    }
}

/// State of a pending certificate change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Change {
    pub allowed_input: Vec<AllowedInput>,
    pub status_info: Option<StatusInfo>,
}

impl Change {
    /// The allowed input of `kind`, if the change currently accepts it.
    pub fn allowed_input(&self, kind: &AllowedInputType) -> Option<&AllowedInput> {
        self.allowed_input.iter().find(|input| &input.input_type == kind)
    }

    /// Whether the change is blocked until input of `kind` is provided.
    pub fn requires(&self, kind: &AllowedInputType) -> bool {
        self.allowed_input(kind)
            .is_some_and(|input| input.required_to_proceed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllowedInput {
    pub info: String,
    pub required_to_proceed: bool,
    #[serde(rename = "type")]
    pub input_type: AllowedInputType,
    pub update: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusInfo {
    pub deployment_schedule: Option<DeploymentSchedule>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StatusInfoError>,
    pub state: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusInfoError {
    pub code: String,
    pub description: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancelChangeResponse {
    pub change: String,
}

operation! {
    GetChangeStatus(GetChangeRequest) -> Change {
        operation: GetChangeStatus,
        success: &[200],
        request: |r| Ok(RequestSpec::get(change_path(r.enrollment_id, r.change_id))
            .accept(MediaType::cps("change", 2))),
    }
}

operation! {
    CancelChange(GetChangeRequest) -> CancelChangeResponse {
        operation: CancelChange,
        success: &[200],
        request: |r| Ok(RequestSpec::delete(change_path(r.enrollment_id, r.change_id)).accept(CHANGE_ID)),
    }
}
