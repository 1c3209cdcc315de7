use serde::{Deserialize, Serialize};

use super::{change_path, enrollment_path, GetChangeRequest, CHANGE_ID};
use crate::endpoint::{Endpoint, MediaType, Operation, RequestSpec};
use crate::error::TransportError;
use crate::validate::{required, Fields, Validate, ValidationErrors};

const DEPLOYMENT: MediaType = MediaType::cps("deployment", 8);
const DEPLOYMENT_SCHEDULE: MediaType = MediaType::cps("deployment-schedule", 1);

/// Certificates and network settings deployed to one network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deployment {
    pub ocsp_stapled: Option<bool>,
    pub ocsp_uris: Option<Vec<String>>,
    pub network_configuration: DeploymentNetworkConfiguration,
    pub primary_certificate: DeploymentCertificate,
    pub multi_stacked_certificates: Vec<DeploymentCertificate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentCertificate {
    pub certificate: String,
    pub expiry: String,
    pub key_algorithm: String,
    pub signature_algorithm: String,
    pub trust_chain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentNetworkConfiguration {
    pub geography: String,
    pub must_have_ciphers: String,
    pub ocsp_stapling: String,
    pub preferred_ciphers: String,
    pub quic_enabled: bool,
    pub secure_network: String,
    pub sni_only: bool,
    pub disallowed_tls_versions: Option<Vec<String>>,
    pub dns_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListDeploymentsResponse {
    pub production: Option<Deployment>,
    pub staging: Option<Deployment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDeploymentsRequest {
    pub enrollment_id: i64,
}

impl Endpoint for ListDeploymentsRequest {
    type Response = ListDeploymentsResponse;
    const OPERATION: Operation = Operation::ListDeployments;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("enrollment_id", required(&self.enrollment_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(format!("{}/deployments", enrollment_path(self.enrollment_id)))
            .accept(MediaType::cps("deployments", 8)))
    }
}

/// Selects the enrollment whose production or staging deployment is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetDeploymentRequest {
    pub enrollment_id: i64,
}

impl Validate for GetDeploymentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("enrollment_id", required(&self.enrollment_id))
            .finish()
    }
}

fn network_path(r: &GetDeploymentRequest, network: &str) -> String {
    format!("{}/deployments/{network}", enrollment_path(r.enrollment_id))
}

operation! {
    GetProductionDeployment(GetDeploymentRequest) -> Deployment {
        operation: GetProductionDeployment,
        success: &[200],
        request: |r| Ok(RequestSpec::get(network_path(r, "production")).accept(DEPLOYMENT)),
    }
}

operation! {
    GetStagingDeployment(GetDeploymentRequest) -> Deployment {
        operation: GetStagingDeployment,
        success: &[200],
        request: |r| Ok(RequestSpec::get(network_path(r, "staging")).accept(DEPLOYMENT)),
    }
}

/// When a change may deploy. Both bounds are optional ISO 8601 timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,
}

fn schedule_path(enrollment_id: i64, change_id: i64) -> String {
    format!("{}/deployment-schedule", change_path(enrollment_id, change_id))
}

operation! {
    GetDeploymentSchedule(GetChangeRequest) -> DeploymentSchedule {
        operation: GetDeploymentSchedule,
        success: &[200],
        request: |r| Ok(RequestSpec::get(schedule_path(r.enrollment_id, r.change_id))
            .accept(DEPLOYMENT_SCHEDULE)),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDeploymentScheduleRequest {
    pub enrollment_id: i64,
    pub change_id: i64,
    pub deployment_schedule: DeploymentSchedule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateDeploymentScheduleResponse {
    pub change: String,
}

impl Endpoint for UpdateDeploymentScheduleRequest {
    type Response = UpdateDeploymentScheduleResponse;
    const OPERATION: Operation = Operation::UpdateDeploymentSchedule;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("enrollment_id", required(&self.enrollment_id))
            .check("change_id", required(&self.change_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        RequestSpec::put(schedule_path(self.enrollment_id, self.change_id))
            .accept(CHANGE_ID)
            .json(DEPLOYMENT_SCHEDULE.with_charset(), &self.deployment_schedule)
    }
}
