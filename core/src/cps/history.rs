use serde::{Deserialize, Serialize};

use super::{enrollment_path, Challenge, ValidationRecord};
use crate::endpoint::{Endpoint, MediaType, Operation, RequestSpec};
use crate::error::TransportError;
use crate::validate::{required, Fields, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetDvHistoryRequest {
    pub enrollment_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetDvHistoryResponse {
    pub results: Vec<HistoryResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryResult {
    pub domain: String,
    pub domain_history: Vec<DomainHistory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainHistory {
    pub domain: String,
    pub challenges: Vec<Challenge>,
    pub error: Option<String>,
    pub expires: String,
    pub full_path: String,
    pub redirect_full_path: String,
    pub request_timestamp: String,
    pub response_body: String,
    pub status: String,
    pub token: String,
    pub validated_timestamp: String,
    pub validation_records: Vec<ValidationRecord>,
    pub validation_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetCertificateHistoryRequest {
    pub enrollment_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetCertificateHistoryResponse {
    pub certificates: Vec<HistoryCertificate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryCertificate {
    pub deployment_status: String,
    pub geography: String,
    pub multi_stacked_certificates: Vec<CertificateObject>,
    pub primary_certificate: CertificateObject,
    pub ra: String,
    pub slots: Vec<i64>,
    pub staging_status: String,
    #[serde(rename = "type")]
    pub certificate_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateObject {
    pub certificate: String,
    pub expiry: String,
    pub key_algorithm: String,
    pub trust_chain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetChangeHistoryRequest {
    pub enrollment_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetChangeHistoryResponse {
    pub changes: Vec<ChangeHistory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeHistory {
    pub action: String,
    pub action_description: String,
    pub business_case_id: Option<String>,
    pub created_by: String,
    pub created_on: String,
    pub last_updated: String,
    pub multi_stacked_certificates: Vec<CertificateChangeHistory>,
    pub primary_certificate: CertificateChangeHistory,
    pub primary_certificate_order_details: Option<CertificateOrderDetails>,
    pub ra: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateChangeHistory {
    pub certificate: String,
    pub trust_chain: Option<String>,
    pub csr: String,
    pub key_algorithm: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateOrderDetails {
    pub order_id: String,
}

fn enrollment_only(enrollment_id: i64) -> Result<(), ValidationErrors> {
    Fields::new()
        .check("enrollment_id", required(&enrollment_id))
        .finish()
}

impl Endpoint for GetDvHistoryRequest {
    type Response = GetDvHistoryResponse;
    const OPERATION: Operation = Operation::GetDvHistory;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        enrollment_only(self.enrollment_id)
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(format!("{}/dv-history", enrollment_path(self.enrollment_id)))
            .accept(MediaType::cps("dv-history", 1)))
    }
}

impl Endpoint for GetCertificateHistoryRequest {
    type Response = GetCertificateHistoryResponse;
    const OPERATION: Operation = Operation::GetCertificateHistory;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        enrollment_only(self.enrollment_id)
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(
            RequestSpec::get(format!("{}/history/certificates", enrollment_path(self.enrollment_id)))
                .accept(MediaType::cps("certificate-history", 2)),
        )
    }
}

impl Endpoint for GetChangeHistoryRequest {
    type Response = GetChangeHistoryResponse;
    const OPERATION: Operation = Operation::GetChangeHistory;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        enrollment_only(self.enrollment_id)
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(
            RequestSpec::get(format!("{}/history/changes", enrollment_path(self.enrollment_id)))
                .accept(MediaType::cps("change-history", 5)),
        )
    }
}
