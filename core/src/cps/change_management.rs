use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::{
    change_path, AcknowledgementRequest, Deployment, DnsNameSettings, GetChangeRequest,
    ACKNOWLEDGEMENT,
};
use crate::endpoint::{MediaType, RequestSpec};

const CHANGE_MANAGEMENT_INFO: &str = "change-management-info";

/// Pending certificates and network settings awaiting acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeManagementInfo {
    pub acknowledgement_deadline: Option<String>,
    pub validation_result_hash: String,
    pub pending_state: PendingState,
    pub validation_result: Option<ValidationResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PendingState {
    pub pending_certificates: Vec<PendingCertificate>,
    pub pending_network_configuration: PendingNetworkConfiguration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PendingCertificate {
    pub certificate_type: String,
    pub full_certificate: String,
    pub ocsp_stapled: String,
    pub ocsp_uris: Option<Vec<String>>,
    pub signature_algorithm: String,
    pub key_algorithm: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PendingNetworkConfiguration {
    pub dns_name_settings: Option<DnsNameSettings>,
    pub must_have_ciphers: String,
    pub network_type: Option<String>,
    pub ocsp_stapling: String,
    pub preferred_ciphers: String,
    pub quic_enabled: String,
    pub sni_only: String,
    pub disallowed_tls_versions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationResult {
    pub errors: Option<Vec<ValidationMessage>>,
    pub warnings: Option<Vec<ValidationMessage>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationMessage {
    pub message: String,
    pub message_code: String,
}

fn info_path(r: &GetChangeRequest) -> String {
    format!(
        "{}/input/info/{CHANGE_MANAGEMENT_INFO}",
        change_path(r.enrollment_id, r.change_id)
    )
}

operation! {
    GetChangeManagementInfo(GetChangeRequest) -> ChangeManagementInfo {
        operation: GetChangeManagementInfo,
        success: &[200],
        request: |r| Ok(RequestSpec::get(info_path(r))
            .accept(MediaType::cps("change-management-info", 5))),
    }
}

operation! {
    /// The same resource as `GetChangeManagementInfo`, negotiated as the
    /// deployment currently on staging.
    GetChangeDeploymentInfo(GetChangeRequest) -> Deployment {
        operation: GetChangeDeploymentInfo,
        success: &[200],
        request: |r| Ok(RequestSpec::get(info_path(r)).accept(MediaType::cps("deployment", 8))),
    }
}

operation! {
    AcknowledgeChangeManagement(AcknowledgementRequest) -> IgnoredAny {
        operation: AcknowledgeChangeManagement,
        success: &[200],
        request: |r| r.post("change-management-ack", ACKNOWLEDGEMENT.with_charset()),
    }
}
