use serde::{Deserialize, Serialize};

use super::enrollment_path;
use crate::endpoint::{Endpoint, MediaType, Operation, RequestSpec};
use crate::error::{ErrorKind, TransportError};
use crate::location::id_from_location;
use crate::validate::{known, required, wire_enum, Blank, Fields, Validate, ValidationErrors};

const ENROLLMENT: MediaType = MediaType::cps("enrollment", 9);
const ENROLLMENTS: MediaType = MediaType::cps("enrollments", 9);
const ENROLLMENT_STATUS: MediaType = MediaType::cps("enrollment-status", 1);

wire_enum! {
    pub enum OcspStapling {
        On => "on",
        Off => "off",
        NotSet => "not-set",
    }
}

/// A certificate enrollment. Sent as the body of create and update, and
/// returned by get and list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub admin_contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_renewal_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_chain_type: Option<String>,
    #[serde(default)]
    pub certificate_type: String,
    #[serde(default)]
    pub change_management: bool,
    pub csr: Option<Csr>,
    #[serde(default)]
    pub enable_multi_stacked_certificates: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_allowed_san_names: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_allowed_wildcard_san_names: Option<u32>,
    pub network_configuration: Option<NetworkConfiguration>,
    pub org: Option<Org>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_changes: Vec<String>,
    #[serde(default)]
    pub ra: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<String>,
    pub tech_contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_party: Option<ThirdParty>,
    #[serde(default)]
    pub validation_type: String,
}

impl Validate for Enrollment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("admin_contact", required(&self.admin_contact))
            .check("certificate_type", required(&self.certificate_type))
            .check("csr", required(&self.csr))
            .nested("csr", self.csr.validate())
            .check("network_configuration", required(&self.network_configuration))
            .nested("network_configuration", self.network_configuration.validate())
            .check("org", required(&self.org))
            .check("ra", required(&self.ra))
            .check("tech_contact", required(&self.tech_contact))
            .check("validation_type", required(&self.validation_type))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_one: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_two: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Subject fields of the certificate signing request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Csr {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
    pub cn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sans: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub st: Option<String>,
}

impl Validate for Csr {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new().check("cn", required(&self.cn)).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_mutual_authentication: Option<ClientMutualAuthentication>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disallowed_tls_versions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name_settings: Option<DnsNameSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_have_ciphers: Option<String>,
    #[serde(skip_serializing_if = "Blank::is_blank")]
    pub ocsp_stapling: OcspStapling,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_ciphers: Option<String>,
    pub quic_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_network: Option<String>,
    pub sni_only: bool,
}

impl Validate for NetworkConfiguration {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("ocsp_stapling", known(&self.ocsp_stapling))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientMutualAuthentication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_options: Option<AuthenticationOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthenticationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocsp: Option<Ocsp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_ca_list_to_client: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ocsp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsNameSettings {
    #[serde(rename = "cloneDnsNames")]
    pub clone_dns_names: bool,
    #[serde(rename = "dnsNames", skip_serializing_if = "Option::is_none")]
    pub dns_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Org {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_one: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_two: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThirdParty {
    pub exclude_sans: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEnrollmentsRequest {
    pub contract_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListEnrollmentsResponse {
    pub enrollments: Vec<Enrollment>,
}

impl Endpoint for ListEnrollmentsRequest {
    type Response = ListEnrollmentsResponse;
    const OPERATION: Operation = Operation::ListEnrollments;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("contract_id", required(&self.contract_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get("/cps/v2/enrollments")
            .query("contractId", &self.contract_id)
            .accept(ENROLLMENTS))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetEnrollmentRequest {
    pub enrollment_id: i64,
}

impl Endpoint for GetEnrollmentRequest {
    type Response = Enrollment;
    const OPERATION: Operation = Operation::GetEnrollment;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("enrollment_id", required(&self.enrollment_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(enrollment_path(self.enrollment_id)).accept(ENROLLMENT))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateEnrollmentRequest {
    pub enrollment: Enrollment,
    pub contract_id: String,
    pub deploy_not_after: Option<String>,
    pub deploy_not_before: Option<String>,
    pub allow_duplicate_cn: bool,
}

/// Links returned once CPS accepts an enrollment. `id` is parsed from the
/// `enrollment` link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateEnrollmentResponse {
    #[serde(skip)]
    pub id: i64,
    pub enrollment: String,
    pub changes: Vec<String>,
}

pub type UpdateEnrollmentResponse = CreateEnrollmentResponse;

fn with_location_id(response: CreateEnrollmentResponse) -> Result<CreateEnrollmentResponse, ErrorKind> {
    let id = id_from_location(&response.enrollment)?;
    Ok(CreateEnrollmentResponse { id, ..response })
}

impl Endpoint for CreateEnrollmentRequest {
    type Response = CreateEnrollmentResponse;
    const OPERATION: Operation = Operation::CreateEnrollment;
    const SUCCESS: &'static [u16] = &[202];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .nested("enrollment", self.enrollment.validate())
            .check("contract_id", required(&self.contract_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        RequestSpec::post("/cps/v2/enrollments")
            .query("contractId", &self.contract_id)
            .query_opt("deploy-not-after", self.deploy_not_after.as_ref())
            .query_opt("deploy-not-before", self.deploy_not_before.as_ref())
            .query_flag("allow-duplicate-cn", self.allow_duplicate_cn)
            .accept(ENROLLMENT_STATUS)
            .json(ENROLLMENT, &self.enrollment)
    }

    fn finish(&self, response: Self::Response) -> Result<Self::Response, ErrorKind> {
        with_location_id(response)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateEnrollmentRequest {
    pub enrollment: Enrollment,
    pub enrollment_id: i64,
    pub allow_cancel_pending_changes: Option<bool>,
    pub allow_staging_bypass: Option<bool>,
    pub deploy_not_after: Option<String>,
    pub deploy_not_before: Option<String>,
    pub force_renewal: Option<bool>,
    pub renewal_date_check_override: Option<bool>,
}

impl Endpoint for UpdateEnrollmentRequest {
    type Response = UpdateEnrollmentResponse;
    const OPERATION: Operation = Operation::UpdateEnrollment;
    const SUCCESS: &'static [u16] = &[200, 202];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .nested("enrollment", self.enrollment.validate())
            .check("enrollment_id", required(&self.enrollment_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        RequestSpec::put(enrollment_path(self.enrollment_id))
            .query_opt("allow-cancel-pending-changes", self.allow_cancel_pending_changes)
            .query_opt("allow-staging-bypass", self.allow_staging_bypass)
            .query_opt("deploy-not-after", self.deploy_not_after.as_ref())
            .query_opt("deploy-not-before", self.deploy_not_before.as_ref())
            .query_opt("force-renewal", self.force_renewal)
            .query_opt("renewal-date-check-override", self.renewal_date_check_override)
            .accept(ENROLLMENT_STATUS)
            .json(ENROLLMENT, &self.enrollment)
    }

    fn finish(&self, response: Self::Response) -> Result<Self::Response, ErrorKind> {
        with_location_id(response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveEnrollmentRequest {
    pub enrollment_id: i64,
    pub allow_cancel_pending_changes: Option<bool>,
    pub deploy_not_after: Option<String>,
    pub deploy_not_before: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveEnrollmentResponse {
    pub enrollment: String,
    pub changes: Vec<String>,
}

impl Endpoint for RemoveEnrollmentRequest {
    type Response = RemoveEnrollmentResponse;
    const OPERATION: Operation = Operation::RemoveEnrollment;
    const SUCCESS: &'static [u16] = &[200, 202];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("enrollment_id", required(&self.enrollment_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::delete(enrollment_path(self.enrollment_id))
            .query_opt("allow-cancel-pending-changes", self.allow_cancel_pending_changes)
            .query_opt("deploy-not-after", self.deploy_not_after.as_ref())
            .query_opt("deploy-not-before", self.deploy_not_before.as_ref())
            .accept(ENROLLMENT_STATUS))
    }
}
