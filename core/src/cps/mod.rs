//! Certificate Provisioning System (CPS) operations under `/cps/v2`.
//!
//! Requests scoped to a single change share [`GetChangeRequest`]; the
//! acknowledgement endpoints share [`AcknowledgementRequest`]. Each
//! operation still has its own [`Endpoint`] type (a thin wrapper around the
//! shared request) so that hosts driving `Client::build` and
//! `Client::parse` directly can name it.

use serde::Serialize;

use crate::client::{Client, Transport};
use crate::endpoint::{Endpoint, MediaType, RequestSpec};
use crate::error::{Error, TransportError};
use crate::validate::{known, required, wire_enum, Fields, Validate, ValidationErrors};

/// Declares an endpoint that wraps a shared request type.
macro_rules! operation {
    (
        $(#[$meta:meta])*
        $name:ident($request:ty) -> $response:ty {
            operation: $op:ident,
            success: $success:expr,
            request: |$req:ident| $spec:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(pub $request);

        impl $crate::endpoint::Endpoint for $name {
            type Response = $response;
            const OPERATION: $crate::endpoint::Operation = $crate::endpoint::Operation::$op;
            const SUCCESS: &'static [u16] = $success;

            fn validate(&self) -> Result<(), $crate::validate::ValidationErrors> {
                $crate::validate::Validate::validate(&self.0)
            }

            fn request(&self) -> Result<$crate::endpoint::RequestSpec, $crate::error::TransportError> {
                let $req = &self.0;
                $spec
            }
        }
    };
}

mod change_management;
mod changes;
mod deployments;
mod dv_challenges;
mod enrollments;
mod history;
mod third_party_csr;
mod verification_warnings;

pub use change_management::*;
pub use changes::*;
pub use deployments::*;
pub use dv_challenges::*;
pub use enrollments::*;
pub use history::*;
pub use third_party_csr::*;
pub use verification_warnings::*;

const CHANGE_ID: MediaType = MediaType::cps("change-id", 1);
const ACKNOWLEDGEMENT: MediaType = MediaType::cps("acknowledgement", 1);

fn enrollment_path(enrollment_id: i64) -> String {
    format!("/cps/v2/enrollments/{enrollment_id}")
}

fn change_path(enrollment_id: i64, change_id: i64) -> String {
    format!("/cps/v2/enrollments/{enrollment_id}/changes/{change_id}")
}

/// Identifies one change of one enrollment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetChangeRequest {
    pub enrollment_id: i64,
    pub change_id: i64,
}

impl Validate for GetChangeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("enrollment_id", required(&self.enrollment_id))
            .check("change_id", required(&self.change_id))
            .finish()
    }
}

wire_enum! {
    /// Answer to a pending change-management or verification prompt.
    pub enum AcknowledgementValue {
        Acknowledge => "acknowledge",
        Deny => "deny",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub acknowledgement: AcknowledgementValue,
}

impl Validate for Acknowledgement {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check(
                "acknowledgement",
                required(&self.acknowledgement).and_then(|_| known(&self.acknowledgement)),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcknowledgementRequest {
    pub enrollment_id: i64,
    pub change_id: i64,
    pub acknowledgement: Acknowledgement,
}

impl AcknowledgementRequest {
    pub fn new(enrollment_id: i64, change_id: i64, value: AcknowledgementValue) -> Self {
        Self {
            enrollment_id,
            change_id,
            acknowledgement: Acknowledgement {
                acknowledgement: value,
            },
        }
    }

    fn post(&self, update: &str, content_type: MediaType) -> Result<RequestSpec, TransportError> {
        RequestSpec::post(format!(
            "{}/input/update/{update}",
            change_path(self.enrollment_id, self.change_id)
        ))
        .accept(CHANGE_ID)
        .json(content_type, &self.acknowledgement)
    }
}

impl Validate for AcknowledgementRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("enrollment_id", required(&self.enrollment_id))
            .check("change_id", required(&self.change_id))
            .nested("acknowledgement", self.acknowledgement.validate())
            .finish()
    }
}

/// CPS operations bound to a client.
#[derive(Debug)]
pub struct Cps<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Cps<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    fn run<E: Endpoint>(&self, endpoint: E) -> Result<E::Response, Error> {
        self.client.execute(endpoint)
    }

    pub fn list_enrollments(&self, params: ListEnrollmentsRequest) -> Result<ListEnrollmentsResponse, Error> {
        self.run(params)
    }

    pub fn get_enrollment(&self, params: GetEnrollmentRequest) -> Result<Enrollment, Error> {
        self.run(params)
    }

    pub fn create_enrollment(&self, params: CreateEnrollmentRequest) -> Result<CreateEnrollmentResponse, Error> {
        self.run(params)
    }

    pub fn update_enrollment(&self, params: UpdateEnrollmentRequest) -> Result<UpdateEnrollmentResponse, Error> {
        self.run(params)
    }

    pub fn remove_enrollment(&self, params: RemoveEnrollmentRequest) -> Result<RemoveEnrollmentResponse, Error> {
        self.run(params)
    }

    pub fn get_change_status(&self, params: GetChangeRequest) -> Result<Change, Error> {
        self.run(GetChangeStatus(params))
    }

    pub fn cancel_change(&self, params: GetChangeRequest) -> Result<CancelChangeResponse, Error> {
        self.run(CancelChange(params))
    }

    pub fn get_change_management_info(&self, params: GetChangeRequest) -> Result<ChangeManagementInfo, Error> {
        self.run(GetChangeManagementInfo(params))
    }

    pub fn get_change_deployment_info(&self, params: GetChangeRequest) -> Result<Deployment, Error> {
        self.run(GetChangeDeploymentInfo(params))
    }

    pub fn acknowledge_change_management(&self, params: AcknowledgementRequest) -> Result<(), Error> {
        self.run(AcknowledgeChangeManagement(params)).map(drop)
    }

    pub fn list_deployments(&self, params: ListDeploymentsRequest) -> Result<ListDeploymentsResponse, Error> {
        self.run(params)
    }

    pub fn get_production_deployment(&self, params: GetDeploymentRequest) -> Result<Deployment, Error> {
        self.run(GetProductionDeployment(params))
    }

    pub fn get_staging_deployment(&self, params: GetDeploymentRequest) -> Result<Deployment, Error> {
        self.run(GetStagingDeployment(params))
    }

    pub fn get_deployment_schedule(&self, params: GetChangeRequest) -> Result<DeploymentSchedule, Error> {
        self.run(GetDeploymentSchedule(params))
    }

    pub fn update_deployment_schedule(
        &self,
        params: UpdateDeploymentScheduleRequest,
    ) -> Result<UpdateDeploymentScheduleResponse, Error> {
        self.run(params)
    }

    pub fn get_change_lets_encrypt_challenges(&self, params: GetChangeRequest) -> Result<DvArray, Error> {
        self.run(GetChangeLetsEncryptChallenges(params))
    }

    pub fn acknowledge_dv_challenges(&self, params: AcknowledgementRequest) -> Result<(), Error> {
        self.run(AcknowledgeDvChallenges(params)).map(drop)
    }

    pub fn get_change_pre_verification_warnings(
        &self,
        params: GetChangeRequest,
    ) -> Result<PreVerificationWarnings, Error> {
        self.run(GetChangePreVerificationWarnings(params))
    }

    pub fn acknowledge_pre_verification_warnings(&self, params: AcknowledgementRequest) -> Result<(), Error> {
        self.run(AcknowledgePreVerificationWarnings(params)).map(drop)
    }

    pub fn get_change_post_verification_warnings(
        &self,
        params: GetChangeRequest,
    ) -> Result<PostVerificationWarnings, Error> {
        self.run(GetChangePostVerificationWarnings(params))
    }

    pub fn acknowledge_post_verification_warnings(&self, params: AcknowledgementRequest) -> Result<(), Error> {
        self.run(AcknowledgePostVerificationWarnings(params)).map(drop)
    }

    pub fn get_change_third_party_csr(&self, params: GetChangeRequest) -> Result<ThirdPartyCsrResponse, Error> {
        self.run(GetChangeThirdPartyCsr(params))
    }

    pub fn upload_third_party_cert_and_trust_chain(
        &self,
        params: UploadThirdPartyCertAndTrustChainRequest,
    ) -> Result<(), Error> {
        self.run(params).map(drop)
    }

    pub fn get_dv_history(&self, params: GetDvHistoryRequest) -> Result<GetDvHistoryResponse, Error> {
        self.run(params)
    }

    pub fn get_certificate_history(
        &self,
        params: GetCertificateHistoryRequest,
    ) -> Result<GetCertificateHistoryResponse, Error> {
        self.run(params)
    }

    pub fn get_change_history(&self, params: GetChangeHistoryRequest) -> Result<GetChangeHistoryResponse, Error> {
        self.run(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::testing::{client, sent, INTERNAL_ERROR};

    #[test]
    fn acknowledgement_rejects_unknown_value() {
        let client = client(200, "");
        let err = client
            .cps()
            .acknowledge_change_management(AcknowledgementRequest::new(
                1,
                2,
                AcknowledgementValue::from("ok"),
            ))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "acknowledging change management: struct validation: acknowledgement.acknowledgement: must be a valid value"
        );
        assert!(sent(&client).is_empty());
    }

    #[test]
    fn acknowledgement_requires_value() {
        let err = AcknowledgementRequest {
            enrollment_id: 1,
            change_id: 2,
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err.get("acknowledgement.acknowledgement"),
            Some(&crate::validate::Violation::Blank)
        );
    }

    #[test]
    fn acknowledge_change_management_sends_body_and_headers() {
        let client = client(200, "");
        client
            .cps()
            .acknowledge_change_management(AcknowledgementRequest::new(
                1,
                2,
                AcknowledgementValue::Acknowledge,
            ))
            .unwrap();
        let req = &sent(&client)[0];
        assert_eq!(
            req.url,
            "https://akab-host.luna.akamaiapis.net/cps/v2/enrollments/1/changes/2/input/update/change-management-ack"
        );
        assert_eq!(req.header("Accept"), Some("application/vnd.akamai.cps.change-id.v1+json"));
        assert_eq!(
            req.header("Content-Type"),
            Some("application/vnd.akamai.cps.acknowledgement.v1+json; charset=utf-8")
        );
        assert_eq!(req.body.as_deref(), Some(r#"{"acknowledgement":"acknowledge"}"#));
    }

    #[test]
    fn internal_error_body_decodes_as_problem_detail() {
        let client = client(500, INTERNAL_ERROR);
        let err = client
            .cps()
            .get_change_status(GetChangeRequest {
                enrollment_id: 1,
                change_id: 2,
            })
            .unwrap_err();
        let want = ApiError {
            error_type: "internal_error".to_string(),
            title: "Internal Server Error".to_string(),
            detail: "Error making request".to_string(),
            status_code: 500,
            ..ApiError::default()
        };
        assert_eq!(err.api_error(), Some(&want));
        assert!(err.to_string().starts_with("fetching change: API error:"));
    }
}
