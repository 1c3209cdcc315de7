use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::{change_path, GetChangeRequest, CHANGE_ID};
use crate::endpoint::{Endpoint, MediaType, Operation, RequestSpec};
use crate::error::TransportError;
use crate::validate::{known, required, wire_enum, Fields, Validate, ValidationErrors};

wire_enum! {
    pub enum KeyAlgorithm {
        Rsa => "RSA",
        Ecdsa => "ECDSA",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThirdPartyCsrResponse {
    pub csrs: Vec<CertSigningRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertSigningRequest {
    pub csr: String,
    pub key_algorithm: KeyAlgorithm,
}

operation! {
    GetChangeThirdPartyCsr(GetChangeRequest) -> ThirdPartyCsrResponse {
        operation: GetChangeThirdPartyCsr,
        success: &[200],
        request: |r| Ok(RequestSpec::get(format!(
            "{}/input/info/third-party-csr",
            change_path(r.enrollment_id, r.change_id)
        ))
        .accept(MediaType::cps("csr", 2))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadThirdPartyCertAndTrustChainRequest {
    pub enrollment_id: i64,
    pub change_id: i64,
    pub certificates: ThirdPartyCertificates,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyCertificates {
    pub certificates_and_trust_chains: Vec<CertificateAndTrustChain>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateAndTrustChain {
    pub certificate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_chain: Option<String>,
    pub key_algorithm: KeyAlgorithm,
}

impl Validate for CertificateAndTrustChain {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("certificate", required(&self.certificate))
            .check(
                "key_algorithm",
                required(&self.key_algorithm).and_then(|_| known(&self.key_algorithm)),
            )
            .finish()
    }
}

impl Endpoint for UploadThirdPartyCertAndTrustChainRequest {
    type Response = IgnoredAny;
    const OPERATION: Operation = Operation::UploadThirdPartyCertAndTrustChain;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("enrollment_id", required(&self.enrollment_id))
            .check("change_id", required(&self.change_id))
            .check(
                "certificates.certificates_and_trust_chains",
                required(&self.certificates.certificates_and_trust_chains),
            )
            .each(
                "certificates.certificates_and_trust_chains",
                &self.certificates.certificates_and_trust_chains,
            )
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        RequestSpec::post(format!(
            "{}/input/update/third-party-cert-and-trust-chain",
            change_path(self.enrollment_id, self.change_id)
        ))
        .accept(CHANGE_ID)
        .json(
            MediaType::cps("certificate-and-trust-chain", 2).with_charset(),
            &self.certificates,
        )
    }
}
