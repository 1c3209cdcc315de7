use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::{change_path, AcknowledgementRequest, GetChangeRequest, ACKNOWLEDGEMENT};
use crate::endpoint::{MediaType, RequestSpec};

/// Domain validation state for every domain of a change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DvArray {
    pub dv: Vec<Dv>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dv {
    pub challenges: Vec<Challenge>,
    pub domain: String,
    pub error: Option<String>,
    pub expires: String,
    pub request_timestamp: String,
    pub status: String,
    pub validated_timestamp: String,
    pub validation_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Challenge {
    pub error: Option<String>,
    pub full_path: String,
    pub redirect_full_path: String,
    pub response_body: String,
    pub status: String,
    pub token: String,
    #[serde(rename = "type")]
    pub challenge_type: String,
    pub validation_records: Vec<ValidationRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationRecord {
    pub authorities: Vec<String>,
    pub hostname: String,
    pub port: String,
    pub resolved_ip: Vec<String>,
    pub tried_ip: String,
    pub url: String,
    pub used_ip: String,
}

operation! {
    GetChangeLetsEncryptChallenges(GetChangeRequest) -> DvArray {
        operation: GetChangeLetsEncryptChallenges,
        success: &[200],
        request: |r| Ok(RequestSpec::get(format!(
            "{}/input/info/lets-encrypt-challenges",
            change_path(r.enrollment_id, r.change_id)
        ))
        .accept(MediaType::cps("dv-challenges", 2))),
    }
}

operation! {
    AcknowledgeDvChallenges(AcknowledgementRequest) -> IgnoredAny {
        operation: AcknowledgeDvChallenges,
        success: &[200, 202, 204],
        request: |r| r.post("lets-encrypt-challenges-completed", ACKNOWLEDGEMENT.with_charset()),
    }
}
