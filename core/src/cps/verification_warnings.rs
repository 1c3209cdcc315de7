use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::{change_path, AcknowledgementRequest, GetChangeRequest, ACKNOWLEDGEMENT};
use crate::endpoint::{MediaType, RequestSpec};

const WARNINGS: MediaType = MediaType::cps("warnings", 1);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreVerificationWarnings {
    pub warnings: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostVerificationWarnings {
    pub warnings: String,
}

fn info(r: &GetChangeRequest, input: &str) -> RequestSpec {
    RequestSpec::get(format!(
        "{}/input/info/{input}",
        change_path(r.enrollment_id, r.change_id)
    ))
    .accept(WARNINGS)
}

operation! {
    GetChangePreVerificationWarnings(GetChangeRequest) -> PreVerificationWarnings {
        operation: GetChangePreVerificationWarnings,
        success: &[200],
        request: |r| Ok(info(r, "pre-verification-warnings")),
    }
}

operation! {
    AcknowledgePreVerificationWarnings(AcknowledgementRequest) -> IgnoredAny {
        operation: AcknowledgePreVerificationWarnings,
        success: &[200, 204],
        request: |r| r.post("pre-verification-warnings-ack", ACKNOWLEDGEMENT),
    }
}

operation! {
    GetChangePostVerificationWarnings(GetChangeRequest) -> PostVerificationWarnings {
        operation: GetChangePostVerificationWarnings,
        success: &[200],
        request: |r| Ok(info(r, "post-verification-warnings")),
    }
}

operation! {
    AcknowledgePostVerificationWarnings(AcknowledgementRequest) -> IgnoredAny {
        operation: AcknowledgePostVerificationWarnings,
        success: &[200, 204],
        request: |r| r.post("post-verification-warnings-ack", ACKNOWLEDGEMENT),
    }
}
