//! Verify build/parse against the JSON test vectors stored in `test-vectors/`.
//!
//! Each case names an operation, its input, the request the client must
//! build, a simulated response, and either the parsed result or the error
//! the client must report. Bodies are compared as parsed JSON (not raw
//! strings) so field order does not matter. Cases rejected by validation
//! carry no expected request.

use std::fmt::Debug;

use akamai_core::cps::{
    AcknowledgeChangeManagement, AcknowledgementRequest, AcknowledgementValue, CancelChange,
    CreateEnrollmentRequest, CreateEnrollmentResponse, DeploymentSchedule, Enrollment,
    GetChangeHistoryRequest, GetChangeRequest, GetChangeStatus, GetDvHistoryRequest,
    GetEnrollmentRequest, RemoveEnrollmentRequest, UpdateDeploymentScheduleRequest,
};
use akamai_core::datastream::{
    DeactivateStreamRequest, DeleteStreamRequest, GetStreamRequest, ListStreamsRequest,
};
use akamai_core::firewall_rules::{
    LastAction, ListCidrBlocksRequest, ListServicesRequest, ListSubscriptionsRequest, Subscription,
    UpdateSubscriptionsRequest,
};
use akamai_core::{Client, Config, Endpoint, Error, HttpMethod, HttpResponse};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "https://akab-host.luna.akamaiapis.net";

/// Every input key used across the vector files.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Input {
    contract_id: String,
    deploy_not_after: Option<String>,
    deploy_not_before: Option<String>,
    allow_duplicate_cn: bool,
    allow_cancel_pending_changes: Option<bool>,
    enrollment: Enrollment,
    enrollment_id: i64,
    change_id: i64,
    acknowledgement: String,
    deployment_schedule: DeploymentSchedule,
    stream_id: i64,
    version: Option<i64>,
    group_id: Option<i64>,
    subscriptions: Vec<Subscription>,
    effective_date_gt: Option<String>,
    last_action: Option<String>,
}

impl Input {
    fn change(&self) -> GetChangeRequest {
        GetChangeRequest {
            enrollment_id: self.enrollment_id,
            change_id: self.change_id,
        }
    }
}

/// Build/parse never touch the transport, so the unit type stands in.
fn client() -> Client<()> {
    Client::new(Config::parse(BASE_URL).unwrap(), ())
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn input(case: &Value) -> Input {
    serde_json::from_value(case["input"].clone()).unwrap()
}

/// Builds the request, compares it with `expected_request`, then parses the
/// simulated response.
fn run<E: Endpoint>(case: &Value, mut endpoint: E) -> Result<E::Response, Error> {
    let name = case["name"].as_str().unwrap();
    let c = client();

    let req = match c.build(&mut endpoint) {
        Ok(req) => req,
        Err(err) => {
            assert!(
                case.get("expected_request").is_none(),
                "{name}: unexpected build error: {err}"
            );
            return Err(err);
        }
    };
    let expected_req = &case["expected_request"];
    assert!(expected_req.is_object(), "{name}: built a request for a rejected input");

    assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

    let expected_headers: Vec<(String, String)> = expected_req["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    let req_body: Option<Value> = req.body.as_deref().map(|body| serde_json::from_str(body).unwrap());
    let expected_body = match &expected_req["body"] {
        Value::Null => None,
        body => Some(body.clone()),
    };
    assert_eq!(req_body, expected_body, "{name}: body");

    let sim = &case["simulated_response"];
    let response = HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    );
    c.parse(&endpoint, response)
}

/// Compares the outcome with `expected_result` or `expected_error`.
fn check<R>(case: &Value, outcome: Result<R, Error>)
where
    R: DeserializeOwned + PartialEq + Debug,
{
    let name = case["name"].as_str().unwrap();

    let Some(expected) = case.get("expected_error") else {
        let result = outcome.unwrap_or_else(|err| panic!("{name}: unexpected error: {err}"));
        let expected: R = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result, expected, "{name}: parsed result");
        return;
    };

    let err = match outcome {
        Ok(result) => panic!("{name}: expected an error, got {result:?}"),
        Err(err) => err,
    };
    let display = err.to_string();
    if let Some(text) = expected.get("display") {
        assert_eq!(display, text.as_str().unwrap(), "{name}: display");
    }
    if let Some(prefix) = expected.get("starts_with") {
        assert!(display.starts_with(prefix.as_str().unwrap()), "{name}: display was {display}");
    }
    if let Some(status) = expected.get("status") {
        assert_eq!(err.status(), Some(status.as_u64().unwrap() as u16), "{name}: status");
    }
    if let Some(title) = expected.get("title") {
        assert_eq!(err.api_error().unwrap().title, title.as_str().unwrap(), "{name}: title");
    }
    if let Some(detail) = expected.get("detail") {
        assert_eq!(err.api_error().unwrap().detail, detail.as_str().unwrap(), "{name}: detail");
    }
    if let Some(detail) = expected.get("first_sub_error") {
        assert_eq!(
            err.api_error().unwrap().errors[0].detail,
            detail.as_str().unwrap(),
            "{name}: first sub-error"
        );
    }
    if expected.get("invalid_location").is_some() {
        assert!(err.is_invalid_location(), "{name}: expected an invalid location, got {display}");
    }
}

// ---------------------------------------------------------------------------
// CPS enrollments
// ---------------------------------------------------------------------------

#[test]
fn enrollment_test_vectors() {
    for case in load(include_str!("../../test-vectors/enrollments.json")) {
        let input = input(&case);
        match case["operation"].as_str().unwrap() {
            "create enrollment" => {
                let outcome = run(
                    &case,
                    CreateEnrollmentRequest {
                        enrollment: input.enrollment,
                        contract_id: input.contract_id,
                        deploy_not_after: input.deploy_not_after,
                        deploy_not_before: input.deploy_not_before,
                        allow_duplicate_cn: input.allow_duplicate_cn,
                    },
                );
                // `id` is not part of the wire body, so it is checked apart.
                if let (Ok(created), Some(id)) = (&outcome, case.get("expected_id")) {
                    assert_eq!(created.id, id.as_i64().unwrap(), "{}: id", case["name"]);
                }
                let outcome = outcome.map(|created| CreateEnrollmentResponse {
                    id: 0,
                    ..created
                });
                check(&case, outcome);
            }
            "get enrollment" => check(
                &case,
                run(
                    &case,
                    GetEnrollmentRequest {
                        enrollment_id: input.enrollment_id,
                    },
                ),
            ),
            "remove enrollment" => check(
                &case,
                run(
                    &case,
                    RemoveEnrollmentRequest {
                        enrollment_id: input.enrollment_id,
                        allow_cancel_pending_changes: input.allow_cancel_pending_changes,
                        ..Default::default()
                    },
                ),
            ),
            other => panic!("unknown operation: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// CPS changes
// ---------------------------------------------------------------------------

#[test]
fn change_test_vectors() {
    for case in load(include_str!("../../test-vectors/changes.json")) {
        let input = input(&case);
        match case["operation"].as_str().unwrap() {
            "get change status" => check(&case, run(&case, GetChangeStatus(input.change()))),
            "cancel change" => check(&case, run(&case, CancelChange(input.change()))),
            "acknowledge change management" => {
                let request = AcknowledgementRequest::new(
                    input.enrollment_id,
                    input.change_id,
                    AcknowledgementValue::from(input.acknowledgement.as_str()),
                );
                check::<()>(&case, run(&case, AcknowledgeChangeManagement(request)).map(drop));
            }
            "update deployment schedule" => check(
                &case,
                run(
                    &case,
                    UpdateDeploymentScheduleRequest {
                        enrollment_id: input.enrollment_id,
                        change_id: input.change_id,
                        deployment_schedule: input.deployment_schedule,
                    },
                ),
            ),
            "get dv history" => check(
                &case,
                run(
                    &case,
                    GetDvHistoryRequest {
                        enrollment_id: input.enrollment_id,
                    },
                ),
            ),
            "get change history" => check(
                &case,
                run(
                    &case,
                    GetChangeHistoryRequest {
                        enrollment_id: input.enrollment_id,
                    },
                ),
            ),
            other => panic!("unknown operation: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// DataStream
// ---------------------------------------------------------------------------

#[test]
fn stream_test_vectors() {
    for case in load(include_str!("../../test-vectors/streams.json")) {
        let input = input(&case);
        match case["operation"].as_str().unwrap() {
            "get stream" => check(
                &case,
                run(
                    &case,
                    GetStreamRequest {
                        stream_id: input.stream_id,
                        version: input.version,
                    },
                ),
            ),
            "list streams" => check(
                &case,
                run(
                    &case,
                    ListStreamsRequest {
                        group_id: input.group_id,
                    },
                ),
            ),
            "delete stream" => check::<()>(
                &case,
                run(
                    &case,
                    DeleteStreamRequest {
                        stream_id: input.stream_id,
                    },
                )
                .map(drop),
            ),
            "deactivate stream" => check(
                &case,
                run(
                    &case,
                    DeactivateStreamRequest {
                        stream_id: input.stream_id,
                    },
                ),
            ),
            other => panic!("unknown operation: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Firewall Rules Manager
// ---------------------------------------------------------------------------

#[test]
fn firewall_rules_test_vectors() {
    for case in load(include_str!("../../test-vectors/firewall_rules.json")) {
        let input = input(&case);
        match case["operation"].as_str().unwrap() {
            "list subscriptions" => check(&case, run(&case, ListSubscriptionsRequest)),
            "update subscriptions" => check(
                &case,
                run(
                    &case,
                    UpdateSubscriptionsRequest {
                        subscriptions: input.subscriptions,
                    },
                ),
            ),
            "list services" => check(&case, run(&case, ListServicesRequest)),
            "list cidr blocks" => check(
                &case,
                run(
                    &case,
                    ListCidrBlocksRequest {
                        effective_date_gt: input.effective_date_gt,
                        last_action: input.last_action.as_deref().map(LastAction::from),
                    },
                ),
            ),
            other => panic!("unknown operation: {other}"),
        }
    }
}
