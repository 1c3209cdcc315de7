//! CPS and DataStream lifecycles against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client over real
//! HTTP through a ureq-backed `Transport`. The mock checks request media
//! types literally and answers errors with problem-detail bodies, so header
//! building and error decoding are covered end to end.

use akamai_core::cps::{
    AcknowledgementRequest, AcknowledgementValue, Contact, CreateEnrollmentRequest, Csr,
    DeploymentSchedule, Enrollment, GetChangeRequest, GetDvHistoryRequest, GetEnrollmentRequest,
    ListEnrollmentsRequest, NetworkConfiguration, OcspStapling, Org, RemoveEnrollmentRequest,
    UpdateDeploymentScheduleRequest,
};
use akamai_core::datastream::{
    ActivateStreamRequest, CreateStreamRequest, DatasetFieldId, DeleteStreamRequest,
    DeliveryConfiguration, FormatType, Frequency, GetActivationHistoryRequest, GetStreamRequest,
    ListStreamsRequest, PropertyId, S3Connector, StreamConfiguration, StreamStatus,
    UpdateStreamRequest,
};
use akamai_core::{Client, Config, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Executes an `HttpRequest` with ureq.
///
/// ureq's automatic status-code-as-error behavior is disabled so 4xx/5xx
/// responses come back as data and the core classifies them.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = req.url.as_str();
        let response = match (req.method, &req.body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), req).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), req).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), req).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), req).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), req).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), req).send_empty(),
        };
        let mut response = response.map_err(TransportError::network)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(TransportError::network)?;

        Ok(HttpResponse { status, headers, body })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, req: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Starts the mock server on a random port and returns a client bound to it.
fn start() -> Client<UreqTransport> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    let config = Config::parse(&format!("http://{addr}")).unwrap();
    Client::new(config, UreqTransport::new())
}

fn enrollment() -> Enrollment {
    let contact = Contact {
        first_name: Some("R1".to_string()),
        last_name: Some("D1".to_string()),
        email: Some("r1d1@example.com".to_string()),
        ..Contact::default()
    };
    Enrollment {
        admin_contact: Some(contact.clone()),
        certificate_type: "san".to_string(),
        csr: Some(Csr {
            cn: "www.example.com".to_string(),
            sans: vec!["www.example.com".to_string()],
            ..Csr::default()
        }),
        network_configuration: Some(NetworkConfiguration {
            ocsp_stapling: OcspStapling::On,
            sni_only: true,
            ..NetworkConfiguration::default()
        }),
        org: Some(Org {
            name: Some("Example Org".to_string()),
            ..Org::default()
        }),
        ra: "lets-encrypt".to_string(),
        tech_contact: Some(contact),
        validation_type: "dv".to_string(),
        ..Enrollment::default()
    }
}

fn stream_configuration() -> StreamConfiguration {
    StreamConfiguration {
        contract_id: "2-FGHIJ".to_string(),
        dataset_fields: vec![DatasetFieldId { dataset_field_id: 1000 }],
        destination: Some(
            S3Connector {
                access_key: "AKIA".to_string(),
                bucket: "logs".to_string(),
                display_name: "s3".to_string(),
                path: "datastream".to_string(),
                region: "us-east-1".to_string(),
                secret_access_key: "secret".to_string(),
                ..Default::default()
            }
            .into(),
        ),
        delivery_configuration: DeliveryConfiguration {
            format: FormatType::Json,
            frequency: Frequency {
                interval_in_seconds: 30,
            },
            ..Default::default()
        },
        properties: vec![PropertyId { property_id: 382631 }],
        stream_name: "integration".to_string(),
        ..Default::default()
    }
}

#[test]
fn enrollment_lifecycle() {
    let client = start();
    let cps = client.cps();

    // Step 1: create; the mock insists on the versioned enrollment media type.
    let created = cps
        .create_enrollment(CreateEnrollmentRequest {
            enrollment: enrollment(),
            contract_id: "K-0N7RAK71".to_string(),
            ..Default::default()
        })
        .unwrap();
    let enrollment_id = created.id;
    assert_eq!(created.enrollment, format!("/cps/v2/enrollments/{enrollment_id}"));
    let change_id = akamai_core::id_from_location(&created.changes[0]).unwrap();

    // Step 2: read it back.
    let fetched = cps.get_enrollment(GetEnrollmentRequest { enrollment_id }).unwrap();
    assert_eq!(fetched.csr.unwrap().cn, "www.example.com");
    assert_eq!(fetched.pending_changes, created.changes);

    // Step 3: list by contract.
    let listed = cps
        .list_enrollments(ListEnrollmentsRequest {
            contract_id: "K-0N7RAK71".to_string(),
        })
        .unwrap();
    assert_eq!(listed.enrollments.len(), 1);

    // Step 4: the change waits for change-management acknowledgement.
    let change_ref = GetChangeRequest {
        enrollment_id,
        change_id,
    };
    let change = cps.get_change_status(change_ref.clone()).unwrap();
    assert!(change.requires(&akamai_core::cps::AllowedInputType::ChangeManagementInfo));

    // Step 5: schedule and acknowledge; both bodies carry charset media types.
    cps.update_deployment_schedule(UpdateDeploymentScheduleRequest {
        enrollment_id,
        change_id,
        deployment_schedule: DeploymentSchedule {
            not_before: Some("2021-10-03T08:02:46Z".to_string()),
            not_after: None,
        },
    })
    .unwrap();
    let schedule = cps.get_deployment_schedule(change_ref.clone()).unwrap();
    assert_eq!(schedule.not_before.as_deref(), Some("2021-10-03T08:02:46Z"));

    cps.acknowledge_change_management(AcknowledgementRequest::new(
        enrollment_id,
        change_id,
        AcknowledgementValue::Acknowledge,
    ))
    .unwrap();
    let change = cps.get_change_status(change_ref.clone()).unwrap();
    assert!(change.allowed_input.is_empty());
    assert_eq!(
        change.status_info.unwrap().deployment_schedule.unwrap().not_before.as_deref(),
        Some("2021-10-03T08:02:46Z")
    );

    // Step 6: remove; afterwards the enrollment is a 404 problem.
    cps.remove_enrollment(RemoveEnrollmentRequest {
        enrollment_id,
        ..Default::default()
    })
    .unwrap();
    let err = cps.get_enrollment(GetEnrollmentRequest { enrollment_id }).unwrap_err();
    assert_eq!(err.status(), Some(404));
    let problem = err.api_error().unwrap();
    assert_eq!(problem.title, "Not Found");
    assert!(!problem.instance.is_empty());
    assert!(err.to_string().starts_with("fetching enrollment: API error:"));
}

#[test]
fn html_error_page_is_kept_as_detail() {
    let client = start();
    let err = client
        .cps()
        .get_dv_history(GetDvHistoryRequest { enrollment_id: 1 })
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    let problem = err.api_error().unwrap();
    assert_eq!(
        problem.title,
        "Failed to unmarshal error body. CPS API failed. Check details for more information."
    );
    assert!(problem.detail.starts_with("<html>"));
}

#[test]
fn validation_failure_never_reaches_the_server() {
    let client = start();
    let err = client
        .cps()
        .create_enrollment(CreateEnrollmentRequest {
            enrollment: enrollment(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(err.is_validation());

    // Nothing was created.
    let listed = client
        .cps()
        .list_enrollments(ListEnrollmentsRequest {
            contract_id: "K-0N7RAK71".to_string(),
        })
        .unwrap();
    assert!(listed.enrollments.is_empty());
}

#[test]
fn stream_lifecycle() {
    let client = start();
    let datastream = client.datastream();

    // Step 1: create inactive; destinationType is stamped by the client.
    let mut configuration = stream_configuration();
    configuration.group_id = 1234;
    let created = datastream
        .create_stream(CreateStreamRequest {
            stream_configuration: configuration,
            activate: false,
        })
        .unwrap();
    let stream_id = created.stream_id;
    assert_eq!(created.stream_status, StreamStatus::Inactive);
    assert_eq!(created.destination.destination_type.to_string(), "S3");
    assert_eq!(created.group_id, 1234);

    // Step 2: update without a group id.
    let mut configuration = stream_configuration();
    configuration.stream_name = "renamed".to_string();
    let updated = datastream
        .update_stream(UpdateStreamRequest {
            stream_id,
            stream_configuration: configuration,
            activate: false,
        })
        .unwrap();
    assert_eq!(updated.stream_name, "renamed");
    assert_eq!(updated.stream_version, 2);
    assert_eq!(updated.group_id, 1234);

    // Step 3: activate and read the history.
    let activated = datastream
        .activate_stream(ActivateStreamRequest { stream_id })
        .unwrap();
    assert_eq!(activated.stream_status, StreamStatus::Activated);
    let history = datastream
        .get_activation_history(GetActivationHistoryRequest { stream_id })
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, StreamStatus::Activated);

    // Step 4: list and get.
    let streams = datastream
        .list_streams(ListStreamsRequest { group_id: Some(1234) })
        .unwrap();
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].stream_id, stream_id);
    let fetched = datastream
        .get_stream(GetStreamRequest {
            stream_id,
            version: None,
        })
        .unwrap();
    assert_eq!(fetched.stream_name, "renamed");

    // Step 5: delete; the 204 has no body.
    datastream
        .delete_stream(DeleteStreamRequest { stream_id })
        .unwrap();
    let err = datastream
        .get_stream(GetStreamRequest {
            stream_id,
            version: None,
        })
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.api_error().unwrap().detail,
        format!("stream {stream_id} does not exist")
    );

    // Step 6: deleting again is a problem too.
    let err = datastream
        .delete_stream(DeleteStreamRequest { stream_id })
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}
