//! Stateless request builder and response decoder shared by every API.
//!
//! # Design
//! `Client` holds only its `Config` and a `Transport`. Each operation is
//! split the same way: [`Client::build`] turns an [`Endpoint`] into an
//! `HttpRequest`, the transport performs the round trip, and
//! [`Client::parse`] consumes the `HttpResponse`. `build` and `parse` are
//! public so a host that owns its own HTTP stack can drive them directly;
//! [`Client::execute`] chains all three for callers that hand the client a
//! transport.

use tracing::debug;

use crate::config::Config;
use crate::cps::Cps;
use crate::datastream::DataStream;
use crate::endpoint::{Endpoint, RequestSpec};
use crate::error::{ApiError, Error, TransportError};
use crate::firewall_rules::FirewallRules;
use crate::http::{HttpRequest, HttpResponse};

/// Performs one HTTP round trip. Signing, retries and pooling live here.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

#[derive(Debug, Clone)]
pub struct Client<T> {
    config: Config,
    transport: T,
}

impl<T> Client<T> {
    pub fn new(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Stamps, validates and encodes `endpoint` into an absolute request.
    ///
    /// Fails with a validation error before anything is encoded.
    pub fn build<E: Endpoint>(&self, endpoint: &mut E) -> Result<HttpRequest, Error> {
        endpoint.prepare();
        endpoint
            .validate()
            .map_err(|errors| Error::new(E::OPERATION, errors))?;
        endpoint
            .request()
            .and_then(|spec| self.encode(spec))
            .map_err(|err| Error::new(E::OPERATION, err))
    }

    /// Decodes `response` for `endpoint`.
    ///
    /// Statuses outside `E::SUCCESS` become an `ApiError`. An empty success
    /// body decodes as JSON `null`.
    pub fn parse<E: Endpoint>(&self, endpoint: &E, response: HttpResponse) -> Result<E::Response, Error> {
        let op = E::OPERATION;
        if !E::SUCCESS.contains(&response.status) {
            let err = ApiError::from_response(op.api(), response.status, &response.body);
            return Err(Error::new(op, err));
        }
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        let decoded = serde_json::from_str(body)
            .map_err(|err| Error::new(op, TransportError::Decode(err)))?;
        endpoint
            .finish(decoded)
            .map_err(|kind| Error::new(op, kind))
    }

    fn encode(&self, spec: RequestSpec) -> Result<HttpRequest, TransportError> {
        let mut url = self.config.base_url.clone();
        let path = format!("{}{}", url.path().trim_end_matches('/'), spec.path);
        url.set_path(&path);

        let mut query = spec.query;
        if let Some(key) = &self.config.account_key {
            query.insert("accountSwitchKey", key.clone());
        }
        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        let mut headers = vec![("Accept".to_string(), spec.accept.to_string())];
        let body = spec.body.map(|(content_type, body)| {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
            body
        });

        Ok(HttpRequest {
            method: spec.method,
            url: url.into(),
            headers,
            body,
        })
    }
}

impl<T: Transport> Client<T> {
    /// Validates, dispatches and decodes one operation.
    pub fn execute<E: Endpoint>(&self, mut endpoint: E) -> Result<E::Response, Error> {
        let span = tracing::debug_span!("operation", name = %E::OPERATION);
        let _enter = span.enter();

        let request = self.build(&mut endpoint).inspect_err(|err| {
            debug!(error = %err, "request rejected before dispatch");
        })?;
        debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = self
            .transport
            .execute(&request)
            .map_err(|err| Error::new(E::OPERATION, err))?;
        debug!(status = response.status, "received response");
        self.parse(&endpoint, response)
    }

    pub fn cps(&self) -> Cps<'_, T> {
        Cps::new(self)
    }

    pub fn datastream(&self) -> DataStream<'_, T> {
        DataStream::new(self)
    }

    pub fn firewall_rules(&self) -> FirewallRules<'_, T> {
        FirewallRules::new(self)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use url::Url;

    use super::*;
    use crate::cps::{GetChangeRequest, GetEnrollmentRequest, ListEnrollmentsRequest};
    use crate::error::ErrorKind;
    use crate::http::HttpMethod;

    fn config() -> Config {
        Config::new(Url::parse("https://akab-host.luna.akamaiapis.net").unwrap())
    }

    fn unreachable_transport(_: &HttpRequest) -> Result<HttpResponse, TransportError> {
        panic!("transport must not be called")
    }

    #[test]
    fn build_joins_base_url_and_sets_accept() {
        let client = Client::new(config(), unreachable_transport);
        let req = client
            .build(&mut GetEnrollmentRequest { enrollment_id: 10 })
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://akab-host.luna.akamaiapis.net/cps/v2/enrollments/10");
        assert_eq!(
            req.header("Accept"),
            Some("application/vnd.akamai.cps.enrollment.v9+json")
        );
        assert!(req.header("Content-Type").is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let config = Config::new(Url::parse("http://127.0.0.1:3000/proxy/").unwrap());
        let client = Client::new(config, unreachable_transport);
        let req = client
            .build(&mut GetEnrollmentRequest { enrollment_id: 1 })
            .unwrap();
        assert_eq!(req.url, "http://127.0.0.1:3000/proxy/cps/v2/enrollments/1");
    }

    #[test]
    fn account_switch_key_joins_sorted_query() {
        let client = Client::new(config().with_account_key("1-ABC:2-DEF"), unreachable_transport);
        let req = client
            .build(&mut ListEnrollmentsRequest {
                contract_id: "K-0N7RAK71".to_string(),
            })
            .unwrap();
        assert_eq!(
            req.url,
            "https://akab-host.luna.akamaiapis.net/cps/v2/enrollments?accountSwitchKey=1-ABC%3A2-DEF&contractId=K-0N7RAK71"
        );
    }

    #[test]
    fn validation_failure_skips_transport() {
        let calls = Cell::new(0);
        let transport = |_: &HttpRequest| -> Result<HttpResponse, TransportError> {
            calls.set(calls.get() + 1);
            Ok(HttpResponse::new(200, "{}"))
        };
        let client = Client::new(config(), transport);
        let err = client
            .cps()
            .get_change_status(GetChangeRequest::default())
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(calls.get(), 0);
        assert_eq!(
            err.to_string(),
            "fetching change: struct validation: change_id: cannot be blank; enrollment_id: cannot be blank"
        );
    }

    #[test]
    fn transport_failure_is_wrapped() {
        let transport = |_: &HttpRequest| -> Result<HttpResponse, TransportError> {
            Err(TransportError::network("connection refused"))
        };
        let client = Client::new(config(), transport);
        let err = client
            .cps()
            .get_enrollment(GetEnrollmentRequest { enrollment_id: 1 })
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Transport(TransportError::Network(_))));
        assert_eq!(
            err.to_string(),
            "fetching enrollment: request failed: connection refused"
        );
    }

    #[test]
    fn unexpected_status_is_api_error() {
        let transport = |_: &HttpRequest| -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(
                404,
                r#"{"type":"not-found","title":"Not Found","detail":"no such enrollment","statusCode":404}"#,
            ))
        };
        let client = Client::new(config(), transport);
        let err = client
            .cps()
            .get_enrollment(GetEnrollmentRequest { enrollment_id: 1 })
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.api_error().unwrap().detail, "no such enrollment");
    }

    #[test]
    fn success_status_outside_contract_is_rejected() {
        let client = Client::new(config(), unreachable_transport);
        let err = client
            .parse(
                &GetEnrollmentRequest { enrollment_id: 1 },
                HttpResponse::new(201, "{}"),
            )
            .unwrap_err();
        assert_eq!(err.status(), Some(201));
    }

    #[test]
    fn malformed_success_body_is_decode_error() {
        let client = Client::new(config(), unreachable_transport);
        let err = client
            .parse(
                &GetEnrollmentRequest { enrollment_id: 1 },
                HttpResponse::new(200, "not json"),
            )
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Transport(TransportError::Decode(_))));
    }

    #[test]
    #[tracing_test::traced_test]
    fn execute_logs_dispatch_inside_operation_span() {
        let transport = |_: &HttpRequest| -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(200, r#"{"enrollments":[]}"#))
        };
        let client = Client::new(config(), transport);
        let list = client
            .cps()
            .list_enrollments(ListEnrollmentsRequest {
                contract_id: "ctr_1".to_string(),
            })
            .unwrap();
        assert!(list.enrollments.is_empty());
        assert!(logs_contain("dispatching request"));
        assert!(logs_contain("fetching enrollments"));
    }
}
