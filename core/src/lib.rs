//! Synchronous client core for Akamai's CPS, DataStream2 and Firewall Rules
//! Manager APIs.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A [`Transport`] performs the
//! round trip, so signing, pooling and retries stay outside the core and the
//! core itself is deterministic and testable.
//!
//! # Design
//! - Every operation is a request type implementing [`Endpoint`]: it
//!   validates itself, describes its path, query and media types, and names
//!   the statuses that count as success.
//! - [`Client`] holds only a [`Config`] and a transport. `build` and `parse`
//!   are public for hosts that drive their own HTTP stack; `execute` chains
//!   them with the transport.
//! - Failures carry the operation that produced them ([`Error`]) and are
//!   classified into validation, transport, API and location errors.
//!
//! ```
//! use akamai_core::cps::GetEnrollmentRequest;
//! use akamai_core::{Client, Config, HttpRequest, HttpResponse, TransportError};
//!
//! let config = Config::parse("akab-host.luna.akamaiapis.net").unwrap();
//! let transport = |_: &HttpRequest| -> Result<HttpResponse, TransportError> {
//!     Ok(HttpResponse::new(200, r#"{"csr": {"cn": "www.example.com"}}"#))
//! };
//! let client = Client::new(config, transport);
//! let enrollment = client
//!     .cps()
//!     .get_enrollment(GetEnrollmentRequest { enrollment_id: 1 })
//!     .unwrap();
//! assert_eq!(enrollment.csr.unwrap().cn, "www.example.com");
//! ```

pub mod client;
pub mod config;
pub mod cps;
pub mod datastream;
pub mod endpoint;
pub mod error;
pub mod firewall_rules;
pub mod http;
pub mod location;
pub mod validate;

#[cfg(test)]
mod testing;

pub use client::{Client, Transport};
pub use config::{Config, ConfigError};
pub use endpoint::{Api, Endpoint, MediaType, Operation, RequestSpec};
pub use error::{ApiError, Error, ErrorKind, LocationError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use location::id_from_location;
pub use validate::{Validate, ValidationErrors};
