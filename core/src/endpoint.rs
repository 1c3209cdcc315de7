//! Request descriptions shared by every API surface.
//!
//! # Design
//! Each request type implements [`Endpoint`]: it names its [`Operation`],
//! lists its success statuses, validates itself and describes its path,
//! query and media types as a [`RequestSpec`]. `Client` turns that
//! description into an absolute `HttpRequest` and decodes the response, so
//! the per-operation code carries no URL joining, query encoding or status
//! handling of its own.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use strum::Display;

use crate::error::{ErrorKind, TransportError};
use crate::http::HttpMethod;
use crate::validate::ValidationErrors;

/// The API family an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Api {
    #[strum(serialize = "CPS")]
    Cps,
    #[strum(serialize = "DataStream")]
    DataStream,
    #[strum(serialize = "Firewall Rules Manager")]
    FirewallRules,
}

/// Every operation, displayed as the sentinel that prefixes its errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Operation {
    #[strum(serialize = "fetching enrollments")]
    ListEnrollments,
    #[strum(serialize = "fetching enrollment")]
    GetEnrollment,
    #[strum(serialize = "create enrollment")]
    CreateEnrollment,
    #[strum(serialize = "update enrollment")]
    UpdateEnrollment,
    #[strum(serialize = "remove enrollment")]
    RemoveEnrollment,
    #[strum(serialize = "fetching change")]
    GetChangeStatus,
    #[strum(serialize = "canceling change")]
    CancelChange,
    #[strum(serialize = "get change management info")]
    GetChangeManagementInfo,
    #[strum(serialize = "get change deployment info")]
    GetChangeDeploymentInfo,
    #[strum(serialize = "acknowledging change management")]
    AcknowledgeChangeManagement,
    #[strum(serialize = "list deployments")]
    ListDeployments,
    #[strum(serialize = "get production deployment")]
    GetProductionDeployment,
    #[strum(serialize = "get staging deployment")]
    GetStagingDeployment,
    #[strum(serialize = "get deployment schedule")]
    GetDeploymentSchedule,
    #[strum(serialize = "update deployment schedule")]
    UpdateDeploymentSchedule,
    #[strum(serialize = "fetching change for lets-encrypt-challenges")]
    GetChangeLetsEncryptChallenges,
    #[strum(serialize = "acknowledging lets-encrypt-challenges")]
    AcknowledgeDvChallenges,
    #[strum(serialize = "get pre-verification warnings")]
    GetChangePreVerificationWarnings,
    #[strum(serialize = "acknowledging pre-verification warnings")]
    AcknowledgePreVerificationWarnings,
    #[strum(serialize = "get post-verification warnings")]
    GetChangePostVerificationWarnings,
    #[strum(serialize = "acknowledging post-verification warnings")]
    AcknowledgePostVerificationWarnings,
    #[strum(serialize = "get change third-party csr")]
    GetChangeThirdPartyCsr,
    #[strum(serialize = "upload third-party cert and trust chain")]
    UploadThirdPartyCertAndTrustChain,
    #[strum(serialize = "get dv history")]
    GetDvHistory,
    #[strum(serialize = "get certificate history")]
    GetCertificateHistory,
    #[strum(serialize = "get change history")]
    GetChangeHistory,

    #[strum(serialize = "creating stream")]
    CreateStream,
    #[strum(serialize = "fetching stream information")]
    GetStream,
    #[strum(serialize = "updating stream")]
    UpdateStream,
    #[strum(serialize = "deleting stream")]
    DeleteStream,
    #[strum(serialize = "listing streams")]
    ListStreams,
    #[strum(serialize = "activate stream")]
    ActivateStream,
    #[strum(serialize = "deactivate stream")]
    DeactivateStream,
    #[strum(serialize = "view activation history")]
    GetActivationHistory,
    #[strum(serialize = "get properties")]
    GetProperties,
    #[strum(serialize = "get dataset fields")]
    GetDatasetFields,

    #[strum(serialize = "list subscriptions")]
    ListSubscriptions,
    #[strum(serialize = "update subscriptions")]
    UpdateSubscriptions,
    #[strum(serialize = "list services")]
    ListServices,
    #[strum(serialize = "get service")]
    GetService,
    #[strum(serialize = "list cidr blocks")]
    ListCidrBlocks,
}

impl Operation {
    pub fn api(&self) -> Api {
        use Operation::*;
        match self {
            CreateStream | GetStream | UpdateStream | DeleteStream | ListStreams
            | ActivateStream | DeactivateStream | GetActivationHistory | GetProperties
            | GetDatasetFields => Api::DataStream,
            ListSubscriptions | UpdateSubscriptions | ListServices | GetService
            | ListCidrBlocks => Api::FirewallRules,
            _ => Api::Cps,
        }
    }
}

/// A value for the `Accept` or `Content-Type` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    Json,
    Vendor {
        api: &'static str,
        resource: &'static str,
        version: u32,
        charset: bool,
    },
}

impl MediaType {
    /// `application/vnd.akamai.<api>.<resource>.v<version>+json`
    pub const fn vendor(api: &'static str, resource: &'static str, version: u32) -> Self {
        MediaType::Vendor {
            api,
            resource,
            version,
            charset: false,
        }
    }

    /// The CPS vendor type for `resource` at `version`.
    pub const fn cps(resource: &'static str, version: u32) -> Self {
        Self::vendor("cps", resource, version)
    }

    /// Appends `; charset=utf-8`. No-op for plain JSON.
    pub const fn with_charset(self) -> Self {
        match self {
            MediaType::Vendor {
                api,
                resource,
                version,
                ..
            } => MediaType::Vendor {
                api,
                resource,
                version,
                charset: true,
            },
            MediaType::Json => MediaType::Json,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Json => f.write_str("application/json"),
            MediaType::Vendor {
                api,
                resource,
                version,
                charset,
            } => {
                write!(f, "application/vnd.akamai.{api}.{resource}.v{version}+json")?;
                if *charset {
                    f.write_str("; charset=utf-8")?;
                }
                Ok(())
            }
        }
    }
}

/// Method, relative path, query, media types and body of one request.
///
/// Paths are relative to the configured base URL and start with `/`.
/// Query keys are kept sorted so the encoded URL is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub query: BTreeMap<&'static str, String>,
    pub accept: MediaType,
    pub body: Option<(MediaType, String)>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            accept: MediaType::Json,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn accept(mut self, media: MediaType) -> Self {
        self.accept = media;
        self
    }

    /// Adds `key=value`.
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.insert(key, value.to_string());
        self
    }

    /// Adds `key=value` only when `value` is set.
    pub fn query_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Adds `key=true` only when `flag` is set.
    pub fn query_flag(self, key: &'static str, flag: bool) -> Self {
        if flag {
            self.query(key, true)
        } else {
            self
        }
    }

    /// Serializes `body` as the JSON payload sent with `content_type`.
    pub fn json<B: Serialize + ?Sized>(
        mut self,
        content_type: MediaType,
        body: &B,
    ) -> Result<Self, TransportError> {
        let encoded = serde_json::to_string(body).map_err(TransportError::Encode)?;
        self.body = Some((content_type, encoded));
        Ok(self)
    }
}

/// One API operation: its request shape, response type and status contract.
pub trait Endpoint {
    type Response: DeserializeOwned;

    const OPERATION: Operation;

    /// Statuses that count as success. Anything else decodes as a problem detail.
    const SUCCESS: &'static [u16];

    /// Normalizes the request before validation, e.g. stamping type tags.
    fn prepare(&mut self) {}

    fn validate(&self) -> Result<(), ValidationErrors>;

    fn request(&self) -> Result<RequestSpec, TransportError>;

    /// Post-processes a decoded success response.
    fn finish(&self, response: Self::Response) -> Result<Self::Response, ErrorKind> {
        Ok(response)
    }
}
