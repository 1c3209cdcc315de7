//! Firewall Rules Manager operations under `/firewall-rules-manager/v1`.
//!
//! Lets a caller subscribe to notification lists for Akamai services and
//! read the CIDR blocks those services connect from.

use serde::{Deserialize, Serialize};

use crate::client::{Client, Transport};
use crate::endpoint::{Endpoint, MediaType, Operation, RequestSpec};
use crate::error::{Error, TransportError};
use crate::validate::{known, required, wire_enum, Fields, Validate, ValidationErrors};

const BASE: &str = "/firewall-rules-manager/v1";

wire_enum! {
    /// The most recent change to a CIDR block.
    pub enum LastAction {
        Add => "add",
        Update => "update",
        Delete => "delete",
    }
}

/// An email address subscribed to one service's CIDR changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subscription {
    pub service_id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub signup_date: String,
}

impl Validate for Subscription {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("service_id", required(&self.service_id))
            .check("email", required(&self.email))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscriptions {
    pub subscriptions: Vec<Subscription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub service_id: i64,
    pub service_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CidrBlock {
    pub cidr_id: i64,
    pub service_id: i64,
    pub service_name: String,
    pub cidr: String,
    pub cidr_mask: String,
    pub port: String,
    pub creation_date: String,
    pub effective_date: String,
    pub change_date: Option<String>,
    pub min_ip: String,
    pub max_ip: String,
    pub last_action: LastAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSubscriptionsRequest;

impl Endpoint for ListSubscriptionsRequest {
    type Response = Subscriptions;
    const OPERATION: Operation = Operation::ListSubscriptions;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(format!("{BASE}/subscriptions")))
    }
}

/// Replaces the caller's whole subscription list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSubscriptionsRequest {
    pub subscriptions: Vec<Subscription>,
}

impl Endpoint for UpdateSubscriptionsRequest {
    type Response = Subscriptions;
    const OPERATION: Operation = Operation::UpdateSubscriptions;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .each("subscriptions", &self.subscriptions)
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        #[derive(Serialize)]
        struct Body<'a> {
            subscriptions: &'a [Subscription],
        }

        RequestSpec::put(format!("{BASE}/subscriptions")).json(
            MediaType::Json,
            &Body {
                subscriptions: &self.subscriptions,
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListServicesRequest;

impl Endpoint for ListServicesRequest {
    type Response = Vec<Service>;
    const OPERATION: Operation = Operation::ListServices;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(format!("{BASE}/services")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetServiceRequest {
    pub service_id: i64,
}

impl Endpoint for GetServiceRequest {
    type Response = Service;
    const OPERATION: Operation = Operation::GetService;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("service_id", required(&self.service_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(format!("{BASE}/services/{}", self.service_id)))
    }
}

/// Filters are optional; `effective_date_gt` is a `YYYY-MM-DD` date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCidrBlocksRequest {
    pub effective_date_gt: Option<String>,
    pub last_action: Option<LastAction>,
}

impl Endpoint for ListCidrBlocksRequest {
    type Response = Vec<CidrBlock>;
    const OPERATION: Operation = Operation::ListCidrBlocks;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("last_action", self.last_action.as_ref().map_or(Ok(()), known))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(format!("{BASE}/cidr-blocks"))
            .query_opt("effectiveDateGt", self.effective_date_gt.as_deref())
            .query_opt("lastAction", self.last_action.as_ref()))
    }
}

/// Firewall Rules Manager operations bound to a client.
#[derive(Debug)]
pub struct FirewallRules<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> FirewallRules<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    pub fn list_subscriptions(&self) -> Result<Subscriptions, Error> {
        self.client.execute(ListSubscriptionsRequest)
    }

    pub fn update_subscriptions(&self, params: UpdateSubscriptionsRequest) -> Result<Subscriptions, Error> {
        self.client.execute(params)
    }

    pub fn list_services(&self) -> Result<Vec<Service>, Error> {
        self.client.execute(ListServicesRequest)
    }

    pub fn get_service(&self, params: GetServiceRequest) -> Result<Service, Error> {
        self.client.execute(params)
    }

    pub fn list_cidr_blocks(&self, params: ListCidrBlocksRequest) -> Result<Vec<CidrBlock>, Error> {
        self.client.execute(params)
    }
}
