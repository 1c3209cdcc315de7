use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::{is_false, stream_path, Destination, DestinationDetails, STREAMS};
use crate::endpoint::{Endpoint, MediaType, Operation, RequestSpec};
use crate::error::TransportError;
use crate::validate::{
    at_least, blank_when, known, one_of, required, required_when, wire_enum, Fields, Validate,
    ValidationErrors, Violation,
};

wire_enum! {
    pub enum StreamStatus {
        Activated => "ACTIVATED",
        Deactivated => "DEACTIVATED",
        Activating => "ACTIVATING",
        Deactivating => "DEACTIVATING",
        Inactive => "INACTIVE",
    }
}

wire_enum! {
    pub enum FormatType {
        Structured => "STRUCTURED",
        Json => "JSON",
    }
}

wire_enum! {
    pub enum DelimiterType {
        Space => "SPACE",
    }
}

/// Seconds between uploads; the API accepts only these.
pub const DELIVERY_INTERVALS: [u32; 2] = [30, 60];

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// How log lines are formatted and how often files are delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryConfiguration {
    #[serde(rename = "fieldDelimiter", skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<DelimiterType>,
    pub format: FormatType,
    pub frequency: Frequency,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub upload_file_prefix: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub upload_file_suffix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Frequency {
    pub interval_in_seconds: u32,
}

impl DeliveryConfiguration {
    /// Create insists on a format; update only checks the one given.
    fn check(&self, require_format: bool) -> Result<(), ValidationErrors> {
        let structured = self.format == FormatType::Structured;
        let json = self.format == FormatType::Json;
        let delimiter = match &self.delimiter {
            Some(delimiter) if structured => {
                required(delimiter).and_then(|_| one_of(delimiter, &[DelimiterType::Space]))
            }
            delimiter => required_when(structured, delimiter).and_then(|_| blank_when(json, delimiter)),
        };
        let format = required_when(require_format, &self.format)
            .and_then(|_| known(&self.format))
            .and_then(|_| match self.delimiter {
                Some(_) if !structured => Err(Violation::NotAllowed),
                _ => Ok(()),
            });
        Fields::new()
            .check("delimiter", delimiter)
            .check("format", format)
            .check(
                "frequency.interval_in_seconds",
                required(&self.frequency.interval_in_seconds)
                    .and_then(|_| one_of(&self.frequency.interval_in_seconds, &DELIVERY_INTERVALS)),
            )
            .finish()
    }
}

impl Validate for DeliveryConfiguration {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.check(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetFieldId {
    pub dataset_field_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyId {
    pub property_id: i64,
}

/// The body of a create or update call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConfiguration {
    pub contract_id: String,
    #[serde(skip_serializing_if = "is_false")]
    pub collect_midgress: bool,
    pub dataset_fields: Vec<DatasetFieldId>,
    pub destination: Option<Destination>,
    pub delivery_configuration: DeliveryConfiguration,
    #[serde(skip_serializing_if = "is_zero")]
    pub group_id: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notification_emails: Vec<String>,
    pub properties: Vec<PropertyId>,
    pub stream_name: String,
}

impl StreamConfiguration {
    fn stamp(&mut self) {
        if let Some(destination) = &mut self.destination {
            destination.stamp();
        }
    }

    /// Everything except `group_id`, whose rule differs between create and
    /// update.
    fn check(&self, require_format: bool) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("contract_id", required(&self.contract_id))
            .check("dataset_fields", required(&self.dataset_fields))
            .check("destination", required(&self.destination))
            .nested("destination", self.destination.validate())
            .nested(
                "delivery_configuration",
                self.delivery_configuration.check(require_format),
            )
            .check("properties", required(&self.properties))
            .check("stream_name", required(&self.stream_name))
            .finish()
    }
}

impl Validate for StreamConfiguration {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.check(true)
    }
}

/// A stream version in full, as returned by create, get, update and the
/// activation calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailedStreamVersion {
    pub contract_id: String,
    pub created_by: String,
    pub created_date: String,
    pub collect_midgress: bool,
    pub dataset_fields: Vec<DataSetField>,
    pub delivery_configuration: DeliveryConfiguration,
    pub destination: DestinationDetails,
    pub group_id: i64,
    pub latest_version: i64,
    pub modified_by: String,
    pub modified_date: String,
    pub notification_emails: Vec<String>,
    pub product_id: String,
    pub properties: Vec<Property>,
    pub stream_id: i64,
    pub stream_name: String,
    pub stream_version: i64,
    pub stream_status: StreamStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSetField {
    pub dataset_field_id: i64,
    pub dataset_field_description: String,
    pub dataset_field_json_key: String,
    pub dataset_field_name: String,
    pub dataset_field_group: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    pub property_id: i64,
    pub property_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<String>,
}

/// One row of the stream list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamDetails {
    pub contract_id: String,
    pub created_by: String,
    pub created_date: String,
    pub group_id: i64,
    pub latest_version: i64,
    pub modified_by: String,
    pub modified_date: String,
    pub properties: Vec<Property>,
    pub product_id: String,
    pub stream_id: i64,
    pub stream_name: String,
    pub stream_status: StreamStatus,
    pub stream_version: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateStreamRequest {
    pub stream_configuration: StreamConfiguration,
    pub activate: bool,
}

impl Endpoint for CreateStreamRequest {
    type Response = DetailedStreamVersion;
    const OPERATION: Operation = Operation::CreateStream;
    const SUCCESS: &'static [u16] = &[201];

    fn prepare(&mut self) {
        self.stream_configuration.stamp();
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .nested("stream_configuration", self.stream_configuration.validate())
            .check(
                "stream_configuration.group_id",
                required(&self.stream_configuration.group_id)
                    .and_then(|_| at_least(self.stream_configuration.group_id, 1)),
            )
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        RequestSpec::post(STREAMS)
            .query("activate", self.activate)
            .json(MediaType::Json, &self.stream_configuration)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetStreamRequest {
    pub stream_id: i64,
    pub version: Option<i64>,
}

impl Endpoint for GetStreamRequest {
    type Response = DetailedStreamVersion;
    const OPERATION: Operation = Operation::GetStream;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("stream_id", required(&self.stream_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(stream_path(self.stream_id)).query_opt("version", self.version))
    }
}

/// Replaces a stream's configuration. `group_id` cannot change and must be
/// left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateStreamRequest {
    pub stream_id: i64,
    pub stream_configuration: StreamConfiguration,
    pub activate: bool,
}

impl Endpoint for UpdateStreamRequest {
    type Response = DetailedStreamVersion;
    const OPERATION: Operation = Operation::UpdateStream;
    const SUCCESS: &'static [u16] = &[200];

    fn prepare(&mut self) {
        self.stream_configuration.stamp();
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("stream_id", required(&self.stream_id))
            .nested("stream_configuration", self.stream_configuration.check(false))
            .check(
                "stream_configuration.group_id",
                blank_when(true, &self.stream_configuration.group_id),
            )
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        RequestSpec::put(stream_path(self.stream_id))
            .query("activate", self.activate)
            .json(MediaType::Json, &self.stream_configuration)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteStreamRequest {
    pub stream_id: i64,
}

impl Endpoint for DeleteStreamRequest {
    type Response = IgnoredAny;
    const OPERATION: Operation = Operation::DeleteStream;
    const SUCCESS: &'static [u16] = &[204];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("stream_id", required(&self.stream_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::delete(stream_path(self.stream_id)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListStreamsRequest {
    pub group_id: Option<i64>,
}

impl Endpoint for ListStreamsRequest {
    type Response = Vec<StreamDetails>;
    const OPERATION: Operation = Operation::ListStreams;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(STREAMS).query_opt("groupId", self.group_id))
    }
}
