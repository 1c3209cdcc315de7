//! Log delivery destinations.
//!
//! A stream's `destination` is one of several connector shapes. Each
//! connector carries a `destinationType` tag; [`Destination::stamp`] writes
//! the right tag before validation so callers may leave it unset.

use serde::{Deserialize, Serialize};

use super::is_false;
use crate::validate::{
    header_name, known, one_of, required, required_when, wire_enum, Blank, Fields, Validate,
    ValidationErrors, Violation,
};

wire_enum! {
    pub enum DestinationType {
        S3 => "S3",
        Azure => "AZURE",
        Datadog => "DATADOG",
        Splunk => "SPLUNK",
        Gcs => "GCS",
        Https => "HTTPS",
        SumoLogic => "SUMO_LOGIC",
        Oracle => "Oracle_Cloud_Storage",
        Loggly => "LOGGLY",
    }
}

wire_enum! {
    /// Authentication used by a custom HTTPS endpoint.
    pub enum AuthenticationType {
        None => "NONE",
        Basic => "BASIC",
    }
}

fn tagged(value: &DestinationType, expected: DestinationType) -> Result<(), Violation> {
    required(value).and_then(|_| one_of(value, &[expected]))
}

/// Header name and value travel together; the name must be a header token.
fn custom_header(fields: Fields, name: &str, value: &str) -> Fields {
    fields
        .check(
            "custom_header_name",
            required_when(!value.is_blank(), name).and_then(|_| header_name(name)),
        )
        .check("custom_header_value", required_when(!name.is_blank(), value))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Connector {
    pub destination_type: DestinationType,
    pub access_key: String,
    pub bucket: String,
    pub display_name: String,
    pub path: String,
    pub region: String,
    pub secret_access_key: String,
}

impl Validate for S3Connector {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("destination_type", tagged(&self.destination_type, DestinationType::S3))
            .check("access_key", required(&self.access_key))
            .check("bucket", required(&self.bucket))
            .check("display_name", required(&self.display_name))
            .check("path", required(&self.path))
            .check("region", required(&self.region))
            .check("secret_access_key", required(&self.secret_access_key))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureConnector {
    pub destination_type: DestinationType,
    pub access_key: String,
    pub account_name: String,
    pub display_name: String,
    pub container_name: String,
    pub path: String,
}

impl Validate for AzureConnector {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("destination_type", tagged(&self.destination_type, DestinationType::Azure))
            .check("access_key", required(&self.access_key))
            .check("account_name", required(&self.account_name))
            .check("display_name", required(&self.display_name))
            .check("container_name", required(&self.container_name))
            .check("path", required(&self.path))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatadogConnector {
    pub destination_type: DestinationType,
    pub auth_token: String,
    pub compress_logs: bool,
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
    pub endpoint: String,
}

impl Validate for DatadogConnector {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("destination_type", tagged(&self.destination_type, DestinationType::Datadog))
            .check("auth_token", required(&self.auth_token))
            .check("display_name", required(&self.display_name))
            .check("endpoint", required(&self.endpoint))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplunkConnector {
    pub destination_type: DestinationType,
    pub compress_logs: bool,
    pub display_name: String,
    pub event_collector_token: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_header_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_header_value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tls_hostname: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ca_cert: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub client_cert: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub client_key: String,
}

impl Validate for SplunkConnector {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let fields = Fields::new()
            .check("destination_type", tagged(&self.destination_type, DestinationType::Splunk))
            .check("display_name", required(&self.display_name))
            .check("event_collector_token", required(&self.event_collector_token))
            .check("endpoint", required(&self.endpoint));
        custom_header(fields, &self.custom_header_name, &self.custom_header_value).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcsConnector {
    pub destination_type: DestinationType,
    pub bucket: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    pub private_key: String,
    pub project_id: String,
    pub service_account_name: String,
}

impl Validate for GcsConnector {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("destination_type", tagged(&self.destination_type, DestinationType::Gcs))
            .check("bucket", required(&self.bucket))
            .check("display_name", required(&self.display_name))
            .check("private_key", required(&self.private_key))
            .check("project_id", required(&self.project_id))
            .check("service_account_name", required(&self.service_account_name))
            .finish()
    }
}

/// A custom HTTPS endpoint. `BASIC` authentication needs both credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomHttpsConnector {
    pub destination_type: DestinationType,
    pub authentication_type: AuthenticationType,
    pub compress_logs: bool,
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_header_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_header_value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tls_hostname: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ca_cert: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub client_cert: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub client_key: String,
}

impl Validate for CustomHttpsConnector {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let basic = self.authentication_type == AuthenticationType::Basic;
        let fields = Fields::new()
            .check("destination_type", tagged(&self.destination_type, DestinationType::Https))
            .check(
                "authentication_type",
                required(&self.authentication_type).and_then(|_| known(&self.authentication_type)),
            )
            .check("display_name", required(&self.display_name))
            .check("endpoint", required(&self.endpoint))
            .check("user_name", required_when(basic, &self.user_name))
            .check("password", required_when(basic, &self.password));
        custom_header(fields, &self.custom_header_name, &self.custom_header_value).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SumoLogicConnector {
    pub destination_type: DestinationType,
    pub collector_code: String,
    pub compress_logs: bool,
    pub display_name: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_header_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_header_value: String,
}

impl Validate for SumoLogicConnector {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let fields = Fields::new()
            .check("destination_type", tagged(&self.destination_type, DestinationType::SumoLogic))
            .check("collector_code", required(&self.collector_code))
            .check("display_name", required(&self.display_name))
            .check("endpoint", required(&self.endpoint));
        custom_header(fields, &self.custom_header_name, &self.custom_header_value).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleCloudStorageConnector {
    pub destination_type: DestinationType,
    pub access_key: String,
    pub bucket: String,
    pub display_name: String,
    pub namespace: String,
    pub path: String,
    pub region: String,
    pub secret_access_key: String,
}

impl Validate for OracleCloudStorageConnector {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("destination_type", tagged(&self.destination_type, DestinationType::Oracle))
            .check("access_key", required(&self.access_key))
            .check("bucket", required(&self.bucket))
            .check("display_name", required(&self.display_name))
            .check("namespace", required(&self.namespace))
            .check("path", required(&self.path))
            .check("region", required(&self.region))
            .check("secret_access_key", required(&self.secret_access_key))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogglyConnector {
    pub destination_type: DestinationType,
    pub display_name: String,
    pub endpoint: String,
    pub auth_token: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_header_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_header_value: String,
}

impl Validate for LogglyConnector {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let fields = Fields::new()
            .check("destination_type", tagged(&self.destination_type, DestinationType::Loggly))
            .check("display_name", required(&self.display_name))
            .check("endpoint", required(&self.endpoint))
            .check("auth_token", required(&self.auth_token));
        custom_header(fields, &self.custom_header_name, &self.custom_header_value).finish()
    }
}

/// The connector a stream delivers to. Serializes as the bare connector
/// object; the tag lives in its `destinationType` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Destination {
    S3(S3Connector),
    Azure(AzureConnector),
    Datadog(DatadogConnector),
    Splunk(SplunkConnector),
    Gcs(GcsConnector),
    Https(CustomHttpsConnector),
    SumoLogic(SumoLogicConnector),
    Oracle(OracleCloudStorageConnector),
    Loggly(LogglyConnector),
}

impl Destination {
    pub fn destination_type(&self) -> DestinationType {
        match self {
            Destination::S3(_) => DestinationType::S3,
            Destination::Azure(_) => DestinationType::Azure,
            Destination::Datadog(_) => DestinationType::Datadog,
            Destination::Splunk(_) => DestinationType::Splunk,
            Destination::Gcs(_) => DestinationType::Gcs,
            Destination::Https(_) => DestinationType::Https,
            Destination::SumoLogic(_) => DestinationType::SumoLogic,
            Destination::Oracle(_) => DestinationType::Oracle,
            Destination::Loggly(_) => DestinationType::Loggly,
        }
    }

    /// Writes the variant's tag into the connector. Idempotent.
    pub fn stamp(&mut self) {
        let tag = self.destination_type();
        let slot = match self {
            Destination::S3(c) => &mut c.destination_type,
            Destination::Azure(c) => &mut c.destination_type,
            Destination::Datadog(c) => &mut c.destination_type,
            Destination::Splunk(c) => &mut c.destination_type,
            Destination::Gcs(c) => &mut c.destination_type,
            Destination::Https(c) => &mut c.destination_type,
            Destination::SumoLogic(c) => &mut c.destination_type,
            Destination::Oracle(c) => &mut c.destination_type,
            Destination::Loggly(c) => &mut c.destination_type,
        };
        *slot = tag;
    }
}

impl Validate for Destination {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Destination::S3(c) => c.validate(),
            Destination::Azure(c) => c.validate(),
            Destination::Datadog(c) => c.validate(),
            Destination::Splunk(c) => c.validate(),
            Destination::Gcs(c) => c.validate(),
            Destination::Https(c) => c.validate(),
            Destination::SumoLogic(c) => c.validate(),
            Destination::Oracle(c) => c.validate(),
            Destination::Loggly(c) => c.validate(),
        }
    }
}

macro_rules! into_destination {
    ($($connector:ident => $variant:ident),+ $(,)?) => {
        $(impl From<$connector> for Destination {
            fn from(connector: $connector) -> Self {
                Destination::$variant(connector)
            }
        })+
    };
}

into_destination! {
    S3Connector => S3,
    AzureConnector => Azure,
    DatadogConnector => Datadog,
    SplunkConnector => Splunk,
    GcsConnector => Gcs,
    CustomHttpsConnector => Https,
    SumoLogicConnector => SumoLogic,
    OracleCloudStorageConnector => Oracle,
    LogglyConnector => Loggly,
}

/// A stream's destination as the API reports it: one flat object holding
/// every connector's non-secret settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DestinationDetails {
    pub authentication_type: AuthenticationType,
    #[serde(skip_serializing_if = "is_false")]
    pub compress_logs: bool,
    pub destination_type: DestinationType,
    pub display_name: String,
    pub path: String,
    pub endpoint: String,
    pub index_name: String,
    pub service_account_name: String,
    pub project_id: String,
    pub service: String,
    pub bucket: String,
    pub tags: String,
    pub region: String,
    pub account_name: String,
    pub namespace: String,
    pub container_name: String,
    pub source: String,
    pub content_type: String,
    pub custom_header_name: String,
    pub custom_header_value: String,
    pub tls_hostname: String,
    #[serde(rename = "mTLS")]
    pub m_tls: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn https() -> CustomHttpsConnector {
        CustomHttpsConnector {
            authentication_type: AuthenticationType::None,
            display_name: "endpoint".to_string(),
            endpoint: "https://logs.example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn stamp_sets_tag_and_is_idempotent() {
        let mut destination = Destination::from(https());
        destination.stamp();
        destination.stamp();
        let Destination::Https(connector) = &destination else {
            panic!("variant changed");
        };
        assert_eq!(connector.destination_type, DestinationType::Https);
        assert!(destination.validate().is_ok());
    }

    #[test]
    fn stamp_overwrites_a_wrong_tag() {
        let mut destination = Destination::S3(S3Connector {
            destination_type: DestinationType::Azure,
            ..Default::default()
        });
        destination.stamp();
        let json = serde_json::to_value(&destination).unwrap();
        assert_eq!(json["destinationType"], "S3");
    }

    #[test]
    fn unstamped_connector_fails_validation() {
        let err = Destination::from(https()).validate().unwrap_err();
        assert_eq!(err.get("destination_type"), Some(&Violation::Blank));
    }

    #[test]
    fn basic_auth_needs_credentials() {
        let mut destination = Destination::from(CustomHttpsConnector {
            authentication_type: AuthenticationType::Basic,
            ..https()
        });
        destination.stamp();
        let err = destination.validate().unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["password", "user_name"]);
    }

    #[test]
    fn unknown_authentication_type_is_rejected() {
        let mut destination = Destination::from(CustomHttpsConnector {
            authentication_type: AuthenticationType::from("DIGEST"),
            ..https()
        });
        destination.stamp();
        let err = destination.validate().unwrap_err();
        assert_eq!(err.get("authentication_type"), Some(&Violation::NotAllowed));
    }

    #[test]
    fn custom_header_name_and_value_travel_together() {
        let mut destination = Destination::from(SumoLogicConnector {
            collector_code: "code".to_string(),
            display_name: "sumo".to_string(),
            endpoint: "https://sumo.example.com".to_string(),
            custom_header_value: "secret".to_string(),
            ..Default::default()
        });
        destination.stamp();
        let err = destination.validate().unwrap_err();
        assert_eq!(err.to_string(), "custom_header_name: cannot be blank");

        let mut destination = Destination::from(LogglyConnector {
            display_name: "loggly".to_string(),
            endpoint: "https://loggly.example.com".to_string(),
            auth_token: "token".to_string(),
            custom_header_name: "X Token".to_string(),
            ..Default::default()
        });
        destination.stamp();
        let err = destination.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "custom_header_name: must be in a valid format; custom_header_value: cannot be blank"
        );
    }

    #[test]
    fn optional_connector_fields_are_omitted() {
        let mut destination = Destination::from(DatadogConnector {
            auth_token: "token".to_string(),
            display_name: "dd".to_string(),
            endpoint: "https://http-intake.logs.datadoghq.com/v1/input/".to_string(),
            ..Default::default()
        });
        destination.stamp();
        assert_eq!(
            serde_json::to_string(&destination).unwrap(),
            r#"{"destinationType":"DATADOG","authToken":"token","compressLogs":false,"displayName":"dd","endpoint":"https://http-intake.logs.datadoghq.com/v1/input/"}"#
        );
    }

    #[test]
    fn oracle_tag_keeps_its_mixed_case() {
        assert_eq!(DestinationType::Oracle.as_str(), "Oracle_Cloud_Storage");
        assert_eq!(
            DestinationType::from("Oracle_Cloud_Storage"),
            DestinationType::Oracle
        );
    }

    #[test]
    fn details_omit_compress_logs_when_off() {
        let off = serde_json::to_value(DestinationDetails::default()).unwrap();
        assert!(off.get("compressLogs").is_none());

        let on = serde_json::to_value(DestinationDetails {
            compress_logs: true,
            ..DestinationDetails::default()
        })
        .unwrap();
        assert_eq!(on["compressLogs"], true);
    }
}
