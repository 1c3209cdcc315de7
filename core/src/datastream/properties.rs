use serde::{Deserialize, Serialize};

use super::{DataSetField, Property, BASE};
use crate::endpoint::{Endpoint, Operation, RequestSpec};
use crate::error::TransportError;
use crate::validate::{required, Fields, ValidationErrors};

/// Properties of a group that a stream can collect logs from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetPropertiesRequest {
    pub group_id: i64,
}

impl Endpoint for GetPropertiesRequest {
    type Response = Vec<Property>;
    const OPERATION: Operation = Operation::GetProperties;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Fields::new()
            .check("group_id", required(&self.group_id))
            .finish()
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(format!("{BASE}/groups/{}/properties", self.group_id)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetDatasetFieldsRequest {
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSets {
    pub dataset_fields: Vec<DataSetField>,
}

impl Endpoint for GetDatasetFieldsRequest {
    type Response = DataSets;
    const OPERATION: Operation = Operation::GetDatasetFields;
    const SUCCESS: &'static [u16] = &[200];

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }

    fn request(&self) -> Result<RequestSpec, TransportError> {
        Ok(RequestSpec::get(format!("{BASE}/datasets-fields"))
            .query_opt("productId", self.product_id.as_deref()))
    }
}
