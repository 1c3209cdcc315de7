//! DataStream2 operations under `/datastream-config-api/v2/log`.
//!
//! All calls exchange plain `application/json`. Create and update stamp the
//! destination's `destinationType` before validating.

use crate::client::{Client, Transport};
use crate::endpoint::Endpoint;
use crate::error::Error;

mod activation;
mod destination;
mod properties;
mod stream;

pub use activation::*;
pub use destination::*;
pub use properties::*;
pub use stream::*;

const BASE: &str = "/datastream-config-api/v2/log";
const STREAMS: &str = "/datastream-config-api/v2/log/streams";

fn stream_path(stream_id: i64) -> String {
    format!("{STREAMS}/{stream_id}")
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// DataStream operations bound to a client.
#[derive(Debug)]
pub struct DataStream<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> DataStream<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    fn run<E: Endpoint>(&self, endpoint: E) -> Result<E::Response, Error> {
        self.client.execute(endpoint)
    }

    pub fn create_stream(&self, params: CreateStreamRequest) -> Result<DetailedStreamVersion, Error> {
        self.run(params)
    }

    pub fn get_stream(&self, params: GetStreamRequest) -> Result<DetailedStreamVersion, Error> {
        self.run(params)
    }

    pub fn update_stream(&self, params: UpdateStreamRequest) -> Result<DetailedStreamVersion, Error> {
        self.run(params)
    }

    pub fn delete_stream(&self, params: DeleteStreamRequest) -> Result<(), Error> {
        self.run(params).map(drop)
    }

    pub fn list_streams(&self, params: ListStreamsRequest) -> Result<Vec<StreamDetails>, Error> {
        self.run(params)
    }

    pub fn activate_stream(&self, params: ActivateStreamRequest) -> Result<DetailedStreamVersion, Error> {
        self.run(params)
    }

    pub fn deactivate_stream(&self, params: DeactivateStreamRequest) -> Result<DetailedStreamVersion, Error> {
        self.run(params)
    }

    pub fn get_activation_history(
        &self,
        params: GetActivationHistoryRequest,
    ) -> Result<Vec<ActivationHistoryEntry>, Error> {
        self.run(params)
    }

    pub fn get_properties(&self, params: GetPropertiesRequest) -> Result<Vec<Property>, Error> {
        self.run(params)
    }

    pub fn get_dataset_fields(&self, params: GetDatasetFieldsRequest) -> Result<DataSets, Error> {
        self.run(params)
    }
}
