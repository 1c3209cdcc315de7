//! DataStream2 streams and their activation history.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::{parse_body, require_content_type, Db, Problem};

const JSON: &str = "application/json";
const MODIFIED_BY: &str = "mock-user";
const MODIFIED_DATE: &str = "2021-03-09T12:00:00Z";

#[derive(Clone, Debug)]
pub struct Stream {
    /// The current version, shaped as GET returns it.
    pub detail: Map<String, Value>,
    pub history: Vec<Value>,
}

impl Stream {
    fn group_id(&self) -> Option<i64> {
        self.detail.get("groupId").and_then(Value::as_i64)
    }

    fn version(&self) -> i64 {
        self.detail
            .get("streamVersion")
            .and_then(Value::as_i64)
            .unwrap_or(1)
    }

    fn set_status(&mut self, stream_id: i64, status: &str) {
        self.detail.insert("streamStatus".into(), json!(status));
        self.history.push(json!({
            "modifiedBy": MODIFIED_BY,
            "modifiedDate": MODIFIED_DATE,
            "status": status,
            "streamId": stream_id,
            "streamVersion": self.version(),
        }));
    }
}

#[derive(Deserialize)]
struct ActivateQuery {
    #[serde(default)]
    activate: bool,
}

#[derive(Deserialize)]
struct GroupQuery {
    #[serde(rename = "groupId")]
    group_id: Option<i64>,
}

pub fn routes() -> Router<Db> {
    Router::new()
        .route(
            "/datastream-config-api/v2/log/streams",
            get(list_streams).post(create_stream),
        )
        .route(
            "/datastream-config-api/v2/log/streams/{stream_id}",
            get(get_stream).put(update_stream).delete(delete_stream),
        )
        .route(
            "/datastream-config-api/v2/log/streams/{stream_id}/activate",
            post(activate_stream),
        )
        .route(
            "/datastream-config-api/v2/log/streams/{stream_id}/deactivate",
            post(deactivate_stream),
        )
        .route(
            "/datastream-config-api/v2/log/streams/{stream_id}/activation-history",
            get(activation_history),
        )
}

fn stream_not_found(stream_id: i64) -> Problem {
    Problem::not_found(format!("stream {stream_id} does not exist"))
}

/// Collects every rejected field into one problem, like the real API does.
fn check_configuration(config: &Map<String, Value>, creating: bool) -> Result<(), Problem> {
    let mut errors = Vec::new();
    let blank = |key: &str| {
        config
            .get(key)
            .and_then(Value::as_str)
            .map_or(true, str::is_empty)
    };
    if blank("streamName") {
        errors.push("streamName is required".to_string());
    }
    if blank("contractId") {
        errors.push("contractId is required".to_string());
    }
    let destination_type = config
        .get("destination")
        .and_then(|destination| destination.get("destinationType"))
        .and_then(Value::as_str);
    if destination_type.map_or(true, str::is_empty) {
        errors.push("destination.destinationType is required".to_string());
    }
    let group_id = config.get("groupId").and_then(Value::as_i64);
    match (creating, group_id) {
        (true, None) => errors.push("groupId is required".to_string()),
        (false, Some(_)) => errors.push("groupId cannot be changed".to_string()),
        _ => {}
    }

    if errors.is_empty() {
        return Ok(());
    }
    Err(errors
        .into_iter()
        .fold(Problem::bad_request(""), |problem, detail| problem.with_error(detail)))
}

fn initial_status(activate: bool) -> &'static str {
    if activate {
        "ACTIVATING"
    } else {
        "INACTIVE"
    }
}

async fn create_stream(
    State(db): State<Db>,
    Query(query): Query<ActivateQuery>,
    headers: HeaderMap,
    body: String,
) -> Result<(StatusCode, Json<Value>), Problem> {
    require_content_type(&headers, JSON)?;
    let mut detail: Map<String, Value> = parse_body(&body)?;
    check_configuration(&detail, true)?;

    let mut store = db.write().await;
    let stream_id = store.next_id();
    detail.insert("streamId".into(), json!(stream_id));
    detail.insert("streamVersion".into(), json!(1));
    detail.insert("latestVersion".into(), json!(1));
    detail.insert("createdBy".into(), json!(MODIFIED_BY));
    detail.insert("createdDate".into(), json!(MODIFIED_DATE));
    detail.insert("modifiedBy".into(), json!(MODIFIED_BY));
    detail.insert("modifiedDate".into(), json!(MODIFIED_DATE));
    detail.insert("streamStatus".into(), json!(initial_status(query.activate)));

    let stream = Stream {
        detail,
        history: Vec::new(),
    };
    let response = Value::Object(stream.detail.clone());
    store.streams.insert(stream_id, stream);
    tracing::info!(stream_id, activate = query.activate, "stream created");
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_stream(
    State(db): State<Db>,
    Path(stream_id): Path<i64>,
    Query(query): Query<ActivateQuery>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, Problem> {
    require_content_type(&headers, JSON)?;
    let mut update: Map<String, Value> = parse_body(&body)?;
    check_configuration(&update, false)?;

    let mut store = db.write().await;
    let stream = store
        .streams
        .get_mut(&stream_id)
        .ok_or_else(|| stream_not_found(stream_id))?;
    let version = stream.version() + 1;
    for key in ["streamId", "groupId", "createdBy", "createdDate"] {
        if let Some(value) = stream.detail.get(key) {
            update.insert(key.into(), value.clone());
        }
    }
    update.insert("streamVersion".into(), json!(version));
    update.insert("latestVersion".into(), json!(version));
    update.insert("modifiedBy".into(), json!(MODIFIED_BY));
    update.insert("modifiedDate".into(), json!(MODIFIED_DATE));
    update.insert("streamStatus".into(), json!(initial_status(query.activate)));
    stream.detail = update;
    tracing::info!(stream_id, version, "stream updated");
    Ok(Json(Value::Object(stream.detail.clone())))
}

async fn get_stream(
    State(db): State<Db>,
    Path(stream_id): Path<i64>,
) -> Result<Json<Value>, Problem> {
    let store = db.read().await;
    let stream = store
        .streams
        .get(&stream_id)
        .ok_or_else(|| stream_not_found(stream_id))?;
    Ok(Json(Value::Object(stream.detail.clone())))
}

async fn delete_stream(
    State(db): State<Db>,
    Path(stream_id): Path<i64>,
) -> Result<StatusCode, Problem> {
    let mut store = db.write().await;
    store
        .streams
        .remove(&stream_id)
        .ok_or_else(|| stream_not_found(stream_id))?;
    tracing::info!(stream_id, "stream deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_streams(
    State(db): State<Db>,
    Query(query): Query<GroupQuery>,
) -> Json<Vec<Value>> {
    let store = db.read().await;
    let streams = store
        .streams
        .values()
        .filter(|stream| query.group_id.is_none() || stream.group_id() == query.group_id)
        .map(|stream| Value::Object(stream.detail.clone()))
        .collect();
    Json(streams)
}

async fn change_status(db: Db, stream_id: i64, status: &str) -> Result<Json<Value>, Problem> {
    let mut store = db.write().await;
    let stream = store
        .streams
        .get_mut(&stream_id)
        .ok_or_else(|| stream_not_found(stream_id))?;
    stream.set_status(stream_id, status);
    tracing::info!(stream_id, status, "stream status changed");
    Ok(Json(Value::Object(stream.detail.clone())))
}

async fn activate_stream(
    State(db): State<Db>,
    Path(stream_id): Path<i64>,
) -> Result<Json<Value>, Problem> {
    change_status(db, stream_id, "ACTIVATED").await
}

async fn deactivate_stream(
    State(db): State<Db>,
    Path(stream_id): Path<i64>,
) -> Result<Json<Value>, Problem> {
    change_status(db, stream_id, "DEACTIVATED").await
}

async fn activation_history(
    State(db): State<Db>,
    Path(stream_id): Path<i64>,
) -> Result<Json<Vec<Value>>, Problem> {
    let store = db.read().await;
    let stream = store
        .streams
        .get(&stream_id)
        .ok_or_else(|| stream_not_found(stream_id))?;
    Ok(Json(stream.history.iter().rev().cloned().collect()))
}
