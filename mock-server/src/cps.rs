//! CPS enrollments and their pending changes.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::{parse_body, require_content_type, Db, Problem};

pub const ENROLLMENT: &str = "application/vnd.akamai.cps.enrollment.v9+json";
pub const ACKNOWLEDGEMENT: &str = "application/vnd.akamai.cps.acknowledgement.v1+json; charset=utf-8";
pub const DEPLOYMENT_SCHEDULE: &str = "application/vnd.akamai.cps.deployment-schedule.v1+json; charset=utf-8";

const DV_HISTORY_OUTAGE: &str = "<html><head><title>503 Service Unavailable</title></head>\
<body><h1>Service Unavailable</h1></body></html>";

#[derive(Clone, Debug)]
pub struct Enrollment {
    pub contract_id: String,
    pub body: Map<String, Value>,
    pub change: Option<PendingChange>,
}

/// The single change CPS opens when an enrollment is created.
#[derive(Clone, Debug)]
pub struct PendingChange {
    pub id: i64,
    pub acknowledged: bool,
    pub schedule: Value,
}

#[derive(Deserialize)]
struct ContractQuery {
    #[serde(rename = "contractId")]
    contract_id: Option<String>,
}

#[derive(Deserialize)]
struct Acknowledgement {
    acknowledgement: String,
}

pub fn routes() -> Router<Db> {
    Router::new()
        .route("/cps/v2/enrollments", get(list_enrollments).post(create_enrollment))
        .route(
            "/cps/v2/enrollments/{enrollment_id}",
            get(get_enrollment).delete(remove_enrollment),
        )
        .route("/cps/v2/enrollments/{enrollment_id}/dv-history", get(dv_history))
        .route(
            "/cps/v2/enrollments/{enrollment_id}/changes/{change_id}",
            get(get_change).delete(cancel_change),
        )
        .route(
            "/cps/v2/enrollments/{enrollment_id}/changes/{change_id}/deployment-schedule",
            get(get_deployment_schedule).put(update_deployment_schedule),
        )
        .route(
            "/cps/v2/enrollments/{enrollment_id}/changes/{change_id}/input/update/change-management-ack",
            post(acknowledge_change_management),
        )
}

fn enrollment_link(enrollment_id: i64) -> String {
    format!("/cps/v2/enrollments/{enrollment_id}")
}

fn change_link(enrollment_id: i64, change_id: i64) -> String {
    format!("/cps/v2/enrollments/{enrollment_id}/changes/{change_id}")
}

fn enrollment_not_found(enrollment_id: i64) -> Problem {
    Problem::not_found(format!("enrollment {enrollment_id} does not exist"))
}

fn pending_change(enrollment: &mut Enrollment, enrollment_id: i64, change_id: i64) -> Result<&mut PendingChange, Problem> {
    enrollment
        .change
        .as_mut()
        .filter(|change| change.id == change_id)
        .ok_or_else(|| Problem::not_found(format!("change {change_id} of enrollment {enrollment_id} does not exist")))
}

fn contract(query: ContractQuery) -> Result<String, Problem> {
    query
        .contract_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Problem::bad_request("").with_error("contractId is required"))
}

/// The enrollment as GET returns it: the stored body plus server-owned links.
fn render(enrollment_id: i64, enrollment: &Enrollment) -> Value {
    let mut body = enrollment.body.clone();
    body.insert("location".into(), json!(enrollment_link(enrollment_id)));
    let pending: Vec<String> = enrollment
        .change
        .iter()
        .map(|change| change_link(enrollment_id, change.id))
        .collect();
    body.insert("pendingChanges".into(), json!(pending));
    Value::Object(body)
}

fn change_status(enrollment_id: i64, change: &PendingChange) -> Value {
    let link = change_link(enrollment_id, change.id);
    if change.acknowledged {
        return json!({
            "statusInfo": {
                "status": "wait-review-cert-deployment",
                "state": "running",
                "description": "Change management acknowledged; deploying.",
                "deploymentSchedule": change.schedule,
            },
            "allowedInput": [],
        });
    }
    json!({
        "statusInfo": {
            "status": "wait-ack-change-management",
            "state": "awaiting-input",
            "description": "Waiting for change management acknowledgement.",
            "deploymentSchedule": change.schedule,
        },
        "allowedInput": [{
            "type": "change-management-info",
            "requiredToProceed": true,
            "info": format!("{link}/input/info/change-management-info"),
            "update": format!("{link}/input/update/change-management-ack"),
        }],
    })
}

async fn list_enrollments(
    State(db): State<Db>,
    Query(query): Query<ContractQuery>,
) -> Result<Json<Value>, Problem> {
    let contract_id = contract(query)?;
    let store = db.read().await;
    let enrollments: Vec<Value> = store
        .enrollments
        .iter()
        .filter(|(_, enrollment)| enrollment.contract_id == contract_id)
        .map(|(id, enrollment)| render(*id, enrollment))
        .collect();
    Ok(Json(json!({ "enrollments": enrollments })))
}

async fn create_enrollment(
    State(db): State<Db>,
    Query(query): Query<ContractQuery>,
    headers: HeaderMap,
    body: String,
) -> Result<(StatusCode, Json<Value>), Problem> {
    require_content_type(&headers, ENROLLMENT)?;
    let contract_id = contract(query)?;
    let body: Map<String, Value> = parse_body(&body)?;
    let has_cn = body
        .get("csr")
        .and_then(|csr| csr.get("cn"))
        .and_then(Value::as_str)
        .is_some_and(|cn| !cn.is_empty());
    if !has_cn {
        return Err(Problem::bad_request("").with_error("csr.cn is required"));
    }

    let mut store = db.write().await;
    let enrollment_id = store.next_id();
    let change_id = store.next_id();
    store.enrollments.insert(
        enrollment_id,
        Enrollment {
            contract_id,
            body,
            change: Some(PendingChange {
                id: change_id,
                acknowledged: false,
                schedule: json!({}),
            }),
        },
    );
    tracing::info!(enrollment_id, change_id, "enrollment created");

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "enrollment": enrollment_link(enrollment_id),
            "changes": [change_link(enrollment_id, change_id)],
        })),
    ))
}

async fn get_enrollment(
    State(db): State<Db>,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<Value>, Problem> {
    let store = db.read().await;
    let enrollment = store
        .enrollments
        .get(&enrollment_id)
        .ok_or_else(|| enrollment_not_found(enrollment_id))?;
    Ok(Json(render(enrollment_id, enrollment)))
}

async fn remove_enrollment(
    State(db): State<Db>,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<Value>, Problem> {
    let mut store = db.write().await;
    store
        .enrollments
        .remove(&enrollment_id)
        .ok_or_else(|| enrollment_not_found(enrollment_id))?;
    tracing::info!(enrollment_id, "enrollment removed");
    Ok(Json(json!({
        "enrollment": enrollment_link(enrollment_id),
        "changes": [],
    })))
}

async fn get_change(
    State(db): State<Db>,
    Path((enrollment_id, change_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, Problem> {
    let mut store = db.write().await;
    let enrollment = store
        .enrollments
        .get_mut(&enrollment_id)
        .ok_or_else(|| enrollment_not_found(enrollment_id))?;
    let change = pending_change(enrollment, enrollment_id, change_id)?;
    Ok(Json(change_status(enrollment_id, change)))
}

async fn cancel_change(
    State(db): State<Db>,
    Path((enrollment_id, change_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, Problem> {
    let mut store = db.write().await;
    let enrollment = store
        .enrollments
        .get_mut(&enrollment_id)
        .ok_or_else(|| enrollment_not_found(enrollment_id))?;
    pending_change(enrollment, enrollment_id, change_id)?;
    enrollment.change = None;
    tracing::info!(enrollment_id, change_id, "change cancelled");
    Ok(Json(json!({ "change": change_link(enrollment_id, change_id) })))
}

async fn get_deployment_schedule(
    State(db): State<Db>,
    Path((enrollment_id, change_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, Problem> {
    let mut store = db.write().await;
    let enrollment = store
        .enrollments
        .get_mut(&enrollment_id)
        .ok_or_else(|| enrollment_not_found(enrollment_id))?;
    let change = pending_change(enrollment, enrollment_id, change_id)?;
    Ok(Json(change.schedule.clone()))
}

async fn update_deployment_schedule(
    State(db): State<Db>,
    Path((enrollment_id, change_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, Problem> {
    require_content_type(&headers, DEPLOYMENT_SCHEDULE)?;
    let schedule: Map<String, Value> = parse_body(&body)?;

    let mut store = db.write().await;
    let enrollment = store
        .enrollments
        .get_mut(&enrollment_id)
        .ok_or_else(|| enrollment_not_found(enrollment_id))?;
    let change = pending_change(enrollment, enrollment_id, change_id)?;
    change.schedule = Value::Object(schedule);
    tracing::info!(enrollment_id, change_id, "deployment schedule updated");
    Ok(Json(json!({ "change": change_link(enrollment_id, change_id) })))
}

async fn acknowledge_change_management(
    State(db): State<Db>,
    Path((enrollment_id, change_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, Problem> {
    require_content_type(&headers, ACKNOWLEDGEMENT)?;
    let ack: Acknowledgement = parse_body(&body)?;

    let mut store = db.write().await;
    let enrollment = store
        .enrollments
        .get_mut(&enrollment_id)
        .ok_or_else(|| enrollment_not_found(enrollment_id))?;
    let change = pending_change(enrollment, enrollment_id, change_id)?;
    match ack.acknowledgement.as_str() {
        "acknowledge" => change.acknowledged = true,
        "deny" => enrollment.change = None,
        other => {
            return Err(Problem::bad_request("").with_error(format!("unknown acknowledgement {other:?}")));
        }
    }
    tracing::info!(enrollment_id, change_id, acknowledgement = %ack.acknowledgement, "change management answered");
    Ok(Json(json!({ "change": change_link(enrollment_id, change_id) })))
}

/// Always fails the way an overloaded edge does: an HTML page, not JSON.
async fn dv_history(Path(enrollment_id): Path<i64>) -> (StatusCode, Html<&'static str>) {
    tracing::warn!(enrollment_id, "dv-history unavailable");
    (StatusCode::SERVICE_UNAVAILABLE, Html(DV_HISTORY_OUTAGE))
}
