//! In-memory widget service speaking the CRUD controller contract.
//!
//! # Design
//! Mirrors what a CRUD controller mounted at `/api/widgets` answers: 201 with
//! a `Location` header and no body on create, the id on update, 204 on delete
//! and 400 when there was nothing to delete. Invalid dtos get a 400 with a
//! validation result body. `/api/faults/*` routes produce the failure shapes
//! clients must cope with. The wire types are defined here independently of
//! the client crate so integration tests catch drift.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

pub const WIDGETS_PATH: &str = "/api/widgets";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub field_errors: Vec<FieldError>,
    pub global_errors: Vec<GlobalError>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_name: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GlobalError {
    pub message: String,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WidgetPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Widget>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(WIDGETS_PATH, get(get_all).post(create).put(update))
        .route("/api/widgets/search", get(search))
        .route("/api/widgets/{id}", get(get_by_id).patch(patch).delete(delete))
        .route("/api/faults/internal", get(internal_error))
        .route("/api/faults/problem", get(problem_json))
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

fn validate(widget: &Widget) -> Result<(), ValidationResult> {
    let mut result = ValidationResult::default();
    if widget.name.trim().is_empty() {
        result.field_errors.push(FieldError {
            field_name: "name".to_string(),
            message: "required".to_string(),
        });
    }
    if result.field_errors.is_empty() && result.global_errors.is_empty() {
        Ok(())
    } else {
        Err(result)
    }
}

fn invalid(result: ValidationResult) -> Response {
    (StatusCode::BAD_REQUEST, Json(result)).into_response()
}

async fn get_all(State(db): State<Db>) -> Json<Vec<Widget>> {
    let widgets = db.read().await;
    let mut all: Vec<Widget> = widgets.values().cloned().collect();
    all.sort_by(|a, b| a.name.cmp(&b.name));
    Json(all)
}

async fn search(State(db): State<Db>, Query(params): Query<SearchParams>) -> Json<Vec<Widget>> {
    let widgets = db.read().await;
    let needle = params.name.unwrap_or_default();
    let mut found: Vec<Widget> = widgets
        .values()
        .filter(|w| w.name.contains(&needle))
        .cloned()
        .collect();
    found.sort_by(|a, b| a.name.cmp(&b.name));
    Json(found)
}

async fn get_by_id(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let widgets = db.read().await;
    match widgets.get(&id) {
        Some(widget) => Json(widget.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, format!("widget {id} not found")).into_response(),
    }
}

async fn create(State(db): State<Db>, Json(mut input): Json<Widget>) -> Response {
    if let Err(result) = validate(&input) {
        return invalid(result);
    }
    let id = Uuid::new_v4();
    input.id = Some(id);
    db.write().await.insert(id, input);
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("{WIDGETS_PATH}/{id}"))],
    )
        .into_response()
}

async fn update(State(db): State<Db>, Json(input): Json<Widget>) -> Response {
    let Some(id) = input.id else {
        let mut result = ValidationResult::default();
        result.global_errors.push(GlobalError {
            message: "id is required for update".to_string(),
        });
        return invalid(result);
    };
    if let Err(result) = validate(&input) {
        return invalid(result);
    }
    let mut widgets = db.write().await;
    match widgets.get_mut(&id) {
        Some(widget) => {
            *widget = input;
            Json(id).into_response()
        }
        None => (StatusCode::NOT_FOUND, format!("widget {id} not found")).into_response(),
    }
}

async fn patch(State(db): State<Db>, Path(id): Path<Uuid>, Json(changes): Json<WidgetPatch>) -> Response {
    let mut widgets = db.write().await;
    let Some(widget) = widgets.get_mut(&id) else {
        return (StatusCode::NOT_FOUND, format!("widget {id} not found")).into_response();
    };
    let mut patched = widget.clone();
    if let Some(name) = changes.name {
        patched.name = name;
    }
    if let Some(quantity) = changes.quantity {
        patched.quantity = quantity;
    }
    if let Err(result) = validate(&patched) {
        return invalid(result);
    }
    *widget = patched.clone();
    Json(patched).into_response()
}

async fn delete(State(db): State<Db>, Path(id): Path<Uuid>) -> StatusCode {
    let mut widgets = db.write().await;
    match widgets.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::BAD_REQUEST,
    }
}

async fn internal_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

/// A JSON error body that is not a validation result.
async fn problem_json() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({"error": "maintenance", "retryAfter": 30})),
    )
}
