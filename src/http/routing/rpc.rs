//! RPC surface: one `POST /v1.ToDoService/<Method>` endpoint per operation,
//! carrying the request and response messages as JSON.

use axum::body::Bytes;
use axum::extract::State;
use axum::{routing::post, Json, Router};

use super::todos::AppState;
use crate::application::messages::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest, ReadAllResponse, ReadRequest, ReadResponse,
    UpdateRequest, UpdateResponse,
};
use crate::application::todo_service::ToDoService;
use crate::http::types::{ApiError, JsonBody};

pub const SERVICE_PATH: &str = "/v1.ToDoService";

pub fn router<S: ToDoService + Clone>(state: AppState<S>) -> Router {
    let methods = Router::new()
        .route("/Create", post(create::<S>))
        .route("/Read", post(read::<S>))
        .route("/Update", post(update::<S>))
        .route("/Delete", post(delete::<S>))
        .route("/ReadAll", post(read_all::<S>))
        .with_state(state);
    Router::new().nest(SERVICE_PATH, methods)
}

async fn create<S: ToDoService>(State(state): State<AppState<S>>, JsonBody(req): JsonBody<CreateRequest>) -> Result<Json<CreateResponse>, ApiError> {
    Ok(Json(state.service.create(req).await?))
}

async fn read<S: ToDoService>(State(state): State<AppState<S>>, JsonBody(req): JsonBody<ReadRequest>) -> Result<Json<ReadResponse>, ApiError> {
    Ok(Json(state.service.read(req).await?))
}

async fn update<S: ToDoService>(State(state): State<AppState<S>>, JsonBody(req): JsonBody<UpdateRequest>) -> Result<Json<UpdateResponse>, ApiError> {
    Ok(Json(state.service.update(req).await?))
}

async fn delete<S: ToDoService>(State(state): State<AppState<S>>, JsonBody(req): JsonBody<DeleteRequest>) -> Result<Json<DeleteResponse>, ApiError> {
    Ok(Json(state.service.delete(req).await?))
}

// ReadAll carries nothing but the version tag, so an empty body is accepted.
async fn read_all<S: ToDoService>(State(state): State<AppState<S>>, body: Bytes) -> Result<Json<ReadAllResponse>, ApiError> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        ReadAllRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::invalid_argument(format!("Failed to parse the request body as JSON: {e}")))?
    };
    Ok(Json(state.service.read_all(req).await?))
}
