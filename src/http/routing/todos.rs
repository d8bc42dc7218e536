//! REST gateway: maps resource-style HTTP calls 1:1 onto the service operations.

use axum::extract::{Path, State};
use axum::{routing::{get, post}, Json, Router};
use serde::Deserialize;

use crate::application::error::ServiceError;
use crate::application::messages::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest, ReadAllResponse, ReadRequest, ReadResponse,
    UpdateRequest, UpdateResponse,
};
use crate::application::todo_service::ToDoService;
use crate::http::types::{ApiError, JsonBody, QueryParams};

#[derive(Clone)]
pub struct AppState<S: ToDoService> { pub service: S }

pub fn router<S: ToDoService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/v1/todo", post(create_todo::<S>).get(list_todos::<S>))
        .route("/v1/todo/:id", get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

/// Version tag for calls without a JSON body.
#[derive(Debug, Default, Deserialize)]
pub struct VersionQuery {
    #[serde(default)]
    pub api: String,
}

async fn create_todo<S: ToDoService>(State(state): State<AppState<S>>, JsonBody(payload): JsonBody<CreateRequest>) -> Result<Json<CreateResponse>, ApiError> {
    Ok(Json(state.service.create(payload).await?))
}

async fn list_todos<S: ToDoService>(State(state): State<AppState<S>>, QueryParams(q): QueryParams<VersionQuery>) -> Result<Json<ReadAllResponse>, ApiError> {
    Ok(Json(state.service.read_all(ReadAllRequest { api: q.api }).await?))
}

async fn get_todo<S: ToDoService>(State(state): State<AppState<S>>, Path(id): Path<String>, QueryParams(q): QueryParams<VersionQuery>) -> Result<Json<ReadResponse>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.read(ReadRequest { api: q.api, id }).await?))
}

async fn update_todo<S: ToDoService>(State(state): State<AppState<S>>, Path(id): Path<String>, JsonBody(mut payload): JsonBody<UpdateRequest>) -> Result<Json<UpdateResponse>, ApiError> {
    // the path names the record; a body id is ignored
    payload.todo.id = parse_id(&id)?;
    Ok(Json(state.service.update(payload).await?))
}

async fn delete_todo<S: ToDoService>(State(state): State<AppState<S>>, Path(id): Path<String>, QueryParams(q): QueryParams<VersionQuery>) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.delete(DeleteRequest { api: q.api, id }).await?))
}

fn parse_id(s: &str) -> Result<i64, ApiError> {
    s.parse::<i64>().map_err(|_| ServiceError::InvalidArgument(format!("invalid id '{s}'")).into())
}
