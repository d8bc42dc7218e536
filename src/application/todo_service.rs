use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::error::{Result, ServiceError};
use super::messages::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest, ReadAllResponse, ReadRequest, ReadResponse,
    UpdateRequest, UpdateResponse,
};
use super::validation::{API_VERSION, ValidationError, check_api, validate_todo};
use crate::domain::repository::{StoreError, ToDoStore};
use crate::domain::todo::{ToDo, TodoId};

#[async_trait]
pub trait ToDoService: Send + Sync + 'static {
    async fn create(&self, req: CreateRequest) -> Result<CreateResponse>;
    async fn read(&self, req: ReadRequest) -> Result<ReadResponse>;
    async fn update(&self, req: UpdateRequest) -> Result<UpdateResponse>;
    async fn delete(&self, req: DeleteRequest) -> Result<DeleteResponse>;
    async fn read_all(&self, req: ReadAllRequest) -> Result<ReadAllResponse>;
}

#[derive(Clone)]
pub struct ToDoServiceImpl<S: ToDoStore> {
    store: S,
}

impl<S: ToDoStore> ToDoServiceImpl<S> {
    pub fn new(store: S) -> Self { Self { store } }
}

#[async_trait]
impl<S: ToDoStore> ToDoService for ToDoServiceImpl<S> {
    async fn create(&self, req: CreateRequest) -> Result<CreateResponse> {
        debug!(api = %req.api, "create");
        check_api(&req.api).map_err(reject("create"))?;
        validate_todo(&req.todo).map_err(reject("create"))?;
        let row = req.todo.to_row().map_err(|e| internal("create", format!("unable to convert to storage representation: {e}")))?;
        let id = self.store.insert(&row).await.map_err(|e| classify("create", "unable to insert", e))?;
        Ok(CreateResponse { api: API_VERSION.to_string(), id: id.0 })
    }

    async fn read(&self, req: ReadRequest) -> Result<ReadResponse> {
        debug!(api = %req.api, id = req.id, "read");
        check_api(&req.api).map_err(reject("read"))?;
        let id = TodoId(req.id);
        let row = self
            .store
            .get_by_id(id)
            .await
            .map_err(|e| classify("read", "error reading record", e))?
            .ok_or_else(|| not_found("read", "error reading record", id))?;
        let todo = row.to_todo().map_err(|e| internal("read", format!("unable to convert to public representation: {e}")))?;
        Ok(ReadResponse { api: API_VERSION.to_string(), todo })
    }

    async fn update(&self, req: UpdateRequest) -> Result<UpdateResponse> {
        debug!(api = %req.api, id = req.todo.id, "update");
        check_api(&req.api).map_err(reject("update"))?;
        validate_todo(&req.todo).map_err(reject("update"))?;
        let row = req.todo.to_row().map_err(|e| internal("update", format!("unable to convert to storage representation: {e}")))?;
        let affected = self.store.replace_by_id(&row).await.map_err(|e| classify("update", "error updating record", e))?;
        if affected == 0 {
            return Err(not_found("update", "error updating record", row.id));
        }
        Ok(UpdateResponse { api: API_VERSION.to_string(), updated: 1 })
    }

    async fn delete(&self, req: DeleteRequest) -> Result<DeleteResponse> {
        debug!(api = %req.api, id = req.id, "delete");
        check_api(&req.api).map_err(reject("delete"))?;
        // A missing row is reported as `deleted: 0`, not as an error.
        let deleted = self.store.delete_by_id(TodoId(req.id)).await.map_err(|e| classify("delete", "unable to delete", e))?;
        Ok(DeleteResponse { api: API_VERSION.to_string(), deleted: deleted as i64 })
    }

    async fn read_all(&self, req: ReadAllRequest) -> Result<ReadAllResponse> {
        debug!(api = %req.api, "read_all");
        check_api(&req.api).map_err(reject("read_all"))?;
        let rows = self.store.list_all().await.map_err(|e| classify("read_all", "unable to read records", e))?;
        let todos = rows
            .iter()
            .map(|row| row.to_todo())
            .collect::<std::result::Result<Vec<ToDo>, _>>()
            .map_err(|e| internal("read_all", format!("unable to convert to public representation: {e}")))?;
        Ok(ReadAllResponse { api: API_VERSION.to_string(), todos })
    }
}

fn reject(op: &'static str) -> impl Fn(ValidationError) -> ServiceError {
    move |e| {
        let e = ServiceError::from(e);
        warn!(op, kind = %e.kind(), "{e}");
        e
    }
}

fn not_found(op: &'static str, context: &str, id: TodoId) -> ServiceError {
    let e = ServiceError::NotFound(format!("{context}, record with id {id} not found"));
    warn!(op, kind = %e.kind(), "{e}");
    e
}

fn internal(op: &'static str, message: String) -> ServiceError {
    error!(op, "{message}");
    ServiceError::Internal(message)
}

/// Wraps a store failure with the operation's context and classifies it.
fn classify(op: &'static str, context: &str, e: StoreError) -> ServiceError {
    match e {
        StoreError::NotFound(id) => not_found(op, context, id),
        StoreError::Backend(err) => internal(op, format!("{context}, internal error: {err:#}")),
    }
}
