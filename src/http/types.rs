use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::error::{ErrorKind, ServiceError};

/// Error body returned by both the RPC surface and the REST gateway.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError { pub code: ErrorKind, pub message: String }

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorKind::Unimplemented => StatusCode::NOT_IMPLEMENTED,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self { Self { code: ErrorKind::InvalidArgument, message: message.into() } }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self::invalid_argument(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self { Self::invalid_argument(rejection.body_text()) }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self { Self { code: e.kind(), message: e.message().to_string() } }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status(), axum::Json(self)).into_response() }
}

/// JSON request body whose decoding failures surface as `ApiError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query string whose decoding failures surface as `ApiError`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);
