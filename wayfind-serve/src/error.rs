//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use wayfind_route::{QueryError, NO_ROUTE_MESSAGE};

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    #[schema(example = "Start and end cannot be the same")]
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Graph(#[from] wayfind_common::Error),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("{}", NO_ROUTE_MESSAGE)]
    NoRoute,

    #[error("No map file configured; load one with PUT /map")]
    NoMapFile,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use wayfind_common::Error as E;
        match self {
            ApiError::Graph(E::UnknownNode(_)) | ApiError::Graph(E::UnknownFloor(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Graph(E::DuplicateNode(_)) => StatusCode::CONFLICT,
            ApiError::Graph(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::NoRoute => StatusCode::NOT_FOUND,
            ApiError::NoMapFile => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
