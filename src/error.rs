use std::{error::Error, fmt::Display};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::bandlab::ResolveError;

#[derive(Debug)]
pub enum ApiError {
    MissingUrl,
    NotFound,
    Upstream(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingUrl => write!(f, "Missing URL parameter"),
            Self::NotFound => write!(f, "{}", ResolveError::NotFound),
            Self::Upstream(reason) => write!(f, "{reason}"),
        }
    }
}

impl Error for ApiError {}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingUrl => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::NotFound => Self::NotFound,
            ResolveError::Upstream(reason) => Self::Upstream(reason),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
