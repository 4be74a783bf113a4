use axum::{
    http::{header::ALLOW, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use deercheck_core::ErrorDto;
use deercheck_store::error::StoreError;
use deercheck_store::lookup::LookupError;
use thiserror::Error;
use tracing::error;

pub use deercheck_store::lookup::{ORDER_ID_REQUIRED, ORDER_NOT_FOUND, PHONE_REQUIRED};
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const FETCH_FAILED: &str = "Failed to fetch previous order";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Order not found")]
    NotFound,

    #[error("Not found")]
    UnknownRoute,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("lookup task failed: {0}")]
    Task(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::UnknownRoute => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Store(_) | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a caller. Server-side failures collapse to one
    /// generic message; the detail goes to the log only.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Store(_) | AppError::Task(_) => FETCH_FAILED.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidInput(message) => AppError::InvalidInput(message),
            LookupError::NotFound => AppError::NotFound,
            LookupError::Store(err) => AppError::Store(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "previous order lookup failed");
        }

        let mut response = (status, Json(ErrorDto::new(self.public_message()))).into_response();
        if matches!(self, AppError::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("GET"));
        }
        response
    }
}
