use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::ExpireFailure;

/// Failures raised by a store connector.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("{0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum ExpireError {
    #[error("{0}")]
    Configuration(String),
    #[error("Error fetching events: {0}")]
    Query(#[source] StoreError),
    #[error("Error updating events: {0}")]
    Update(#[source] StoreError),
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum ErrorKind {
    ConfigurationError,
    QueryError,
    UpdateError,
    UnknownError,
}

impl ExpireError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExpireError::Configuration(_) => ErrorKind::ConfigurationError,
            ExpireError::Query(_) => ErrorKind::QueryError,
            ExpireError::Update(_) => ErrorKind::UpdateError,
            ExpireError::Unknown(_) => ErrorKind::UnknownError,
        }
    }
}

impl IntoResponse for ExpireError {
    fn into_response(self) -> Response {
        let body = ExpireFailure::new(&self, Utc::now());
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
