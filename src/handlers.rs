use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::DbError;
use crate::query::{self, Envelope};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: String,
}

/// Error body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{0}")]
    BadPath(String),
    #[error("Not found")]
    NoRoute,
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadPath(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Db(DbError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Db(DbError::ConnectionUnavailable) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Db(DbError::QueryFailed(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadPath(_) => StatusCode::BAD_REQUEST,
            ApiError::NoRoute => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            status: status.as_u16(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn root(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        message: state.config.message.clone(),
    })
}

pub async fn list_movies(State(state): State<AppState>) -> ApiResult<Envelope> {
    let envelope = query::get_all_movies(&state.store).await?;
    Ok(Json(envelope))
}

pub async fn movies_by_genre(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Envelope> {
    let Path(genre) = path?;
    let envelope = query::get_movies_by_genre(&state.store, &genre).await?;
    Ok(Json(envelope))
}

pub async fn movie_details(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Envelope> {
    let Path(id) = path?;
    let envelope = query::get_movie_by_id(&state.store, &id).await?;
    Ok(Json(envelope))
}

pub async fn movies_by_release_year(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Envelope> {
    let Path(year) = path?;
    let envelope = query::get_movies_by_release_year(&state.store, &year).await?;
    Ok(Json(envelope))
}

pub async fn fallback() -> ApiError {
    ApiError::NoRoute
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
