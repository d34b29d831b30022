pub mod states;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{manager::Manager, store::SqliteStore};

/// Application context passed to all handlers.
pub struct Ctx<S = SqliteStore> {
    pub mgr: Arc<Manager<S>>,
    pub consts: Consts,
}

/// Application constants.
#[derive(Clone, Default)]
pub struct Consts {
    /// Browser origins allowed to make credentialed CORS requests.
    pub allowed_origins: Vec<String>,
}

/// API response wrapper.
#[derive(Serialize)]
pub struct ApiResp<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> IntoResponse for ApiResp<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub fn json<T: Serialize>(data: T) -> ApiResp<T> {
    ApiResp {
        data: Some(data),
        message: None,
    }
}
